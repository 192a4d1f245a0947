//! Two-stage dispense sequencer
//!
//! Releases exactly one container per invocation through a strictly
//! ordered four-step gate protocol. Expressed as a state machine with
//! a required minimum dwell per step, polled with a caller-supplied
//! millisecond timestamp so the timing is testable with a virtual
//! clock.

pub mod sequencer;

pub use sequencer::{
    SequenceAction, SequenceStep, Sequencer, BEEP_FREQ_HZ, BEEP_GAP_MS, BEEP_MS, CONFIRM_BEEPS,
    SETTLE_MS,
};
