//! Gate sequencer state machine

use crate::traits::{Gate, GatePosition};

/// Minimum dwell after each gate actuation (ms)
///
/// Bounds the mechanical transition time of a gate; the next
/// actuation is never issued before this fully elapses.
pub const SETTLE_MS: u32 = 500;

/// Confirmation beeps after a completed sequence
pub const CONFIRM_BEEPS: u8 = 3;

/// Confirmation beep frequency (Hz)
pub const BEEP_FREQ_HZ: u16 = 4000;

/// Confirmation beep duration (ms)
pub const BEEP_MS: u16 = 100;

/// Gap between confirmation beeps (ms)
pub const BEEP_GAP_MS: u32 = 100;

/// Sequencer states, one per protocol step
///
/// The upper gate admits a single container into the holding chamber;
/// closing it before the lower gate opens is what guarantees at most
/// one release per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceStep {
    /// No sequence running
    Idle,
    /// Step 1: upper gate open, container falling into the chamber
    UpperOpen,
    /// Step 2: upper gate closed, chamber holds one container
    UpperClosed,
    /// Step 3: lower gate open, container released
    LowerOpen,
    /// Step 4: lower gate closed, mechanism back in ready state
    LowerClosed,
    /// Confirmation beeps in progress
    Confirming,
}

/// One output of the sequencer, applied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceAction {
    /// Command a gate to a position
    Gate(Gate, GatePosition),
    /// Sound one confirmation beep
    Beep,
    /// Sequence complete
    Finished,
}

/// The dispense sequencer
///
/// Once started, a sequence always runs to completion; there is no
/// cancellation path. The sequencer is the only writer of the gate
/// actuator.
#[derive(Debug)]
pub struct Sequencer {
    step: SequenceStep,
    entered_at_ms: u32,
    settle_ms: u32,
    beeps_left: u8,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// Create a sequencer with the standard settle delay
    pub const fn new() -> Self {
        Self::with_settle(SETTLE_MS)
    }

    /// Create a sequencer with a custom settle delay
    pub const fn with_settle(settle_ms: u32) -> Self {
        Self {
            step: SequenceStep::Idle,
            entered_at_ms: 0,
            settle_ms,
            beeps_left: 0,
        }
    }

    /// Current step
    pub fn step(&self) -> SequenceStep {
        self.step
    }

    /// True while a sequence is running
    pub fn is_active(&self) -> bool {
        self.step != SequenceStep::Idle
    }

    /// Begin a new sequence
    ///
    /// Returns the first actuation, or `None` if a sequence is
    /// already running (a running sequence is never restarted).
    pub fn start(&mut self, now_ms: u32) -> Option<SequenceAction> {
        if self.is_active() {
            return None;
        }
        self.step = SequenceStep::UpperOpen;
        self.entered_at_ms = now_ms;
        Some(SequenceAction::Gate(Gate::Upper, GatePosition::Open))
    }

    /// Advance the sequence
    ///
    /// Emits at most one action per poll, and none before the current
    /// step's dwell has fully elapsed.
    pub fn poll(&mut self, now_ms: u32) -> Option<SequenceAction> {
        let dwell = now_ms.wrapping_sub(self.entered_at_ms);

        match self.step {
            SequenceStep::Idle => None,
            SequenceStep::UpperOpen if dwell >= self.settle_ms => {
                self.enter(SequenceStep::UpperClosed, now_ms);
                Some(SequenceAction::Gate(Gate::Upper, GatePosition::Closed))
            }
            SequenceStep::UpperClosed if dwell >= self.settle_ms => {
                self.enter(SequenceStep::LowerOpen, now_ms);
                Some(SequenceAction::Gate(Gate::Lower, GatePosition::Open))
            }
            SequenceStep::LowerOpen if dwell >= self.settle_ms => {
                self.enter(SequenceStep::LowerClosed, now_ms);
                Some(SequenceAction::Gate(Gate::Lower, GatePosition::Closed))
            }
            SequenceStep::LowerClosed if dwell >= self.settle_ms => {
                self.enter(SequenceStep::Confirming, now_ms);
                self.beeps_left = CONFIRM_BEEPS - 1;
                Some(SequenceAction::Beep)
            }
            SequenceStep::Confirming if dwell >= BEEP_MS as u32 + BEEP_GAP_MS => {
                if self.beeps_left > 0 {
                    self.beeps_left -= 1;
                    self.entered_at_ms = now_ms;
                    Some(SequenceAction::Beep)
                } else {
                    self.step = SequenceStep::Idle;
                    Some(SequenceAction::Finished)
                }
            }
            _ => None,
        }
    }

    fn enter(&mut self, step: SequenceStep, now_ms: u32) {
        self.step = step;
        self.entered_at_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the sequencer to completion on a virtual clock, returning
    /// the (timestamp, action) trace.
    fn run_to_completion(seq: &mut Sequencer, tick_ms: u32) -> [(u32, SequenceAction); 8] {
        let mut trace = [(0, SequenceAction::Finished); 8];
        let mut count = 0;
        let mut now = 0;

        if let Some(action) = seq.start(now) {
            trace[count] = (now, action);
            count += 1;
        }
        while seq.is_active() {
            now += tick_ms;
            if let Some(action) = seq.poll(now) {
                assert!(count < trace.len(), "too many actions");
                trace[count] = (now, action);
                count += 1;
            }
        }
        assert_eq!(count, trace.len(), "incomplete trace");
        trace
    }

    #[test]
    fn test_steps_execute_in_order() {
        let mut seq = Sequencer::new();
        let trace = run_to_completion(&mut seq, 10);

        let actions: [SequenceAction; 8] = core::array::from_fn(|i| trace[i].1);
        assert_eq!(
            actions,
            [
                SequenceAction::Gate(Gate::Upper, GatePosition::Open),
                SequenceAction::Gate(Gate::Upper, GatePosition::Closed),
                SequenceAction::Gate(Gate::Lower, GatePosition::Open),
                SequenceAction::Gate(Gate::Lower, GatePosition::Closed),
                SequenceAction::Beep,
                SequenceAction::Beep,
                SequenceAction::Beep,
                SequenceAction::Finished,
            ]
        );
    }

    #[test]
    fn test_inter_step_dwell_at_least_settle() {
        let mut seq = Sequencer::new();
        let trace = run_to_completion(&mut seq, 10);

        // The four gate actuations each dwell >= SETTLE_MS.
        for pair in trace[..4].windows(2) {
            let elapsed = pair[1].0 - pair[0].0;
            assert!(
                elapsed >= SETTLE_MS,
                "step fired after {} ms, settle is {} ms",
                elapsed,
                SETTLE_MS
            );
        }
    }

    #[test]
    fn test_no_action_before_dwell_elapses() {
        let mut seq = Sequencer::with_settle(500);
        assert!(seq.start(0).is_some());

        assert_eq!(seq.poll(100), None);
        assert_eq!(seq.poll(499), None);
        assert_eq!(
            seq.poll(500),
            Some(SequenceAction::Gate(Gate::Upper, GatePosition::Closed))
        );
    }

    #[test]
    fn test_start_while_running_is_refused() {
        let mut seq = Sequencer::new();
        assert!(seq.start(0).is_some());
        assert_eq!(seq.start(50), None);
        assert_eq!(seq.step(), SequenceStep::UpperOpen);
    }

    #[test]
    fn test_sequence_returns_to_idle() {
        let mut seq = Sequencer::new();
        run_to_completion(&mut seq, 25);
        assert_eq!(seq.step(), SequenceStep::Idle);
        assert!(!seq.is_active());
    }

    #[test]
    fn test_timestamp_wraparound() {
        // A sequence straddling u32 wrap still honors the dwell.
        let start = u32::MAX - 100;
        let mut seq = Sequencer::with_settle(500);
        assert!(seq.start(start).is_some());
        assert_eq!(seq.poll(u32::MAX), None);
        assert_eq!(seq.poll(start.wrapping_add(499)), None);
        assert!(seq.poll(start.wrapping_add(500)).is_some());
    }
}
