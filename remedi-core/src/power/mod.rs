//! Power management
//!
//! The power state machine gates whether the scheduler and menu run
//! at all. Transitions are explicit, finite, and deterministic; the
//! wake flags are the only state shared with interrupt context.

pub mod machine;
pub mod manager;
pub mod wake;

pub use machine::{FaultKind, PowerEvent, PowerState};
pub use manager::{PowerManager, SLEEP_TIMEOUT_MS};
pub use wake::{WakeFlags, WakeReason, DEBOUNCE_MS};
