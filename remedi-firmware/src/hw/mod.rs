//! Board-level trait implementations
//!
//! Concrete RP2040 bindings for the hardware traits in remedi-core.
//! Pin assignments live in main.rs; these modules only wrap peripherals.

pub mod clock;
pub mod display;
pub mod flash;
pub mod io;
pub mod keypad;
pub mod sleep;
