//! Board-agnostic control logic for the Remedi medication dispenser
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware capability traits (clock, display, keypad, storage, gates)
//! - Schedule table and its persistence codec
//! - Dose scheduler (due checks, midnight rollover)
//! - Dispense sequencer state machine
//! - Power manager (sleep/wake, debounced wake flags)
//! - Menu flows for setup, review, and manual test

#![no_std]
#![deny(unsafe_code)]

pub mod controller;
pub mod dispense;
pub mod menu;
pub mod power;
pub mod schedule;
pub mod scheduler;
pub mod traits;
