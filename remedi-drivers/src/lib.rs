//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in remedi-core for the dispenser hardware:
//!
//! - Gate actuator over two GPIO-driven solenoids/servos
//! - Status LED and buzzer indicator

#![no_std]
#![deny(unsafe_code)]

pub mod gate;
pub mod indicator;
