//! Gate actuator trait
//!
//! The release mechanism is two independently positionable gates above
//! a holding chamber. A gate reaches its commanded position within the
//! settle delay; there is no position feedback. The dispense
//! sequencer is the only caller.

/// Which gate to actuate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gate {
    /// Upper gate: admits one container into the holding chamber
    Upper,
    /// Lower gate: releases the held container
    Lower,
}

/// Commanded gate position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatePosition {
    Open,
    Closed,
}

/// Trait for the two-gate release actuator
pub trait GateActuator {
    /// Command one gate to a position
    fn set(&mut self, gate: Gate, position: GatePosition);
}
