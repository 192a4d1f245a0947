//! GPIO gate actuator
//!
//! Drives the two release gates via GPIO pins (directly or through a
//! driver transistor). The mechanical transition completes within the
//! sequencer's settle delay; there is no position feedback.

use remedi_core::traits::{Gate, GateActuator, GatePosition};

/// Trait for GPIO pin abstraction
pub trait OutputPin {
    /// Set the pin high
    fn set_high(&mut self);

    /// Set the pin low
    fn set_low(&mut self);

    /// Check if the pin is set high
    fn is_set_high(&self) -> bool;
}

/// A single GPIO-driven gate
///
/// The pin can be configured as active-high (default, open = high) or
/// active-low for inverted driver stages.
pub struct GpioGate<P> {
    pin: P,
    /// If true, gate OPEN = pin LOW
    inverted: bool,
    /// Current logical position
    position: GatePosition,
}

impl<P: OutputPin> GpioGate<P> {
    /// Create a new gate output
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the gate is OPEN when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut gate = Self {
            pin,
            inverted,
            position: GatePosition::Closed,
        };
        // Ensure the gate starts closed
        gate.set_position(GatePosition::Closed);
        gate
    }

    /// Create a gate with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a gate with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Command the gate to a position
    pub fn set_position(&mut self, position: GatePosition) {
        self.position = position;

        let open = position == GatePosition::Open;
        if open != self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    /// Last commanded position
    pub fn position(&self) -> GatePosition {
        self.position
    }
}

/// Both release gates as one actuator
pub struct GatePair<U, L> {
    upper: GpioGate<U>,
    lower: GpioGate<L>,
}

impl<U: OutputPin, L: OutputPin> GatePair<U, L> {
    /// Create the pair; both gates start closed
    pub fn new(upper: GpioGate<U>, lower: GpioGate<L>) -> Self {
        Self { upper, lower }
    }
}

impl<U: OutputPin, L: OutputPin> GateActuator for GatePair<U, L> {
    fn set(&mut self, gate: Gate, position: GatePosition) {
        match gate {
            Gate::Upper => self.upper.set_position(position),
            Gate::Lower => self.lower.set_position(position),
        }
    }
}
