//! Keypad input trait
//!
//! The scanner is external and debounced; it delivers at most one key
//! event per poll.

/// A single key event from the 4x4 keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Numeric key 0-9
    Digit(u8),
    /// Menu action: enter setup
    A,
    /// Menu action: review schedule
    B,
    /// Menu action: manual dispense test
    C,
    /// Menu action: cancel / back
    D,
    /// Confirm the current field
    Hash,
    /// Clear the current field
    Star,
}

impl Key {
    /// The digit value, if this is a numeric key
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) => Some(d),
            _ => None,
        }
    }
}

/// Trait for the keypad scanner
pub trait Keypad {
    /// Poll for a key event
    ///
    /// Returns `Some(key)` at most once per physical press.
    fn poll_key(&mut self) -> Option<Key>;
}
