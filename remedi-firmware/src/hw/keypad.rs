//! 4x4 matrix keypad scanner
//!
//! Rows are driven low one at a time; columns idle high on pull-ups.
//! `poll_key` reports each press once, on the transition.

use embassy_rp::gpio::{Input, Output};
use embassy_time::{block_for, Duration};

use remedi_core::traits::{Key, Keypad};

/// Standard 4x4 phone-style layout
const KEYMAP: [[Key; 4]; 4] = [
    [Key::Digit(1), Key::Digit(2), Key::Digit(3), Key::A],
    [Key::Digit(4), Key::Digit(5), Key::Digit(6), Key::B],
    [Key::Digit(7), Key::Digit(8), Key::Digit(9), Key::C],
    [Key::Star, Key::Digit(0), Key::Hash, Key::D],
];

pub struct MatrixKeypad {
    rows: [Output<'static>; 4],
    cols: [Input<'static>; 4],
    held: Option<(u8, u8)>,
}

impl MatrixKeypad {
    pub fn new(mut rows: [Output<'static>; 4], cols: [Input<'static>; 4]) -> Self {
        for row in rows.iter_mut() {
            row.set_high();
        }
        Self {
            rows,
            cols,
            held: None,
        }
    }

    /// Scan the matrix; returns the first pressed position
    fn scan(&mut self) -> Option<(u8, u8)> {
        let mut pressed = None;
        for r in 0..4 {
            self.rows[r].set_low();
            block_for(Duration::from_micros(5));
            for c in 0..4 {
                if self.cols[c].is_low() {
                    pressed = Some((r as u8, c as u8));
                }
            }
            self.rows[r].set_high();
            if pressed.is_some() {
                break;
            }
        }
        pressed
    }
}

impl Keypad for MatrixKeypad {
    fn poll_key(&mut self) -> Option<Key> {
        let current = self.scan();
        let event = match (self.held, current) {
            // New press
            (None, Some((r, c))) => Some(KEYMAP[r as usize][c as usize]),
            _ => None,
        };
        self.held = current;
        event
    }
}
