//! HD44780 character display over 4-bit GPIO
//!
//! Classic 16x2 module wired RS + EN + D4..D7, plus a backlight
//! transistor and a high-side switch for the module's supply rail.
//! All timing is done with short blocking delays; writes only happen
//! from the main loop.

use embassy_rp::gpio::Output;
use embassy_time::{block_for, Duration};

use remedi_core::traits::CharDisplay;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off
const CMD_FUNCTION_4BIT: u8 = 0x28; // 4-bit, 2 lines, 5x8 font
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM base address per row on a 16x2 module
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

pub struct Hd44780 {
    rs: Output<'static>,
    en: Output<'static>,
    data: [Output<'static>; 4],
    backlight: Output<'static>,
    rail: Output<'static>,
    powered: bool,
}

impl Hd44780 {
    pub fn new(
        rs: Output<'static>,
        en: Output<'static>,
        data: [Output<'static>; 4],
        backlight: Output<'static>,
        rail: Output<'static>,
    ) -> Self {
        let mut lcd = Self {
            rs,
            en,
            data,
            backlight,
            rail,
            powered: false,
        };
        lcd.power_up();
        lcd
    }

    /// Supply rail on, then the datasheet 4-bit init dance
    fn power_up(&mut self) {
        self.rail.set_high();
        self.powered = true;

        // Controller needs >40ms after Vcc rises
        block_for(Duration::from_millis(50));

        // Three wake-up writes in 8-bit mode, then switch to 4-bit
        self.rs.set_low();
        for _ in 0..3 {
            self.write_nibble(0x03);
            block_for(Duration::from_millis(5));
        }
        self.write_nibble(0x02);
        block_for(Duration::from_micros(100));

        self.command(CMD_FUNCTION_4BIT);
        self.command(CMD_DISPLAY_ON);
        self.command(CMD_ENTRY_MODE);
        self.command(CMD_CLEAR);
        block_for(Duration::from_millis(2));
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (i, pin) in self.data.iter_mut().enumerate() {
            if nibble & (1 << i) != 0 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
        // Latch on the falling edge of EN
        self.en.set_high();
        block_for(Duration::from_micros(1));
        self.en.set_low();
        block_for(Duration::from_micros(50));
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
    }

    fn command(&mut self, cmd: u8) {
        self.rs.set_low();
        self.write_byte(cmd);
    }

    fn write_data(&mut self, byte: u8) {
        self.rs.set_high();
        self.write_byte(byte);
    }
}

impl CharDisplay for Hd44780 {
    fn clear(&mut self) {
        if !self.powered {
            return;
        }
        self.command(CMD_CLEAR);
        block_for(Duration::from_millis(2));
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        if !self.powered {
            return;
        }
        let row = (row as usize).min(ROW_OFFSETS.len() - 1);
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row] + col));
    }

    fn print(&mut self, text: &str) {
        if !self.powered {
            return;
        }
        for byte in text.bytes() {
            self.write_data(byte);
        }
    }

    fn backlight(&mut self, on: bool) {
        if on {
            self.backlight.set_high();
        } else {
            self.backlight.set_low();
        }
    }

    fn power(&mut self, on: bool) {
        if on && !self.powered {
            self.power_up();
        } else if !on && self.powered {
            self.backlight.set_low();
            // Drop all lines before the rail so the module cannot
            // back-power through the data pins
            self.rs.set_low();
            self.en.set_low();
            for pin in self.data.iter_mut() {
                pin.set_low();
            }
            self.rail.set_low();
            self.powered = false;
        }
    }
}
