//! Character display trait
//!
//! The display is a two-line fixed-width text surface (16x2 character
//! LCD). All rendering logic stays in the core; the driver only moves
//! the cursor and paints text.

/// Display width in characters
pub const DISPLAY_COLS: usize = 16;

/// Display height in lines
pub const DISPLAY_ROWS: usize = 2;

/// Trait for the two-line character display
pub trait CharDisplay {
    /// Clear the entire surface
    fn clear(&mut self);

    /// Position the cursor
    ///
    /// - `row`: Line number (0-1)
    /// - `col`: Column number (0-15)
    fn set_cursor(&mut self, row: u8, col: u8);

    /// Print ASCII text at the cursor
    fn print(&mut self, text: &str);

    /// Switch the backlight on or off
    fn backlight(&mut self, on: bool);

    /// Power the display module on or off
    ///
    /// While powered off the display must draw no current; this is
    /// part of the sleep-entry sequence.
    fn power(&mut self, on: bool);
}
