//! Menu and input flows
//!
//! Setup, review, and manual-test flows for the keypad. Each flow is
//! part of one small state machine advanced a single key event per
//! main-loop iteration; there are no nested blocking input loops, so
//! sleep/wake timing stays responsive. Rendering produces two
//! fixed-width lines the controller paints to the display.
//!
//! Keys: A=setup, B=review, C=manual test, D=cancel/back, digits for
//! numeric entry, `#` confirms a field, `*` clears it.

use core::fmt::Write;

use heapless::String;

use crate::schedule::{DoseEntry, ScheduleTable, SLOT_COUNT};
use crate::scheduler;
use crate::traits::{Key, TimeOfDay, DISPLAY_COLS};

/// One rendered display line
pub type Line = String<DISPLAY_COLS>;

/// Two-line view model the controller paints to the display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    pub lines: [Line; 2],
}

impl Screen {
    fn new(top: Line, bottom: Line) -> Self {
        Self {
            lines: [top, bottom],
        }
    }
}

/// Menu state, one variant per screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum MenuMode {
    /// Idle screen: clock and next-dose summary
    Idle,
    /// Setup: waiting for a slot digit (1-5)
    SetupSlot,
    /// Setup: waiting for the active flag (1/0)
    SetupActive { slot: u8 },
    /// Setup: entering the hour
    SetupHour { slot: u8, active: bool },
    /// Setup: entering the minute
    SetupMinute { slot: u8, active: bool, hour: u8 },
    /// Review: showing one active slot (`None` when nothing active)
    Review { slot: Option<u8> },
    /// Manual dispense test, waiting for confirmation
    ConfirmTest,
}

/// What the controller must do after a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Key ignored in this mode
    None,
    /// Screen content changed
    Redraw,
    /// Setup committed: persist the table (the only save path)
    CommitSchedule,
    /// Manual test confirmed: run one dispense sequence
    ManualDispense,
}

/// The interaction controller
#[derive(Debug)]
pub struct Menu {
    mode: MenuMode,
    /// Accumulated digits for the field being entered
    pending: u16,
    pending_digits: u8,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    /// Create a menu showing the idle screen
    pub const fn new() -> Self {
        Self {
            mode: MenuMode::Idle,
            pending: 0,
            pending_digits: 0,
        }
    }

    /// True while a modal flow (setup/review/test) is open
    ///
    /// Modal flows inhibit sleep entry.
    pub fn in_flow(&self) -> bool {
        self.mode != MenuMode::Idle
    }

    /// Drop any open flow and return to the idle screen
    pub fn reset(&mut self) {
        self.mode = MenuMode::Idle;
        self.clear_pending();
    }

    /// Process one key event
    pub fn handle_key(&mut self, key: Key, table: &mut ScheduleTable) -> MenuAction {
        match self.mode {
            MenuMode::Idle => self.handle_idle(key, table),
            MenuMode::SetupSlot => self.handle_setup_slot(key),
            MenuMode::SetupActive { slot } => self.handle_setup_active(key, slot),
            MenuMode::SetupHour { slot, active } => self.handle_setup_hour(key, slot, active),
            MenuMode::SetupMinute { slot, active, hour } => {
                self.handle_setup_minute(key, table, slot, active, hour)
            }
            MenuMode::Review { slot } => self.handle_review(key, table, slot),
            MenuMode::ConfirmTest => self.handle_confirm_test(key),
        }
    }

    fn handle_idle(&mut self, key: Key, table: &ScheduleTable) -> MenuAction {
        match key {
            Key::A => {
                self.mode = MenuMode::SetupSlot;
                MenuAction::Redraw
            }
            Key::B => {
                self.mode = MenuMode::Review {
                    slot: first_active(table),
                };
                MenuAction::Redraw
            }
            Key::C => {
                self.mode = MenuMode::ConfirmTest;
                MenuAction::Redraw
            }
            Key::D => MenuAction::Redraw,
            _ => MenuAction::None,
        }
    }

    fn handle_setup_slot(&mut self, key: Key) -> MenuAction {
        match key {
            Key::Digit(d @ 1..=5) => {
                self.mode = MenuMode::SetupActive { slot: d - 1 };
                MenuAction::Redraw
            }
            Key::D => self.cancel(),
            _ => MenuAction::None,
        }
    }

    fn handle_setup_active(&mut self, key: Key, slot: u8) -> MenuAction {
        match key {
            Key::Digit(d @ (0 | 1)) => {
                self.clear_pending();
                self.mode = MenuMode::SetupHour {
                    slot,
                    active: d == 1,
                };
                MenuAction::Redraw
            }
            Key::D => self.cancel(),
            _ => MenuAction::None,
        }
    }

    fn handle_setup_hour(&mut self, key: Key, slot: u8, active: bool) -> MenuAction {
        match key {
            Key::Digit(d) => self.push_digit(d),
            Key::Star => self.clear_field(),
            Key::Hash => {
                // Out-of-range values clamp, never reject.
                let hour = self.pending.min(23) as u8;
                self.clear_pending();
                self.mode = MenuMode::SetupMinute { slot, active, hour };
                MenuAction::Redraw
            }
            Key::D => self.cancel(),
            _ => MenuAction::None,
        }
    }

    fn handle_setup_minute(
        &mut self,
        key: Key,
        table: &mut ScheduleTable,
        slot: u8,
        active: bool,
        hour: u8,
    ) -> MenuAction {
        match key {
            Key::Digit(d) => self.push_digit(d),
            Key::Star => self.clear_field(),
            Key::Hash => {
                let minute = self.pending.min(59) as u8;
                table.set(
                    slot as usize,
                    DoseEntry {
                        active,
                        hour,
                        minute,
                        dispensed_today: false,
                    },
                );
                self.reset();
                MenuAction::CommitSchedule
            }
            Key::D => self.cancel(),
            _ => MenuAction::None,
        }
    }

    fn handle_review(&mut self, key: Key, table: &ScheduleTable, slot: Option<u8>) -> MenuAction {
        match key {
            Key::Hash | Key::B => {
                self.mode = MenuMode::Review {
                    slot: slot.and_then(|s| next_active(table, s)),
                };
                MenuAction::Redraw
            }
            Key::D => self.cancel(),
            _ => MenuAction::None,
        }
    }

    fn handle_confirm_test(&mut self, key: Key) -> MenuAction {
        match key {
            Key::Hash => {
                self.reset();
                MenuAction::ManualDispense
            }
            Key::D => self.cancel(),
            _ => MenuAction::None,
        }
    }

    fn push_digit(&mut self, digit: u8) -> MenuAction {
        if self.pending_digits >= 2 {
            return MenuAction::None;
        }
        self.pending = self.pending * 10 + digit as u16;
        self.pending_digits += 1;
        MenuAction::Redraw
    }

    fn clear_field(&mut self) -> MenuAction {
        self.clear_pending();
        MenuAction::Redraw
    }

    fn cancel(&mut self) -> MenuAction {
        self.reset();
        MenuAction::Redraw
    }

    fn clear_pending(&mut self) {
        self.pending = 0;
        self.pending_digits = 0;
    }

    /// Render the current screen
    pub fn render(&self, table: &ScheduleTable, now: &TimeOfDay) -> Screen {
        match self.mode {
            MenuMode::Idle => self.render_idle(table, now),
            MenuMode::SetupSlot => screen("Setup: slot 1-5", "D=back"),
            MenuMode::SetupActive { slot } => {
                let mut top = Line::new();
                let _ = write!(top, "Slot {} active?", slot + 1);
                Screen::new(top, line("1=on 0=off"))
            }
            MenuMode::SetupHour { slot, .. } => self.render_field(slot, "hour"),
            MenuMode::SetupMinute { slot, .. } => self.render_field(slot, "minute"),
            MenuMode::Review { slot } => render_review(table, slot),
            MenuMode::ConfirmTest => screen("Test dispense?", "#=yes D=no"),
        }
    }

    fn render_idle(&self, table: &ScheduleTable, now: &TimeOfDay) -> Screen {
        let mut top = Line::new();
        let _ = write!(top, "Remedi     {:02}:{:02}", now.hour, now.minute);

        let mut bottom = Line::new();
        match scheduler::minutes_to_next(table, now) {
            Some(minutes) => {
                let _ = write!(bottom, "Next dose {}h{:02}m", minutes / 60, minutes % 60);
            }
            None => {
                let _ = bottom.push_str("No doses set");
            }
        }
        Screen::new(top, bottom)
    }

    fn render_field(&self, slot: u8, field: &str) -> Screen {
        let mut top = Line::new();
        let _ = write!(top, "Slot {} {}", slot + 1, field);

        let mut bottom = Line::new();
        if self.pending_digits == 0 {
            let _ = bottom.push_str("> _ #=ok *=clr");
        } else {
            let _ = write!(bottom, "> {} #=ok *=clr", self.pending);
        }
        Screen::new(top, bottom)
    }
}

fn render_review(table: &ScheduleTable, slot: Option<u8>) -> Screen {
    let entry = slot.and_then(|s| table.get(s as usize));
    match (slot, entry) {
        (Some(s), Some(entry)) if entry.active => {
            let mut top = Line::new();
            let _ = write!(top, "Slot {}  {:02}:{:02}", s + 1, entry.hour, entry.minute);

            let status = if entry.dispensed_today {
                "taken   #=next"
            } else {
                "pending #=next"
            };
            Screen::new(top, line(status))
        }
        _ => screen("No active slots", "D=back"),
    }
}

/// Lowest-indexed active slot
fn first_active(table: &ScheduleTable) -> Option<u8> {
    table.active_slots().next().map(|(i, _)| i as u8)
}

/// Next active slot after `current`, wrapping to the first
fn next_active(table: &ScheduleTable, current: u8) -> Option<u8> {
    table
        .active_slots()
        .map(|(i, _)| i as u8)
        .find(|&i| i > current)
        .or_else(|| first_active(table))
}

fn line(text: &str) -> Line {
    let mut l = Line::new();
    let _ = l.push_str(text);
    l
}

fn screen(top: &str, bottom: &str) -> Screen {
    Screen::new(line(top), line(bottom))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(menu: &mut Menu, table: &mut ScheduleTable, keys: &[Key]) -> MenuAction {
        let mut last = MenuAction::None;
        for key in keys {
            last = menu.handle_key(*key, table);
        }
        last
    }

    #[test]
    fn test_setup_flow_commits_entry() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();

        // A, slot 2, active, hour 08, minute 30, confirm each field.
        let action = press(
            &mut menu,
            &mut table,
            &[
                Key::A,
                Key::Digit(2),
                Key::Digit(1),
                Key::Digit(0),
                Key::Digit(8),
                Key::Hash,
                Key::Digit(3),
                Key::Digit(0),
                Key::Hash,
            ],
        );

        assert_eq!(action, MenuAction::CommitSchedule);
        assert_eq!(table.get(1), Some(&DoseEntry::new(8, 30)));
        assert!(!menu.in_flow());
    }

    #[test]
    fn test_out_of_range_hour_clamps() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();

        press(
            &mut menu,
            &mut table,
            &[
                Key::A,
                Key::Digit(1),
                Key::Digit(1),
                Key::Digit(7),
                Key::Digit(5), // "75" -> clamps to 23
                Key::Hash,
                Key::Digit(9),
                Key::Digit(9), // "99" -> clamps to 59
                Key::Hash,
            ],
        );

        assert_eq!(table.get(0), Some(&DoseEntry::new(23, 59)));
    }

    #[test]
    fn test_star_clears_pending_digits() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();

        press(
            &mut menu,
            &mut table,
            &[
                Key::A,
                Key::Digit(1),
                Key::Digit(1),
                Key::Digit(7),
                Key::Star, // wipe the 7
                Key::Digit(9),
                Key::Hash, // hour = 9
                Key::Digit(0),
                Key::Hash,
            ],
        );

        assert_eq!(table.get(0), Some(&DoseEntry::new(9, 0)));
    }

    #[test]
    fn test_cancel_discards_without_commit() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();

        let action = press(
            &mut menu,
            &mut table,
            &[Key::A, Key::Digit(3), Key::Digit(1), Key::Digit(8), Key::D],
        );

        assert_eq!(action, MenuAction::Redraw);
        assert_eq!(table.get(2), Some(&DoseEntry::default()));
        assert!(!menu.in_flow());
    }

    #[test]
    fn test_third_digit_is_ignored() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();

        press(
            &mut menu,
            &mut table,
            &[
                Key::A,
                Key::Digit(1),
                Key::Digit(1),
                Key::Digit(1),
                Key::Digit(2),
                Key::Digit(9), // ignored, field already has two digits
                Key::Hash,
                Key::Hash,
            ],
        );

        assert_eq!(table.get(0), Some(&DoseEntry::new(12, 0)));
    }

    #[test]
    fn test_deactivating_a_slot() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();
        table.set(0, DoseEntry::new(8, 0));

        press(
            &mut menu,
            &mut table,
            &[Key::A, Key::Digit(1), Key::Digit(0), Key::Hash, Key::Hash],
        );

        assert!(table.get(0).is_some_and(|e| !e.active));
    }

    #[test]
    fn test_review_steps_through_active_slots() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();
        table.set(1, DoseEntry::new(8, 0));
        table.set(3, DoseEntry::new(20, 0));

        menu.handle_key(Key::B, &mut table);
        let screen = menu.render(&table, &TimeOfDay::new(7, 0, 0));
        assert_eq!(screen.lines[0].as_str(), "Slot 2  08:00");

        menu.handle_key(Key::Hash, &mut table);
        let screen = menu.render(&table, &TimeOfDay::new(7, 0, 0));
        assert_eq!(screen.lines[0].as_str(), "Slot 4  20:00");

        // Wraps back to the first active slot.
        menu.handle_key(Key::Hash, &mut table);
        let screen = menu.render(&table, &TimeOfDay::new(7, 0, 0));
        assert_eq!(screen.lines[0].as_str(), "Slot 2  08:00");
    }

    #[test]
    fn test_review_with_empty_table() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();

        menu.handle_key(Key::B, &mut table);
        let screen = menu.render(&table, &TimeOfDay::new(7, 0, 0));
        assert_eq!(screen.lines[0].as_str(), "No active slots");
    }

    #[test]
    fn test_manual_test_requires_confirmation() {
        let mut menu = Menu::new();
        let mut table = ScheduleTable::new();

        assert_eq!(menu.handle_key(Key::C, &mut table), MenuAction::Redraw);
        assert_eq!(
            menu.handle_key(Key::Hash, &mut table),
            MenuAction::ManualDispense
        );

        // Declined: no dispense.
        menu.handle_key(Key::C, &mut table);
        assert_eq!(menu.handle_key(Key::D, &mut table), MenuAction::Redraw);
    }

    #[test]
    fn test_idle_screen_shows_next_dose() {
        let menu = Menu::new();
        let mut table = ScheduleTable::new();
        table.set(0, DoseEntry::new(0, 10));

        let screen = menu.render(&table, &TimeOfDay::new(23, 50, 0));
        assert_eq!(screen.lines[0].as_str(), "Remedi     23:50");
        assert_eq!(screen.lines[1].as_str(), "Next dose 0h20m");
    }

    #[test]
    fn test_idle_screen_without_doses() {
        let menu = Menu::new();
        let table = ScheduleTable::new();
        let screen = menu.render(&table, &TimeOfDay::new(9, 15, 0));
        assert_eq!(screen.lines[1].as_str(), "No doses set");
    }
}
