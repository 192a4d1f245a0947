//! Main controller coordinating scheduler, sequencer, menu, and power
//!
//! The controller is the single main-context owner of all hardware
//! traits. One call to [`Controller::run_once`] is one main-loop
//! iteration: it services a running dispense sequence, feeds key
//! events to the menu, polls the schedule at 1 Hz, and executes the
//! sleep/wake protocol. Interrupt context only ever touches the
//! [`WakeFlags`] it is given a reference to.

use heapless::Vec;

use crate::dispense::{SequenceAction, Sequencer, BEEP_FREQ_HZ, BEEP_MS};
use crate::menu::{Menu, MenuAction, Screen};
use crate::power::{FaultKind, PowerEvent, PowerManager, PowerState, WakeFlags, WakeReason};
use crate::schedule::{ScheduleTable, SLOT_COUNT};
use crate::scheduler::{self, POLL_INTERVAL_MS};
use crate::traits::{
    CharDisplay, GateActuator, Indicator, Keypad, ScheduleStorage, SleepControl, TimeOfDay,
    WallClock, DISPLAY_COLS,
};

/// The firmware control loop
pub struct Controller<'w, C, D, K, S, A, I, P> {
    clock: C,
    display: D,
    keypad: K,
    storage: S,
    gates: A,
    indicator: I,
    sleep: P,
    wake: &'w WakeFlags,

    table: ScheduleTable,
    menu: Menu,
    power: PowerManager,
    sequencer: Sequencer,
    /// Slots still owed a dispense this cycle, lowest index first
    pending: Vec<u8, SLOT_COUNT>,
    last_ms: u32,
    last_poll_ms: u32,
    last_time: TimeOfDay,
}

impl<'w, C, D, K, S, A, I, P> Controller<'w, C, D, K, S, A, I, P>
where
    C: WallClock,
    D: CharDisplay,
    K: Keypad,
    S: ScheduleStorage,
    A: GateActuator,
    I: Indicator,
    P: SleepControl,
{
    /// Create a controller over the given hardware
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: C,
        display: D,
        keypad: K,
        storage: S,
        gates: A,
        indicator: I,
        sleep: P,
        wake: &'w WakeFlags,
    ) -> Self {
        Self {
            clock,
            display,
            keypad,
            storage,
            gates,
            indicator,
            sleep,
            wake,
            table: ScheduleTable::new(),
            menu: Menu::new(),
            power: PowerManager::new(),
            sequencer: Sequencer::new(),
            pending: Vec::new(),
            last_ms: 0,
            last_poll_ms: 0,
            last_time: TimeOfDay::new(0, 0, 0),
        }
    }

    /// Override the inactivity timeout (before `boot`)
    pub fn set_sleep_timeout(&mut self, timeout_ms: u32) {
        self.power = PowerManager::with_timeout(timeout_ms);
    }

    /// Boot: verify the clock, load the schedule, draw the idle screen
    ///
    /// A dead clock is fatal here: the device parks behind a visible
    /// message rather than miscounting time.
    pub fn boot(&mut self) -> Result<(), FaultKind> {
        let now = self.read_clock()?;
        self.last_time = now;

        self.table = ScheduleTable::load(&mut self.storage);

        self.display.power(true);
        self.display.backlight(true);
        self.indicator.led(false);
        self.redraw();
        Ok(())
    }

    /// One main-loop iteration
    ///
    /// `now_ms` is a monotonic millisecond timestamp; wraparound is
    /// handled. Returns the fault once the device has parked.
    pub fn run_once(&mut self, now_ms: u32) -> Result<(), FaultKind> {
        if let PowerState::Fault(kind) = self.power.state() {
            return Err(kind);
        }

        let delta_ms = now_ms.wrapping_sub(self.last_ms);
        self.last_ms = now_ms;

        // A running sequence owns the loop: no key handling and no
        // schedule re-checks until it completes.
        if self.sequencer.is_active() {
            self.service_sequence(now_ms);
            return Ok(());
        }

        // Next dose owed from the last schedule check, index order.
        if !self.pending.is_empty() {
            let slot = self.pending.remove(0);
            self.table.mark_dispensed(slot as usize);
            self.start_sequence(now_ms);
            return Ok(());
        }

        match self.power.state() {
            PowerState::Active => self.run_active(now_ms, delta_ms),
            PowerState::Sleeping => self.run_sleeping(now_ms),
            PowerState::Fault(kind) => Err(kind),
        }
    }

    /// Current schedule table
    pub fn table(&self) -> &ScheduleTable {
        &self.table
    }

    /// Current power state
    pub fn power_state(&self) -> PowerState {
        self.power.state()
    }

    /// True while a dispense sequence is running or queued
    pub fn is_dispensing(&self) -> bool {
        self.sequencer.is_active() || !self.pending.is_empty()
    }

    fn run_active(&mut self, now_ms: u32, delta_ms: u32) -> Result<(), FaultKind> {
        if let Some(key) = self.keypad.poll_key() {
            self.power.note_activity();
            match self.menu.handle_key(key, &mut self.table) {
                MenuAction::CommitSchedule => {
                    self.redraw();
                    if self.table.save(&mut self.storage).is_err() {
                        // Transient notice; the next 1 Hz redraw clears it.
                        self.display.set_cursor(1, 0);
                        self.print_padded("SAVE FAILED");
                    }
                }
                MenuAction::ManualDispense => {
                    self.start_sequence(now_ms);
                    return Ok(());
                }
                MenuAction::Redraw => self.redraw(),
                MenuAction::None => {}
            }
        }

        if now_ms.wrapping_sub(self.last_poll_ms) >= POLL_INTERVAL_MS {
            self.last_poll_ms = now_ms;
            let now = self.read_clock()?;
            self.last_time = now;

            if scheduler::is_rollover_minute(&now) {
                // Rollover cycle: clear flags, dispense nothing.
                scheduler::midnight_reset(&mut self.table);
            } else {
                self.pending = scheduler::due_slots(&self.table, &now);
            }

            if !self.menu.in_flow() {
                self.redraw();
            }
        }

        let inhibited = self.menu.in_flow() || !self.pending.is_empty();
        if self.power.tick(delta_ms, inhibited) {
            self.enter_sleep();
        }
        Ok(())
    }

    fn run_sleeping(&mut self, now_ms: u32) -> Result<(), FaultKind> {
        match self.wake.take() {
            Some(WakeReason::Button) => {
                self.power.apply(PowerEvent::ButtonWake);
                self.sleep.disarm_periodic_wake();
                self.sleep.peripherals_on();
                self.display.power(true);
                self.display.backlight(true);
                self.wake_chirp();

                let now = self.read_clock()?;
                self.last_time = now;
                self.last_poll_ms = now_ms;
                self.menu.reset();
                self.redraw();
            }
            Some(WakeReason::Watchdog) => {
                // Evaluate the schedule without touching the display.
                let now = self.read_clock()?;
                self.last_time = now;

                if scheduler::is_rollover_minute(&now) {
                    scheduler::midnight_reset(&mut self.table);
                }
                let dose_due = scheduler::medication_due(&self.table, &now);
                self.power.apply(PowerEvent::PeriodicWake { dose_due });

                if dose_due {
                    self.pending = scheduler::due_slots(&self.table, &now);
                    self.sleep.disarm_periodic_wake();
                    self.sleep.peripherals_on();
                    self.display.power(true);
                    self.display.backlight(true);
                    self.last_poll_ms = now_ms;
                    self.redraw();
                } else {
                    // Nothing due: re-arm and halt again immediately.
                    self.sleep.arm_periodic_wake();
                    self.sleep.halt();
                }
            }
            None => self.sleep.halt(),
        }
        Ok(())
    }

    /// Sleep-entry actions; the halt itself happens on the next
    /// iteration once no wake is latched
    fn enter_sleep(&mut self) {
        // Edges latched while awake are stale; dropping them here
        // keeps them from replaying as wakes.
        self.wake.clear();
        self.menu.reset();
        self.display.backlight(false);
        self.display.power(false);
        self.sleep.peripherals_off();
        self.sleep.arm_periodic_wake();
    }

    fn start_sequence(&mut self, now_ms: u32) {
        self.paint_raw("Dispensing...", "");
        if let Some(SequenceAction::Gate(gate, position)) = self.sequencer.start(now_ms) {
            self.gates.set(gate, position);
        }
    }

    fn service_sequence(&mut self, now_ms: u32) {
        match self.sequencer.poll(now_ms) {
            Some(SequenceAction::Gate(gate, position)) => self.gates.set(gate, position),
            Some(SequenceAction::Beep) => self.indicator.beep(BEEP_FREQ_HZ, BEEP_MS),
            Some(SequenceAction::Finished) => {
                self.power.note_activity();
                self.redraw();
            }
            None => {}
        }
    }

    /// Distinct wake confirmation pattern
    fn wake_chirp(&mut self) {
        self.indicator.led(true);
        self.indicator.beep(2000, 40);
        self.indicator.beep(2500, 40);
        self.indicator.led(false);
    }

    fn read_clock(&mut self) -> Result<TimeOfDay, FaultKind> {
        match self.clock.now() {
            Ok(now) if now.is_valid() => Ok(now),
            _ => Err(self.clock_fault()),
        }
    }

    /// Park behind a visible message; no dose is dispensed on
    /// unreliable time
    fn clock_fault(&mut self) -> FaultKind {
        let kind = FaultKind::ClockUnavailable;
        self.power.fault(kind);
        self.pending.clear();
        self.sleep.disarm_periodic_wake();
        self.display.power(true);
        self.display.backlight(true);
        self.paint_raw("CLOCK FAULT", "check battery");
        self.indicator.led(true);
        kind
    }

    fn redraw(&mut self) {
        let screen = self.menu.render(&self.table, &self.last_time);
        self.paint(&screen);
    }

    fn paint(&mut self, screen: &Screen) {
        for row in 0..screen.lines.len() {
            self.display.set_cursor(row as u8, 0);
            let line = screen.lines[row].clone();
            self.print_padded(line.as_str());
        }
    }

    fn paint_raw(&mut self, top: &str, bottom: &str) {
        self.display.set_cursor(0, 0);
        self.print_padded(top);
        self.display.set_cursor(1, 0);
        self.print_padded(bottom);
    }

    /// Print a line padded to the full width, overwriting stale text
    fn print_padded(&mut self, text: &str) {
        self.display.print(text);
        for _ in text.len()..DISPLAY_COLS {
            self.display.print(" ");
        }
    }
}
