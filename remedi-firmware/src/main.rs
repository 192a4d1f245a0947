//! Remedi - Medication Dispenser Firmware
//!
//! Main firmware binary for RP2040-based dispenser boards. Wires the
//! board peripherals to the remedi-core controller: RTC wall clock,
//! 16x2 character display, 4x4 keypad, two gate outputs, LED/buzzer
//! indicator and flash-backed schedule storage.
//!
//! All dispensing logic lives in remedi-core; this binary only owns
//! pin assignments, the wake interrupt plumbing and the main loop.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::rtc::Rtc;
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};
use portable_atomic::{AtomicBool, Ordering};
use {defmt_rtt as _, panic_probe as _};

use remedi_core::controller::Controller;
use remedi_core::power::WakeFlags;
use remedi_drivers::gate::{GatePair, GpioGate};
use remedi_drivers::indicator::GpioIndicator;

use crate::hw::clock::RtcClock;
use crate::hw::display::Hd44780;
use crate::hw::flash::{FlashScheduleStorage, FLASH_SIZE};
use crate::hw::io::{PwmTone, RpPin};
use crate::hw::keypad::MatrixKeypad;
use crate::hw::sleep::RpSleep;

mod hw;

/// Main loop period
const TICK_MS: u64 = 10;

/// Periodic wake interval while sleeping
const PERIODIC_WAKE_S: u64 = 8;

/// Wake latches shared with the interrupt-side tasks
static WAKE: WakeFlags = WakeFlags::new();

/// Set while the controller wants periodic wakes
static WAKE_ARMED: AtomicBool = AtomicBool::new(false);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Remedi firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // 16x2 display: RS=GP2 EN=GP3 D4..D7=GP4..GP7, backlight GP8,
    // supply rail switch GP9
    let display = Hd44780::new(
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        [
            Output::new(p.PIN_4, Level::Low),
            Output::new(p.PIN_5, Level::Low),
            Output::new(p.PIN_6, Level::Low),
            Output::new(p.PIN_7, Level::Low),
        ],
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
    );
    info!("Display initialized");

    // 4x4 keypad: rows GP10..GP13 driven, columns GP14 GP15 GP26 GP22
    // on pull-ups
    let keypad = MatrixKeypad::new(
        [
            Output::new(p.PIN_10, Level::High),
            Output::new(p.PIN_11, Level::High),
            Output::new(p.PIN_12, Level::High),
            Output::new(p.PIN_13, Level::High),
        ],
        [
            Input::new(p.PIN_14, Pull::Up),
            Input::new(p.PIN_15, Pull::Up),
            Input::new(p.PIN_26, Pull::Up),
            Input::new(p.PIN_22, Pull::Up),
        ],
    );

    // Release gates: upper GP16, lower GP17, both active-high
    let gates = GatePair::new(
        GpioGate::new_active_high(RpPin(Output::new(p.PIN_16, Level::Low))),
        GpioGate::new_active_high(RpPin(Output::new(p.PIN_17, Level::Low))),
    );

    // Status LED on the board LED, buzzer on PWM GP18
    let buzzer = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, PwmConfig::default());
    let indicator = GpioIndicator::new(
        RpPin(Output::new(p.PIN_25, Level::Low)),
        PwmTone::new(buzzer),
        Delay,
        false,
    );

    // Schedule storage in the last flash sector
    let flash = Flash::<_, _, FLASH_SIZE>::new_blocking(p.FLASH);
    let storage = FlashScheduleStorage::new(flash);

    // Wall clock
    let clock = RtcClock::new(Rtc::new(p.RTC));

    // Peripheral rail switch on GP21
    let sleep = RpSleep::new(&WAKE_ARMED, Output::new(p.PIN_21, Level::High));

    let mut controller = Controller::new(
        clock, display, keypad, storage, gates, indicator, sleep, &WAKE,
    );

    if controller.boot().is_err() {
        // Clock is dead; the controller has painted the fault screen.
        error!("Boot failed: clock unavailable");
        loop {
            Timer::after_secs(60).await;
        }
    }
    info!("Controller booted, schedule loaded");

    // Wake button on GP20, active low
    let button = Input::new(p.PIN_20, Pull::Up);
    spawner.spawn(button_task(button)).unwrap();
    spawner.spawn(periodic_wake_task()).unwrap();
    info!("Wake tasks spawned, entering main loop");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    let mut faulted = false;
    loop {
        ticker.next().await;
        let now_ms = Instant::now().as_millis() as u32;
        if controller.run_once(now_ms).is_err() && !faulted {
            faulted = true;
            error!("Controller parked on clock fault");
        }
    }
}

/// Latches a debounced button wake on every falling edge
#[embassy_executor::task]
async fn button_task(mut button: Input<'static>) {
    loop {
        button.wait_for_falling_edge().await;
        let now_ms = Instant::now().as_millis() as u32;
        if WAKE.signal_button(now_ms) {
            debug!("Button wake at {}ms", now_ms);
        }
    }
}

/// Periodic wake source, active only while armed
#[embassy_executor::task]
async fn periodic_wake_task() {
    loop {
        Timer::after_secs(PERIODIC_WAKE_S).await;
        if WAKE_ARMED.load(Ordering::Acquire) {
            WAKE.signal_watchdog();
        }
    }
}
