//! Adapters between embassy-rp peripherals and the driver traits

use embassy_rp::gpio::Output;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};

use remedi_drivers::gate::OutputPin;
use remedi_drivers::indicator::ToneOutput;

/// embassy-rp GPIO output as a driver pin
pub struct RpPin(pub Output<'static>);

impl OutputPin for RpPin {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Buzzer tone over a PWM slice
///
/// The counter runs at the 125MHz system clock, so the lowest usable
/// frequency is just under 2kHz (top must fit u16). The indicator
/// tones are 2kHz and above.
pub struct PwmTone {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmTone {
    pub fn new(pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.compare_a = 0;
        let mut tone = Self { pwm, config };
        tone.stop();
        tone
    }
}

impl ToneOutput for PwmTone {
    fn start(&mut self, freq_hz: u16) {
        let top = (125_000_000u32 / freq_hz.max(2000) as u32) as u16;
        self.config.top = top;
        self.config.compare_a = top / 2; // 50% duty square wave
        self.pwm.set_config(&self.config);
    }

    fn stop(&mut self) {
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
    }
}
