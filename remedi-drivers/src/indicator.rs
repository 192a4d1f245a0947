//! LED and buzzer indicator
//!
//! Status LED on a GPIO pin and a buzzer on a tone-capable output
//! (PWM or a hardware tone generator). Beeps block via an
//! `embedded-hal` delay; they only run in the main context.

use embedded_hal::delay::DelayNs;

use remedi_core::traits::Indicator;

use crate::gate::OutputPin;

/// Trait for a tone-capable output (PWM channel or tone generator)
pub trait ToneOutput {
    /// Start emitting a tone at the given frequency
    fn start(&mut self, freq_hz: u16);

    /// Silence the output
    fn stop(&mut self);
}

/// Combined LED + buzzer indicator
pub struct GpioIndicator<P, T, D> {
    led: P,
    tone: T,
    delay: D,
    /// If true, LED ON = pin LOW
    led_inverted: bool,
}

impl<P: OutputPin, T: ToneOutput, D: DelayNs> GpioIndicator<P, T, D> {
    /// Create an indicator; the LED starts off and the buzzer silent
    pub fn new(led: P, tone: T, delay: D, led_inverted: bool) -> Self {
        let mut indicator = Self {
            led,
            tone,
            delay,
            led_inverted,
        };
        indicator.led(false);
        indicator.tone.stop();
        indicator
    }
}

impl<P: OutputPin, T: ToneOutput, D: DelayNs> Indicator for GpioIndicator<P, T, D> {
    fn beep(&mut self, freq_hz: u16, duration_ms: u16) {
        self.tone.start(freq_hz);
        self.delay.delay_ms(duration_ms as u32);
        self.tone.stop();
    }

    fn led(&mut self, on: bool) {
        if on != self.led_inverted {
            self.led.set_high();
        } else {
            self.led.set_low();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }
        fn set_low(&mut self) {
            self.high = false;
        }
        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct MockTone {
        playing: Option<u16>,
        starts: usize,
    }

    impl ToneOutput for MockTone {
        fn start(&mut self, freq_hz: u16) {
            self.playing = Some(freq_hz);
            self.starts += 1;
        }
        fn stop(&mut self) {
            self.playing = None;
        }
    }

    struct MockDelay {
        slept_ms: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.slept_ms += ns / 1_000_000;
        }
    }

    fn indicator() -> GpioIndicator<MockPin, MockTone, MockDelay> {
        GpioIndicator::new(
            MockPin { high: false },
            MockTone {
                playing: None,
                starts: 0,
            },
            MockDelay { slept_ms: 0 },
            false,
        )
    }

    #[test]
    fn test_beep_tones_for_the_duration() {
        let mut ind = indicator();
        ind.beep(4000, 100);

        assert_eq!(ind.tone.starts, 1);
        assert_eq!(ind.tone.playing, None); // silent afterwards
        assert_eq!(ind.delay.slept_ms, 100);
    }

    #[test]
    fn test_led_polarity() {
        let mut ind = indicator();
        ind.led(true);
        assert!(ind.led.is_set_high());
        ind.led(false);
        assert!(!ind.led.is_set_high());

        let mut inverted = GpioIndicator::new(
            MockPin { high: false },
            MockTone {
                playing: None,
                starts: 0,
            },
            MockDelay { slept_ms: 0 },
            true,
        );
        inverted.led(true);
        assert!(!inverted.led.is_set_high());
    }
}
