//! Green / red status LEDs.
//!
//! Green is lit while a sampling cycle runs, red while idle.  A sensor
//! fault blinks red a few times and leaves it lit.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives two GPIO outputs via hw_init.
//! On host/test: hw_init records the levels.  The blink timing comes from
//! whatever [`DelayNs`] the caller hands in.

use embedded_hal::delay::DelayNs;

use crate::drivers::hw_init;

/// Blinks shown on a sensor fault.
const FAULT_BLINKS: u8 = 3;
const FAULT_BLINK_MS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indication {
    Idle,
    Busy,
}

pub struct StatusIndicator<D> {
    green_gpio: i32,
    red_gpio: i32,
    current: Indication,
    delay: D,
}

impl<D: DelayNs> StatusIndicator<D> {
    /// Bind both LEDs and show idle.
    pub fn new(green_gpio: i32, red_gpio: i32, delay: D) -> Self {
        let mut led = Self {
            green_gpio,
            red_gpio,
            current: Indication::Idle,
            delay,
        };
        led.show(Indication::Idle);
        led
    }

    pub fn show(&mut self, indication: Indication) {
        let busy = indication == Indication::Busy;
        hw_init::gpio_write(self.green_gpio, busy);
        hw_init::gpio_write(self.red_gpio, !busy);
        self.current = indication;
    }

    /// Blink red, then settle on idle.
    pub fn blink_fault(&mut self) {
        hw_init::gpio_write(self.green_gpio, false);
        for _ in 0..FAULT_BLINKS {
            hw_init::gpio_write(self.red_gpio, false);
            self.delay.delay_ms(FAULT_BLINK_MS);
            hw_init::gpio_write(self.red_gpio, true);
            self.delay.delay_ms(FAULT_BLINK_MS);
        }
        self.current = Indication::Idle;
    }

    pub fn current(&self) -> Indication {
        self.current
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    const GREEN: i32 = 41;
    const RED: i32 = 42;

    /// Counts requested pause time instead of sleeping.
    #[derive(Default)]
    struct Elapsed(u64);

    impl DelayNs for Elapsed {
        fn delay_ns(&mut self, ns: u32) {
            self.0 += u64::from(ns);
        }
    }

    #[test]
    fn busy_and_idle_are_exclusive() {
        let mut led = StatusIndicator::new(GREEN, RED, Elapsed::default());
        assert_eq!(led.current(), Indication::Idle);
        assert!(hw_init::sim_gpio_level(RED));
        assert!(!hw_init::sim_gpio_level(GREEN));

        led.show(Indication::Busy);
        assert!(hw_init::sim_gpio_level(GREEN));
        assert!(!hw_init::sim_gpio_level(RED));

        led.blink_fault();
        assert_eq!(led.delay.0, 2 * 3 * 150 * 1_000_000);
        assert_eq!(led.current(), Indication::Idle);
        assert!(hw_init::sim_gpio_level(RED));
        assert!(!hw_init::sim_gpio_level(GREEN));
    }
}
