//! Board adapter — one struct satisfying every hardware-facing port.
//!
//! Bundles the LED drivers and the power manager behind the
//! `SensorPort + ActuatorPort + PowerPort + DelayNs` bound the game
//! service takes, so the domain sees ports and never the drivers.

use embedded_hal::delay::DelayNs;

use crate::difficulty::SENSOR_MAX;
use crate::drivers::hw_init;
use crate::drivers::indicators::Indicators;
use crate::drivers::status_led::StatusLed;
use crate::game::ports::{ActuatorPort, PowerPort, SensorPort};
use crate::pins;
use crate::power::PowerManager;

pub struct Board<'a> {
    status_led: StatusLed,
    indicators: Indicators,
    power: PowerManager<'a>,
}

impl<'a> Board<'a> {
    pub fn new(power: PowerManager<'a>) -> Self {
        Self {
            status_led: StatusLed::new(),
            indicators: Indicators::new(),
            power,
        }
    }
}

impl SensorPort for Board<'_> {
    fn read_difficulty_raw(&mut self) -> u16 {
        // 12-bit ADC scaled down to the 10-bit range the tiers are cut on.
        (hw_init::adc1_read(hw_init::ADC1_CH_POT) >> 2).min(SENSOR_MAX)
    }

    fn start_button_level(&mut self) -> bool {
        hw_init::gpio_read(pins::BUTTON_GPIOS[pins::START_BUTTON])
    }
}

impl ActuatorPort for Board<'_> {
    fn set_status_led(&mut self, level: u8) {
        self.status_led.set_level(level);
    }

    fn set_indicators(&mut self, mask: u8) {
        self.indicators.apply(mask);
    }

    fn all_off(&mut self) {
        self.status_led.off();
        self.indicators.clear();
    }
}

impl PowerPort for Board<'_> {
    fn halt_until_wake(&mut self) {
        self.power.halt_until_wake();
    }
}

impl DelayNs for Board<'_> {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::FreeRtos.delay_ns(ns);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
