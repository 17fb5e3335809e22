//! Status LED driver.
//!
//! One LEDC PWM channel drives the single status LED: the breathing ramp
//! in the welcome phase and the full-on hold on game over.
//!
//! On ESP-IDF the level goes to the LEDC duty register via hw_init; on
//! host/test targets only the in-memory level is tracked.

use crate::drivers::hw_init;

pub struct StatusLed {
    level: u8,
}

impl StatusLed {
    pub fn new() -> Self {
        Self { level: 0 }
    }

    pub fn set_level(&mut self, level: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_STATUS, level);
        self.level = level;
    }

    pub fn off(&mut self) {
        self.set_level(0);
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}
