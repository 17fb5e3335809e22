//! Power manager — the idle→sleep→wake cycle's blocking halt.
//!
//! On device this is ESP-IDF light sleep with GPIO wakeup armed on all four
//! button lines: the CPU stops until any button edge fires, the pending
//! GPIO interrupt runs on resume (setting the wake flag in the shared
//! cells), and `halt_until_wake` returns.
//!
//! On host targets the halt is simulated as a condition wait with the same
//! wake predicate, so the Sleeping phase behaves identically under test.

use log::info;

use crate::shared::SharedState;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct PowerManager<'a> {
    shared: &'a SharedState,
}

impl<'a> PowerManager<'a> {
    /// Arm GPIO wakeup on the button lines (device) and bind the wake
    /// predicate.  Call once at boot, after the pins are configured.
    pub fn new(shared: &'a SharedState) -> Self {
        #[cfg(target_os = "espidf")]
        // SAFETY: called once from the main task after init_peripherals();
        // the pins are already configured as inputs.
        unsafe {
            for &pin in &crate::pins::BUTTON_GPIOS {
                gpio_wakeup_enable(pin, gpio_int_type_t_GPIO_INTR_HIGH_LEVEL);
            }
            esp_sleep_enable_gpio_wakeup();
        }

        Self { shared }
    }

    /// Block in the low-power halt until a button interrupt arrives.
    #[cfg(target_os = "espidf")]
    pub fn halt_until_wake(&mut self) {
        // SAFETY: light sleep from the main task; peripherals resume where
        // they were, the pending GPIO interrupt is serviced on wake.
        unsafe {
            esp_light_sleep_start();
        }
        info!("power: resumed (wake pending={})", self.shared.wake_pending());
    }

    /// Host simulation: wait until the wake predicate holds.
    #[cfg(not(target_os = "espidf"))]
    pub fn halt_until_wake(&mut self) {
        while !self.shared.wake_pending() {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        info!("power(sim): resumed (wake pending=true)");
    }
}
