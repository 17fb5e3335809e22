//! Task Watchdog Timer (TWDT) driver.
//!
//! Subscribes the game loop's task to the TWDT so a stalled loop resets the
//! device.  The timeout budget must cover the longest blocking stretch the
//! loop legitimately takes — the game-over LED hold plus a settle delay —
//! which it does with a wide margin.  Light sleep gates the TWDT clock, so
//! the Sleeping halt needs no special handling.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Reconfigure the TWDT to `timeout_ms` and subscribe the current task.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TWDT calls from the single main task during boot.
            let subscribed = unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                if esp_task_wdt_reconfigure(&cfg) != ESP_OK {
                    log::warn!("watchdog: reconfigure refused (already configured?)");
                }
                esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK
            };
            if subscribed {
                log::info!("watchdog: armed ({timeout_ms}ms, panic on trigger)");
            } else {
                log::warn!("watchdog: subscribe failed — running unsupervised");
            }
            Self { subscribed }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let _ = timeout_ms;
            log::info!("watchdog(sim): no-op");
            Self {}
        }
    }

    /// Feed the watchdog.  Call once per game-loop pass.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: reset on a subscribed task handle.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}
