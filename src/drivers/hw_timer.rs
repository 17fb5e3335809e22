//! Hardware sub-tick source using ESP-IDF's esp_timer API.
//!
//! One periodic esp_timer drives [`scheduler::on_sub_tick`] — this is the
//! single shared hardware timer every logical timeout reuses.  Timer
//! callbacks execute in the ESP timer task context (not a raw ISR), so the
//! atomic shared-cell stores in the dispatch are safe.
//!
//! On simulation targets the tick source is inert; tests drive the
//! scheduler's dispatch function directly.

use crate::scheduler::SubTickTimer;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::error;

#[cfg(target_os = "espidf")]
static mut GAME_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: GAME_TIMER is written once on the first `start_periodic` from
/// the single main task, before any callback can observe it.
#[cfg(target_os = "espidf")]
unsafe fn game_timer() -> esp_timer_handle_t {
    unsafe { GAME_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn game_timer_cb(_arg: *mut core::ffi::c_void) {
    crate::scheduler::on_sub_tick(&crate::shared::SHARED);
}

/// The singleton hardware timer behind [`RoundScheduler`].
///
/// [`RoundScheduler`]: crate::scheduler::RoundScheduler
pub struct HwTimer {
    _private: (),
}

impl HwTimer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    #[cfg(target_os = "espidf")]
    fn ensure_created(&mut self) -> bool {
        // SAFETY: single main-task caller; GAME_TIMER written once here.
        unsafe {
            if !game_timer().is_null() {
                return true;
            }
            let args = esp_timer_create_args_t {
                callback: Some(game_timer_cb),
                arg: core::ptr::null_mut(),
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: c"game".as_ptr(),
                skip_unhandled_events: false,
            };
            let ret = esp_timer_create(&args, &raw mut GAME_TIMER);
            if ret != ESP_OK {
                error!("hw_timer: create failed (rc={}) — no timeouts will fire", ret);
                return false;
            }
            true
        }
    }
}

#[cfg(target_os = "espidf")]
impl SubTickTimer for HwTimer {
    fn start_periodic(&mut self, period_us: u32) {
        if !self.ensure_created() {
            return;
        }
        // SAFETY: game_timer() contract — handle valid once created; stop on
        // a not-running timer returns an ignorable error code.
        unsafe {
            esp_timer_stop(game_timer());
            let ret = esp_timer_start_periodic(game_timer(), u64::from(period_us));
            if ret != ESP_OK {
                error!("hw_timer: start failed (rc={})", ret);
            }
        }
    }

    fn stop(&mut self) {
        // SAFETY: null-check guards the never-created case.
        unsafe {
            let t = game_timer();
            if !t.is_null() {
                esp_timer_stop(t);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl SubTickTimer for HwTimer {
    fn start_periodic(&mut self, _period_us: u32) {
        log::info!("hw_timer(sim): periodic tick not started");
    }

    fn stop(&mut self) {}
}
