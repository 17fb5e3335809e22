//! One-shot hardware peripheral initialization.
//!
//! Configures the difficulty-pot ADC channel, button/indicator GPIO
//! directions, the status-LED LEDC channel, and the LCD I2C bus using raw
//! ESP-IDF sys calls.  Called once from `main()` before the game loop
//! starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed,
    I2cInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
            Self::I2cInitFailed(rc) => write!(f, "I2C master init failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the game loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc();
        init_i2c()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) — difficulty potentiometer ──────────────────

/// ADC1 channel wired to the pot wiper (channel 0 = GPIO 1 on ESP32-S3).
pub const ADC1_CH_POT: u32 = 0;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: written once in `init_adc()` before the game loop; afterwards
/// only the main-loop read path touches it.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_POT, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=difficulty pot)", ADC1_CH_POT);
    Ok(())
}

/// Raw 12-bit read of the given ADC1 channel; 0 on read failure.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

// ── GPIO Inputs — four buttons ────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    for &pin in &pins::BUTTON_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: button inputs configured (rising edge)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

// ── GPIO Outputs — indicator LEDs ─────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in &pins::INDICATOR_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: indicator outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    // Indicator mirroring also calls this from the button ISR; the write is
    // a single register access.
    unsafe {
        gpio_set_level(pin, i32::from(high) as u32);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC PWM — status LED ────────────────────────────────────

pub const LEDC_CH_STATUS: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() {
    // Timer 0: status LED (1 kHz, 8-bit).
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::STATUS_LED_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    unsafe {
        ledc_timer_config(&timer0);
    }

    unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: LEDC_CH_STATUS,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::STATUS_LED_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        });
    }

    info!("hw_init: LEDC configured (status LED=CH{})", LEDC_CH_STATUS);
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: the channel was configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

// ── I2C master — LCD backpack ────────────────────────────────

#[cfg(target_os = "espidf")]
const I2C_PORT: i32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_i2c() -> Result<(), HwInitError> {
    let mut cfg: i2c_config_t = unsafe { core::mem::zeroed() };
    cfg.mode = i2c_mode_t_I2C_MODE_MASTER;
    cfg.sda_io_num = pins::I2C_SDA_GPIO;
    cfg.scl_io_num = pins::I2C_SCL_GPIO;
    cfg.sda_pullup_en = true;
    cfg.scl_pullup_en = true;
    cfg.__bindgen_anon_1.master.clk_speed = 100_000;

    let ret = unsafe { i2c_param_config(I2C_PORT, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    let ret = unsafe { i2c_driver_install(I2C_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }

    info!("hw_init: I2C master up (SDA={}, SCL={})", pins::I2C_SDA_GPIO, pins::I2C_SCL_GPIO);
    Ok(())
}

/// Write `data` to a 7-bit I2C device address.  Returns the IDF error code
/// on failure.
#[cfg(target_os = "espidf")]
pub fn i2c_write(addr: u8, data: &[u8]) -> Result<(), i32> {
    // SAFETY: the driver was installed in init_i2c(); only the main loop
    // issues transactions on this port.
    let ret = unsafe {
        i2c_master_write_to_device(
            I2C_PORT,
            addr,
            data.as_ptr(),
            data.len(),
            100, // ticks — bounded wait, a hung bus drops the frame
        )
    };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_write(_addr: u8, _data: &[u8]) -> Result<(), i32> {
    Ok(())
}

// ── GPIO ISR Service — button edges ──────────────────────────

#[cfg(target_os = "espidf")]
use crate::config::DEBOUNCE_MS;
#[cfg(target_os = "espidf")]
use crate::drivers::buttons::{on_button_edge, EdgeOutcome};
#[cfg(target_os = "espidf")]
use crate::shared::SHARED;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    // The registered argument is the line index, smuggled through the
    // pointer payload.
    let line = arg as usize as u8;
    // SAFETY: esp_timer_get_time is an RTC counter read; safe in ISR context.
    let now_ms = ((unsafe { esp_timer_get_time() }) / 1_000) as u32;

    if let EdgeOutcome::Toggled { line, on } = on_button_edge(&SHARED, line, now_ms, DEBOUNCE_MS) {
        // Mirror the new bit onto its indicator LED immediately.
        gpio_write(pins::INDICATOR_GPIOS[line as usize], on);
    }
}

/// Install the per-pin GPIO ISR service and register the four button edge
/// handlers.  Call after `init_peripherals()` and before the game loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handler registered
    // below only touches the lock-free shared cells and one GPIO register.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for (line, &pin) in pins::BUTTON_GPIOS.iter().enumerate() {
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_POSEDGE);
            gpio_isr_handler_add(pin, Some(button_gpio_isr), line as *mut core::ffi::c_void);
            gpio_intr_enable(pin);
        }

        info!("hw_init: ISR service installed (4 button lines)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
