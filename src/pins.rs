//! GPIO / peripheral pin assignments for the BinRush main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Player buttons (momentary, external pull-down, rising-edge interrupts)
// ---------------------------------------------------------------------------

/// The four bit-entry buttons.  Index i toggles bit i of the input mask.
/// `BUTTON_GPIOS[START_BUTTON]` doubles as the start button in the welcome
/// and difficulty-selection phases.
pub const BUTTON_GPIOS: [i32; 4] = [4, 5, 6, 7];

/// Index into [`BUTTON_GPIOS`] of the button that starts a game.
pub const START_BUTTON: usize = 0;

// ---------------------------------------------------------------------------
// Indicator LEDs (one per bit, mirrors the input mask)
// ---------------------------------------------------------------------------

/// Digital outputs: indicator LED i lights when bit i is on.
pub const INDICATOR_GPIOS: [i32; 4] = [15, 16, 17, 18];

// ---------------------------------------------------------------------------
// Status LED (PWM — breathing effect in the welcome phase)
// ---------------------------------------------------------------------------

pub const STATUS_LED_GPIO: i32 = 21;
/// LEDC frequency for the status LED (1 kHz).
pub const STATUS_LED_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Difficulty potentiometer — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Difficulty potentiometer wiper — ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const POT_ADC_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// I2C bus — 20x4 character LCD behind a PCF8574 backpack
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// 7-bit I2C address of the PCF8574 LCD backpack.
pub const LCD_I2C_ADDR: u8 = 0x27;
