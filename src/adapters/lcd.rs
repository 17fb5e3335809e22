//! 20x4 character LCD adapter (HD44780 behind a PCF8574 I2C backpack).
//!
//! Implements [`DisplayPort`] with the game's fixed screen layouts.  The
//! low-level path is dual-target:
//!
//! - **ESP-IDF** — 4-bit HD44780 protocol bit-banged through the PCF8574
//!   expander via raw I2C writes.  A failing bus disables the display and
//!   drops frames; it never takes the game down.
//! - **Host** — an in-memory 4x20 character grid the integration tests can
//!   read back line by line.

use core::fmt::Write as _;

use heapless::String;
use log::warn;

use crate::difficulty::Difficulty;
use crate::game::ports::DisplayPort;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

pub const COLS: usize = 20;
pub const ROWS: usize = 4;

/// DDRAM base address of each row on a 20x4 panel.
#[cfg(target_os = "espidf")]
const ROW_ADDR: [u8; ROWS] = [0x00, 0x40, 0x14, 0x54];

// PCF8574 bit assignments on the common backpack.
#[cfg(target_os = "espidf")]
const BACKLIGHT: u8 = 0x08;
#[cfg(target_os = "espidf")]
const ENABLE: u8 = 0x04;
#[cfg(target_os = "espidf")]
const RS: u8 = 0x01;

/// Column of difficulty-menu slot `i` (slots at 3, 7, 11, 15).
fn col_pos(i: usize) -> usize {
    3 + 4 * i
}

/// I2C bus failure while talking to the backpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdError(pub i32);

impl core::fmt::Display for LcdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "I2C write failed (rc={})", self.0)
    }
}

pub struct Lcd {
    ready: bool,
    #[cfg(not(target_os = "espidf"))]
    screen: [[u8; COLS]; ROWS],
}

impl Lcd {
    /// Bring the panel up.  On bus failure the adapter logs once and goes
    /// dark; every render becomes a no-op.
    pub fn new() -> Self {
        let mut lcd = Self {
            ready: false,
            #[cfg(not(target_os = "espidf"))]
            screen: [[b' '; COLS]; ROWS],
        };
        match lcd.init() {
            Ok(()) => lcd.ready = true,
            Err(e) => warn!("lcd: init failed ({e}) — display disabled"),
        }
        lcd
    }

    // ── Low level: ESP-IDF ────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn init(&mut self) -> Result<(), LcdError> {
        // HD44780 4-bit wake-up dance, then function set / display on /
        // clear / entry mode.
        Self::delay_us(50_000);
        for _ in 0..3 {
            self.write_half(0x03, false)?;
            Self::delay_us(5_000);
        }
        self.write_half(0x02, false)?;
        self.command(0x28)?; // 4-bit, 2 lines (4-line panels alias), 5x8 font
        self.command(0x0C)?; // display on, cursor off
        self.command(0x01)?; // clear
        Self::delay_us(2_000);
        self.command(0x06)?; // entry mode: increment, no shift
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn delay_us(us: u32) {
        // SAFETY: busy-wait ROM routine; bounded by the init sequence.
        unsafe { esp_idf_svc::sys::esp_rom_delay_us(us) };
    }

    #[cfg(target_os = "espidf")]
    fn write_half(&self, nibble: u8, rs: bool) -> Result<(), LcdError> {
        let base = (nibble << 4) | BACKLIGHT | if rs { RS } else { 0 };
        for byte in [base | ENABLE, base] {
            hw_init::i2c_write(pins::LCD_I2C_ADDR, &[byte]).map_err(LcdError)?;
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn command(&self, cmd: u8) -> Result<(), LcdError> {
        self.write_half(cmd >> 4, false)?;
        self.write_half(cmd & 0x0F, false)
    }

    #[cfg(target_os = "espidf")]
    fn putc(&self, ch: u8) -> Result<(), LcdError> {
        self.write_half(ch >> 4, true)?;
        self.write_half(ch & 0x0F, true)
    }

    #[cfg(target_os = "espidf")]
    fn fail(&mut self, e: LcdError) {
        self.ready = false;
        warn!("lcd: {e} — display disabled");
    }

    #[cfg(target_os = "espidf")]
    fn clear(&mut self) {
        if !self.ready {
            return;
        }
        match self.command(0x01) {
            Ok(()) => Self::delay_us(2_000),
            Err(e) => self.fail(e),
        }
    }

    #[cfg(target_os = "espidf")]
    fn print_at(&mut self, col: usize, row: usize, text: &str) {
        if !self.ready || row >= ROWS {
            return;
        }
        if let Err(e) = self.command(0x80 | (ROW_ADDR[row] + col as u8)) {
            self.fail(e);
            return;
        }
        for (i, ch) in text.bytes().enumerate() {
            if col + i >= COLS {
                break;
            }
            if let Err(e) = self.putc(ch) {
                self.fail(e);
                return;
            }
        }
    }

    // ── Low level: host grid ──────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn init(&mut self) -> Result<(), LcdError> {
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn clear(&mut self) {
        self.screen = [[b' '; COLS]; ROWS];
    }

    #[cfg(not(target_os = "espidf"))]
    fn print_at(&mut self, col: usize, row: usize, text: &str) {
        if !self.ready || row >= ROWS {
            return;
        }
        for (i, ch) in text.bytes().enumerate() {
            if col + i >= COLS {
                break;
            }
            self.screen[row][col + i] = ch;
        }
    }

    /// Read back one rendered row (host targets — test inspection).
    #[cfg(not(target_os = "espidf"))]
    pub fn line(&self, row: usize) -> &str {
        core::str::from_utf8(&self.screen[row]).unwrap_or("")
    }
}

impl DisplayPort for Lcd {
    fn render_welcome(&mut self) {
        self.clear();
        self.print_at(3, 1, "Welcome to GMB");
        self.print_at(6, 2, "Press B1");
    }

    fn render_difficulty_menu(&mut self, current: Difficulty) {
        self.clear();
        self.print_at(2, 0, "Set difficulty");
        self.print_at(2, 1, "of the game...");
        for i in 0..Difficulty::COUNT {
            let mut slot: String<2> = String::new();
            let _ = write!(slot, "{}", i + 1);
            self.print_at(col_pos(i), 2, &slot);
            self.print_at(col_pos(i), 3, if i == current.index() { "-" } else { " " });
        }
    }

    fn render_difficulty_update(&mut self, current: Difficulty) {
        for i in 0..Difficulty::COUNT {
            self.print_at(col_pos(i), 3, if i == current.index() { "-" } else { " " });
        }
    }

    fn render_go(&mut self) {
        self.clear();
        self.print_at(8, 1, "GO!");
    }

    fn render_round_result(&mut self, score: u32) {
        self.clear();
        let mut line: String<COLS> = String::new();
        let _ = write!(line, "GOOD! SCORE: {}", score);
        self.print_at(2, 1, &line);
    }

    fn render_target(&mut self, n: u8) {
        self.clear();
        let mut line: String<3> = String::new();
        let _ = write!(line, "{}", n);
        self.print_at(9, 1, &line);
    }

    fn render_game_over(&mut self, score: u32) {
        self.clear();
        self.print_at(5, 0, "GAME OVER!");
        self.print_at(9, 1, "-");
        let mut line: String<COLS> = String::new();
        let _ = write!(line, "Final Score: {}", score);
        self.print_at(2, 2, &line);
    }

    fn render_sleeping(&mut self) {
        self.clear();
        self.print_at(2, 1, "POWER MODE...");
    }
}
