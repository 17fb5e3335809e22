//! System configuration parameters
//!
//! All tunable parameters for the BinRush game controller.  Everything here
//! is a compile-time constant baked into `Default`; there is no runtime
//! provisioning surface and no persistence.

use serde::{Deserialize, Serialize};

/// Minimum gap between two accepted button edges (milliseconds).  A bare
/// const because the button ISR glue needs it without a config reference.
pub const DEBOUNCE_MS: u32 = 100;

/// Core game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    // --- Timing ---
    /// Base hardware-timer sub-period (microseconds).  Every logical
    /// timeout is `sub-period × TICKS_PER_UNIT`: the idle timeout runs at
    /// this period, the first round of a session starts from it.
    pub base_period_us: u32,
    /// Multiplier applied to `base_period_us` for the difficulty-selection
    /// timeout (the player gets twice the idle window to pick a tier).
    pub difficulty_timeout_factor: u32,

    // --- Input ---
    /// Minimum gap between two accepted button edges (milliseconds).
    pub debounce_ms: u32,
    /// Settle delay after a polled start-button press (milliseconds).
    pub button_settle_ms: u16,

    // --- Display pacing ---
    /// How long the "GO!" cue stays up before the first round (milliseconds).
    pub go_cue_ms: u16,
    /// How long the score feedback stays up between rounds (milliseconds).
    pub feedback_ms: u16,
    /// Status-LED hold interval on game over (milliseconds).
    pub game_over_hold_ms: u16,

    // --- Status LED breathing ---
    /// Brightness step applied each welcome-phase pass.
    pub fade_step: i16,
    /// Delay between breathing steps (milliseconds).
    pub fade_interval_ms: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Timing
            base_period_us: 100_000, // 100ms sub-period -> 10s logical
            difficulty_timeout_factor: 2,

            // Input
            debounce_ms: DEBOUNCE_MS,
            button_settle_ms: 100,

            // Display pacing
            go_cue_ms: 500,
            feedback_ms: 500,
            game_over_hold_ms: 1000,

            // Breathing
            fade_step: 5,
            fade_interval_ms: 20,
        }
    }
}

impl GameConfig {
    /// Sub-period for the difficulty-selection timeout.
    pub fn difficulty_period_us(&self) -> u32 {
        self.base_period_us * self.difficulty_timeout_factor
    }
}
