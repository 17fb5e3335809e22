//! Shared mutable context threaded through every phase handler.
//!
//! `PhaseContext` is the single struct that phase handlers read from and
//! write to: the latest input snapshot, the per-pass side-effect commands,
//! configuration, and the game state proper (score, target, round period,
//! committed difficulty, breathing ramp).  Think of it as the "blackboard"
//! in a blackboard architecture — handlers stay pure functions over it.

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::scheduler::TimerAction;

// ---------------------------------------------------------------------------
// Input snapshot (read-only to phase handlers; written by the service)
// ---------------------------------------------------------------------------

/// Per-pass snapshot of everything the handlers may consume.  The service
/// fills it from the ports and the interrupt-shared cells before each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    /// Raw difficulty potentiometer reading (0..=1023).
    pub pot_raw: u16,
    /// Polled level of the start button line (Initial phase polls, it does
    /// not use the edge interrupts).
    pub start_pressed: bool,
    /// Pre-drawn random target for this pass, consumed on round setup.
    pub next_target: u8,
    /// The round countdown elapsed and the entered mask matched the target.
    pub round_won: bool,
    /// A qualifying button edge arrived while halted.
    pub woke: bool,
}

// ---------------------------------------------------------------------------
// Commands (written by phase handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Phase-level display requests.  Round-result and target renders have
/// their own command slots because a single Running pass emits both with a
/// settle delay in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRequest {
    Welcome,
    DifficultyMenu(Difficulty),
    DifficultyUpdate(Difficulty),
    Go,
    GameOver(u32),
    Sleeping,
}

/// A timer reprogram request: new sub-period plus the action to arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerProgram {
    pub period_us: u32,
    pub action: TimerAction,
}

/// Side effects requested by the current pass.  The service drains this
/// after every tick and translates it into port calls, in a fixed order
/// (render → LED → result+delay → settle → timer → indicators → target →
/// pulse → halt).
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseCommands {
    /// Phase-level render request.
    pub render: Option<DisplayRequest>,
    /// Status LED brightness (0..=255 PWM level).
    pub status_led: Option<u8>,
    /// Show the round result for this score, holding for the configured
    /// feedback interval.
    pub round_result: Option<u32>,
    /// Generic settle delay for this pass (fade cadence, button settle,
    /// GO cue).
    pub settle_ms: u16,
    /// Cancel the shared timer entirely (nothing armed, no sub-ticks).
    pub stop_timer: bool,
    /// Reprogram the shared timer.
    pub timer: Option<TimerProgram>,
    /// Clear the indicator LEDs and the shared input mask.
    pub clear_indicators: bool,
    /// Render a fresh target and publish it to the shared cells.
    pub show_target: Option<u8>,
    /// Assert the status LED fully on for this many ms, then drop it.
    pub led_pulse_ms: Option<u16>,
    /// Enter the interrupt-wakeable halt at the end of this pass.
    pub halt: bool,
}

// ---------------------------------------------------------------------------
// PhaseContext
// ---------------------------------------------------------------------------

/// Top of the status-LED brightness ramp.
pub const MAX_BRIGHTNESS: i16 = 255;

/// The shared context passed to every phase handler function.
pub struct PhaseContext {
    // -- Timing --
    /// Passes elapsed since the current phase was entered.
    pub ticks_in_phase: u64,
    /// Monotonic total pass count.
    pub total_ticks: u64,

    // -- Per-pass I/O --
    pub inputs: InputSnapshot,
    pub commands: PhaseCommands,

    // -- Configuration --
    pub config: GameConfig,

    // -- Game state --
    /// Correct rounds this session.
    pub score: u32,
    /// Target the player must encode in binary (0..=15).
    pub target: u8,
    /// Round sub-period in microseconds; the logical round budget is this
    /// times `TICKS_PER_UNIT`.  Never increases within a session.
    pub round_period_us: u32,
    /// Live tier tracked while the knob moves in SettingDifficulty.
    pub selected: Difficulty,
    /// Tier fixed for the session when SettingDifficulty is left.
    pub committed: Difficulty,
    /// Decay percentage fixed alongside `committed`.
    pub decay_percent: u32,
    /// Intra-phase latch: the current round is set up and counting.
    pub round_ready: bool,
    /// Distinguishes the very first Initial activation from re-entries.
    pub first_boot: bool,

    // -- Breathing ramp --
    pub brightness: i16,
    pub fade_step: i16,
}

impl PhaseContext {
    /// Create a new context with the given configuration.
    pub fn new(config: GameConfig) -> Self {
        let fade_step = config.fade_step;
        let round_period_us = config.base_period_us;
        Self {
            ticks_in_phase: 0,
            total_ticks: 0,
            inputs: InputSnapshot::default(),
            commands: PhaseCommands::default(),
            config,
            score: 0,
            target: 0,
            round_period_us,
            selected: Difficulty::Easy,
            committed: Difficulty::Easy,
            decay_percent: Difficulty::Easy.decay_percent(),
            round_ready: false,
            first_boot: true,
            brightness: 0,
            fade_step,
        }
    }
}
