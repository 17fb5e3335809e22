//! Logical-timer engine over the single shared hardware timer.
//!
//! The hardware timer cannot natively represent the durations the game
//! needs (a 10 s idle timeout down to sub-second round limits), so it runs
//! at a short sub-period and a counter turns `TICKS_PER_UNIT` sub-ticks
//! into one logical timeout:
//!
//! ```text
//! logical duration = sub-period × TICKS_PER_UNIT
//! ```
//!
//! ```text
//!  main loop                         timer interrupt context
//!  ─────────                         ──────────────────────
//!  RoundScheduler::reprogram ──────▶ on_sub_tick() × TICKS_PER_UNIT
//!    (stop hw, arm action,             │
//!     zero counter, start hw)          ▼ threshold
//!                                    disarm + dispatch TimerAction
//!                                    (post phase request / round outcome)
//! ```
//!
//! Dispatch is one-shot: the firing action disarms itself, and only the
//! main loop ever re-arms.  That is the structural fix for the race between
//! reprogramming and an in-flight callback — the callback that just fired
//! can no longer fire again while the main loop swaps the configuration.

use log::info;

use crate::phases::PhaseId;
use crate::shared::SharedState;

/// Sub-ticks that make up one logical timeout.
pub const TICKS_PER_UNIT: u32 = 100;

/// The finite set of timer callbacks, as a tagged variant rather than a
/// function pointer — every configuration is enumerable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimerAction {
    /// Nothing armed — sub-ticks are counted and ignored.
    None = 0,
    /// Idle timeout in the welcome phase: put the game to sleep.
    EnterSleep = 1,
    /// Difficulty-selection timeout: start with the live selection.
    PickDefaultDifficulty = 2,
    /// Round countdown: compare the input mask against the target.
    EvaluateRound = 3,
    /// Game-over hold timeout: return to the welcome phase.
    RestartAfterGameOver = 4,
}

impl TimerAction {
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::EnterSleep,
            2 => Self::PickDefaultDifficulty,
            3 => Self::EvaluateRound,
            4 => Self::RestartAfterGameOver,
            _ => Self::None,
        }
    }
}

/// One hardware sub-tick.  Runs in timer-callback context: count, and at
/// the threshold disarm and dispatch the armed action.
pub fn on_sub_tick(shared: &SharedState) {
    if shared.bump_ticks() < TICKS_PER_UNIT {
        return;
    }

    let action = shared.disarm_timer();
    shared.reset_ticks();

    match action {
        TimerAction::None => {}
        TimerAction::EnterSleep => shared.request_phase(PhaseId::Sleeping),
        TimerAction::PickDefaultDifficulty => shared.request_phase(PhaseId::Running),
        TimerAction::EvaluateRound => {
            // Mask and target must be read as one unit: a button edge
            // landing between the two loads could otherwise judge a mask
            // the player never held.
            let correct =
                critical_section::with(|_| shared.input_mask() == shared.target());
            if correct {
                shared.mark_round_won();
            } else {
                shared.request_phase(PhaseId::GameOver);
            }
        }
        TimerAction::RestartAfterGameOver => shared.request_phase(PhaseId::Initial),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Hardware seam + reprogram wrapper
// ═══════════════════════════════════════════════════════════════

/// The raw periodic-tick source.  The device implementation wraps
/// `esp_timer`; tests substitute a recording double.
pub trait SubTickTimer {
    /// Start (or restart) firing every `period_us` microseconds.
    fn start_periodic(&mut self, period_us: u32);
    /// Cancel any in-flight periodic firing.
    fn stop(&mut self);
}

/// Owns the singleton hardware timer and the shared timer cells.
///
/// `reprogram` is the only way a new configuration takes effect, and it is
/// only ever called from the main loop.
pub struct RoundScheduler<'a, H: SubTickTimer> {
    shared: &'a SharedState,
    hw: H,
}

impl<'a, H: SubTickTimer> RoundScheduler<'a, H> {
    pub fn new(shared: &'a SharedState, hw: H) -> Self {
        Self { shared, hw }
    }

    /// Cancel the in-flight timer, arm `action` with a zeroed sub-tick
    /// counter, and restart the hardware at `period_us`.
    ///
    /// The arm happens under a critical section: an in-flight sub-tick must
    /// never pair the fresh counter with the stale action.
    pub fn reprogram(&mut self, period_us: u32, action: TimerAction) {
        self.hw.stop();
        critical_section::with(|_| self.shared.arm_timer(action));
        self.hw.start_periodic(period_us);
        info!(
            "timer: armed {:?} ({}us x {})",
            action, period_us, TICKS_PER_UNIT
        );
    }

    /// Cancel the hardware timer and leave nothing armed.  Used when a
    /// phase needs silence (the Sleeping halt must not be woken by stray
    /// sub-ticks).
    pub fn stop(&mut self) {
        self.hw.stop();
        critical_section::with(|_| self.shared.arm_timer(TimerAction::None));
        info!("timer: stopped");
    }
}
