//! Interrupt-shared state cells.
//!
//! Everything that both an interrupt context (timer callback, button edge
//! handlers) and the cooperative main loop touch lives in this one struct:
//! the active phase, the 4-bit input mask, the current target, the sub-tick
//! counter and armed timer action, the global debounce timestamp, and the
//! wake / round-outcome flags.
//!
//! ```text
//! ┌──────────────┐   lock-free atomics    ┌──────────────┐
//! │ Button ISRs  │──────────┐             │              │
//! │ Timer ticks  │──────────┼──▶ Shared ──│  Main loop   │
//! └──────────────┘          │    State    │  (consumer)  │
//!                           └─────────────└──────────────┘
//! ```
//!
//! Interrupt handlers only ever store into these cells; the main loop
//! consumes them (`take_*`).  The two multi-cell windows — arming the timer
//! and evaluating a round against the mask — run under a brief critical
//! section in `scheduler`.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::phases::PhaseId;
use crate::scheduler::TimerAction;

/// Sentinel for "no phase transition requested".
const NO_REQUEST: u8 = 0xFF;

/// The shared-state cell block.  One static instance serves the ISR glue;
/// tests construct their own local instances.
pub struct SharedState {
    /// Currently active phase, mirrored here so ISR-side dispatch can read it.
    phase: AtomicU8,
    /// Phase transition requested from interrupt context (or `NO_REQUEST`).
    pending_phase: AtomicU8,
    /// 4-bit input mask; bit i follows indicator LED i.
    input_mask: AtomicU8,
    /// Target number the player must encode (0..=15).
    target: AtomicU8,
    /// Sub-ticks counted since the timer was last armed.
    ticks: AtomicU32,
    /// Armed [`TimerAction`] discriminant.
    timer_action: AtomicU8,
    /// Timestamp (ms) of the last accepted button edge — shared across all
    /// four lines, which is what makes the debounce window global.
    last_edge_ms: AtomicU32,
    /// Set by a button edge while Sleeping; consumed by the main loop.
    wake: AtomicBool,
    /// Set by round evaluation on a correct answer; consumed by Running.
    round_won: AtomicBool,
}

/// The one instance the ISR glue points at.
pub static SHARED: SharedState = SharedState::new();

impl SharedState {
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(PhaseId::Initial as u8),
            pending_phase: AtomicU8::new(NO_REQUEST),
            input_mask: AtomicU8::new(0),
            target: AtomicU8::new(0),
            ticks: AtomicU32::new(0),
            timer_action: AtomicU8::new(TimerAction::None as u8),
            last_edge_ms: AtomicU32::new(0),
            wake: AtomicBool::new(false),
            round_won: AtomicBool::new(false),
        }
    }

    // ── Phase ─────────────────────────────────────────────────

    pub fn phase(&self) -> PhaseId {
        PhaseId::from_index(self.phase.load(Ordering::Acquire) as usize)
    }

    pub fn set_phase(&self, phase: PhaseId) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    /// Post a transition request from interrupt context.  The main loop
    /// consumes it on its next pass; a later request overwrites an unread
    /// earlier one.
    pub fn request_phase(&self, phase: PhaseId) {
        self.pending_phase.store(phase as u8, Ordering::Release);
    }

    pub fn take_pending_phase(&self) -> Option<PhaseId> {
        let raw = self.pending_phase.swap(NO_REQUEST, Ordering::AcqRel);
        if raw == NO_REQUEST {
            None
        } else {
            Some(PhaseId::from_index(raw as usize))
        }
    }

    // ── Input mask / target ───────────────────────────────────

    /// Toggle bit `line` of the input mask; returns the new bit value.
    pub fn toggle_input_bit(&self, line: u8) -> bool {
        let prev = self.input_mask.fetch_xor(1 << line, Ordering::AcqRel);
        prev & (1 << line) == 0
    }

    pub fn input_mask(&self) -> u8 {
        self.input_mask.load(Ordering::Acquire)
    }

    pub fn clear_input_mask(&self) {
        self.input_mask.store(0, Ordering::Release);
    }

    pub fn target(&self) -> u8 {
        self.target.load(Ordering::Acquire)
    }

    pub fn set_target(&self, target: u8) {
        self.target.store(target & 0x0F, Ordering::Release);
    }

    // ── Timer cells ───────────────────────────────────────────

    /// Arm `action` and zero the sub-tick counter.  Call under the
    /// scheduler's critical section so an in-flight tick never sees a fresh
    /// counter paired with the stale action.
    pub fn arm_timer(&self, action: TimerAction) {
        self.ticks.store(0, Ordering::Release);
        self.timer_action.store(action as u8, Ordering::Release);
    }

    /// Disarm and return whatever action was armed.
    pub fn disarm_timer(&self) -> TimerAction {
        TimerAction::from_u8(self.timer_action.swap(TimerAction::None as u8, Ordering::AcqRel))
    }

    /// Count one sub-tick; returns the new total since arming.
    pub fn bump_ticks(&self) -> u32 {
        self.ticks.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn reset_ticks(&self) {
        self.ticks.store(0, Ordering::Release);
    }

    #[cfg(test)]
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    // ── Debounce ──────────────────────────────────────────────

    /// Shared debounce gate: accept the edge (and move the stamp) only when
    /// at least `window_ms` elapsed since the last accepted edge on ANY
    /// line.  Wrapping arithmetic keeps this correct across the u32
    /// millisecond rollover.
    pub fn accept_edge(&self, now_ms: u32, window_ms: u32) -> bool {
        let last = self.last_edge_ms.load(Ordering::Acquire);
        if now_ms.wrapping_sub(last) < window_ms {
            return false;
        }
        self.last_edge_ms.store(now_ms, Ordering::Release);
        true
    }

    // ── Flags ─────────────────────────────────────────────────

    pub fn set_wake(&self) {
        self.wake.store(true, Ordering::Release);
    }

    /// Peek without consuming — the host power manager's wake predicate.
    pub fn wake_pending(&self) -> bool {
        self.wake.load(Ordering::Acquire)
    }

    pub fn take_wake(&self) -> bool {
        self.wake.swap(false, Ordering::AcqRel)
    }

    pub fn mark_round_won(&self) {
        self.round_won.store(true, Ordering::Release);
    }

    pub fn take_round_won(&self) -> bool {
        self.round_won.swap(false, Ordering::AcqRel)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
