//! Function-pointer phase engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PhaseTable                                                  │
//! │  ┌────────────────────┬──────────┬─────────┬───────────────┐ │
//! │  │ PhaseId            │ on_enter │ on_exit │ on_update      │ │
//! │  ├────────────────────┼──────────┼─────────┼───────────────┤ │
//! │  │ Initial            │ fn(ctx)  │ —       │ fn(ctx)->Opt<> │ │
//! │  │ SettingDifficulty  │ fn(ctx)  │ fn(ctx) │ fn(ctx)->Opt<> │ │
//! │  │ Running            │ fn(ctx)  │ —       │ fn(ctx)->Opt<> │ │
//! │  │ Sleeping           │ fn(ctx)  │ —       │ fn(ctx)->Opt<> │ │
//! │  │ GameOver           │ fn(ctx)  │ —       │ fn(ctx)->Opt<> │ │
//! │  └────────────────────┴──────────┴─────────┴───────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each pass the engine calls `on_update` for the **current** phase.  If it
//! returns `Some(next)`, the engine runs `on_exit` for the current phase,
//! then `on_enter` for the next, and moves the current pointer.  `on_enter`
//! is the "already initialized" latch: entry actions run exactly once per
//! activation, and leaving the phase re-arms them.

pub mod context;
pub mod states;

use context::PhaseContext;
use log::info;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Enumeration of the five controller phases.
/// Must stay in sync with the table built in [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PhaseId {
    Initial = 0,
    SettingDifficulty = 1,
    Running = 2,
    Sleeping = 3,
    GameOver = 4,
}

impl PhaseId {
    /// Total number of phases — used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert a `u8` index back to `PhaseId`.  Panics on out-of-range in
    /// debug builds; returns `Initial` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Initial,
            1 => Self::SettingDifficulty,
            2 => Self::Running,
            3 => Self::Sleeping,
            4 => Self::GameOver,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Initial
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each phase transition.
pub type PhaseActionFn = fn(&mut PhaseContext);

/// Signature for the per-pass update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type PhaseUpdateFn = fn(&mut PhaseContext) -> Option<PhaseId>;

// ---------------------------------------------------------------------------
// Phase descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single phase.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct PhaseDescriptor {
    pub id: PhaseId,
    pub name: &'static str,
    pub on_enter: Option<PhaseActionFn>,
    pub on_exit: Option<PhaseActionFn>,
    pub on_update: PhaseUpdateFn,
}

// ---------------------------------------------------------------------------
// Phase engine
// ---------------------------------------------------------------------------

/// The phase engine.
///
/// Owns the phase table (array of [`PhaseDescriptor`]) and walks it with a
/// mutable [`PhaseContext`] threaded through every handler call.
pub struct PhaseEngine {
    /// Fixed-size table indexed by `PhaseId as usize`.
    table: [PhaseDescriptor; PhaseId::COUNT],
    /// Index of the currently active phase.
    current: usize,
    /// Monotonically increasing pass counter.
    pass_count: u64,
    /// Pass at which the current phase was entered.
    phase_entry_pass: u64,
}

impl PhaseEngine {
    /// Construct a new engine with the given table, starting in `initial`.
    pub fn new(table: [PhaseDescriptor; PhaseId::COUNT], initial: PhaseId) -> Self {
        Self {
            table,
            current: initial as usize,
            pass_count: 0,
            phase_entry_pass: 0,
        }
    }

    /// Run the initial `on_enter` for the starting phase.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut PhaseContext) {
        info!("engine starting in phase: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the engine by one main-loop pass.
    ///
    /// 1. Call `on_update` for the current phase.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut PhaseContext) {
        self.pass_count += 1;
        ctx.ticks_in_phase = self.pass_count - self.phase_entry_pass;
        ctx.total_ticks = self.pass_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (used for transition requests posted
    /// from interrupt context — timer thresholds and button edges).
    pub fn force_transition(&mut self, next: PhaseId, ctx: &mut PhaseContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current phase's identity.
    pub fn current_phase(&self) -> PhaseId {
        PhaseId::from_index(self.current)
    }

    /// How many passes the engine has spent in the current phase.
    pub fn ticks_in_current_phase(&self) -> u64 {
        self.pass_count - self.phase_entry_pass
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: PhaseId, ctx: &mut PhaseContext) {
        let next_idx = next_id as usize;

        info!(
            "phase transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current phase
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.phase_entry_pass = self.pass_count;
        ctx.ticks_in_phase = 0;

        // Enter new phase
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
