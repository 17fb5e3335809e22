//! ISR-side button edge capture.
//!
//! ## Hardware
//!
//! Four active-high momentary switches with external pull-downs.  GPIO
//! fires on the rising edge; the per-pin ISR glue in `hw_init` calls
//! [`on_button_edge`] with the line index and a millisecond timestamp.
//!
//! ## Debounce
//!
//! One **global** last-accepted-edge timestamp gates all four lines: an
//! accepted edge on any line opens a fresh suppression window for every
//! line, so two distinct buttons pressed inside the window lose the second
//! press.  Compatibility behavior — see DESIGN.md before "fixing" this to
//! per-line stamps.
//!
//! ## Per-phase behavior
//!
//! | Phase             | Accepted edge does                              |
//! |-------------------|-------------------------------------------------|
//! | Running           | toggle mask bit, mirror the indicator LED        |
//! | SettingDifficulty | post a transition request to Running             |
//! | Sleeping          | set the wake flag                                |
//! | Initial, GameOver | nothing (Initial polls the start line instead)   |

use crate::phases::PhaseId;
use crate::shared::SharedState;

/// Number of bit-entry lines.
pub const BUTTON_COUNT: u8 = 4;

/// What an edge interrupt did, so the GPIO glue can mirror hardware state
/// (indicator LEDs) and tests can assert on the dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Running: bit `line` toggled; `on` is its new value.
    Toggled { line: u8, on: bool },
    /// SettingDifficulty: the press locks the selection in.
    StartSelected,
    /// Sleeping: wake requested.
    WakeRequested,
    /// Inside the debounce window — discarded.
    Suppressed,
    /// Edge arrived in a phase that ignores interrupts.
    Ignored,
}

/// Handle one rising edge on button `line`.
///
/// Safe for interrupt context: lock-free atomics only, no delays, no
/// allocation.  The debounce gate runs before the per-phase dispatch, so a
/// suppressed edge does nothing in any phase.
pub fn on_button_edge(
    shared: &SharedState,
    line: u8,
    now_ms: u32,
    debounce_ms: u32,
) -> EdgeOutcome {
    debug_assert!(line < BUTTON_COUNT, "bad button line {line}");

    if !shared.accept_edge(now_ms, debounce_ms) {
        return EdgeOutcome::Suppressed;
    }

    match shared.phase() {
        PhaseId::Running => {
            let on = shared.toggle_input_bit(line);
            EdgeOutcome::Toggled { line, on }
        }
        PhaseId::SettingDifficulty => {
            shared.request_phase(PhaseId::Running);
            EdgeOutcome::StartSelected
        }
        PhaseId::Sleeping => {
            shared.set_wake();
            EdgeOutcome::WakeRequested
        }
        PhaseId::Initial | PhaseId::GameOver => EdgeOutcome::Ignored,
    }
}
