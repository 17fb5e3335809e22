//! Concrete phase handler functions and table builder.
//!
//! Each phase is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.  Handlers are pure over [`PhaseContext`]; every side
//! effect goes through the command struct the service drains afterwards.
//!
//! ```text
//!  INITIAL ──[start press]──▶ SETTING_DIFFICULTY
//!     ▲  ▲                        │
//!     │  │            [button edge | selection timeout]
//!     │  │                        ▼
//!     │  └──[restart timeout]─ RUNNING ──[wrong answer]──▶ GAME_OVER
//!     │                           │  ▲                         │
//!     │                 [correct] └──┘ (new round, no change)  │
//!     │                                                        │
//!  [wake edge]── SLEEPING ◀──[idle timeout]── INITIAL ◀────────┘
//! ```

use log::info;

use super::context::{DisplayRequest, PhaseContext, TimerProgram, MAX_BRIGHTNESS};
use super::{PhaseDescriptor, PhaseId};
use crate::difficulty::classify;
use crate::scheduler::TimerAction;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_phase_table() -> [PhaseDescriptor; PhaseId::COUNT] {
    [
        // Index 0 — Initial
        PhaseDescriptor {
            id: PhaseId::Initial,
            name: "Initial",
            on_enter: Some(initial_enter),
            on_exit: None,
            on_update: initial_update,
        },
        // Index 1 — SettingDifficulty
        PhaseDescriptor {
            id: PhaseId::SettingDifficulty,
            name: "SettingDifficulty",
            on_enter: Some(setting_enter),
            on_exit: Some(setting_exit),
            on_update: setting_update,
        },
        // Index 2 — Running
        PhaseDescriptor {
            id: PhaseId::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: None,
            on_update: running_update,
        },
        // Index 3 — Sleeping
        PhaseDescriptor {
            id: PhaseId::Sleeping,
            name: "Sleeping",
            on_enter: Some(sleeping_enter),
            on_exit: None,
            on_update: sleeping_update,
        },
        // Index 4 — GameOver
        PhaseDescriptor {
            id: PhaseId::GameOver,
            name: "GameOver",
            on_enter: Some(game_over_enter),
            on_exit: None,
            on_update: game_over_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INITIAL phase — welcome screen, breathing LED, start-button polling
// ═══════════════════════════════════════════════════════════════════════════

fn initial_enter(ctx: &mut PhaseContext) {
    if ctx.first_boot {
        ctx.first_boot = false;
    } else {
        // Re-entry after a game or a wake: reset the session.
        ctx.score = 0;
        ctx.round_period_us = ctx.config.base_period_us;
        ctx.round_ready = false;
        ctx.brightness = 0;
        ctx.fade_step = ctx.config.fade_step;
    }

    ctx.commands.timer = Some(TimerProgram {
        period_us: ctx.config.base_period_us,
        action: TimerAction::EnterSleep,
    });
    ctx.commands.render = Some(DisplayRequest::Welcome);
    info!("INITIAL: welcome up, idle countdown armed");
}

fn initial_update(ctx: &mut PhaseContext) -> Option<PhaseId> {
    // Breathing effect: ramp by a fixed step, invert direction at the ends.
    ctx.brightness += ctx.fade_step;
    if ctx.brightness <= 0 || ctx.brightness >= MAX_BRIGHTNESS {
        ctx.brightness = ctx.brightness.clamp(0, MAX_BRIGHTNESS);
        ctx.fade_step = -ctx.fade_step;
    }
    ctx.commands.status_led = Some(ctx.brightness as u8);
    ctx.commands.settle_ms = ctx.config.fade_interval_ms;

    // The start button is polled here, not interrupt-driven.
    if ctx.inputs.start_pressed {
        ctx.commands.settle_ms = ctx.config.button_settle_ms;
        return Some(PhaseId::SettingDifficulty);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  SETTING_DIFFICULTY phase — live tier tracking until timeout or button
// ═══════════════════════════════════════════════════════════════════════════

fn setting_enter(ctx: &mut PhaseContext) {
    ctx.commands.timer = Some(TimerProgram {
        period_us: ctx.config.difficulty_period_us(),
        action: TimerAction::PickDefaultDifficulty,
    });
    ctx.commands.status_led = Some(0);
    ctx.commands.render = Some(DisplayRequest::DifficultyMenu(ctx.selected));
    info!("SETTING_DIFFICULTY: menu up, starting at {:?}", ctx.selected);
}

fn setting_update(ctx: &mut PhaseContext) -> Option<PhaseId> {
    let tier = classify(ctx.inputs.pot_raw);
    if tier != ctx.selected {
        ctx.selected = tier;
        ctx.commands.render = Some(DisplayRequest::DifficultyUpdate(tier));
        info!("SETTING_DIFFICULTY: knob moved to {:?}", tier);
    }

    // Both ways out (selection timeout, button edge) arrive as transition
    // requests from interrupt context — nothing to decide here.
    None
}

fn setting_exit(ctx: &mut PhaseContext) {
    // The tier is committed for the whole session only on the way out.
    ctx.committed = ctx.selected;
    ctx.decay_percent = ctx.selected.decay_percent();
    info!(
        "SETTING_DIFFICULTY: committed {:?} (decay {}%)",
        ctx.committed, ctx.decay_percent
    );
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING phase — the round loop
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut PhaseContext) {
    ctx.commands.status_led = Some(0);
    ctx.commands.render = Some(DisplayRequest::Go);
    ctx.commands.settle_ms = ctx.config.go_cue_ms;
    ctx.commands.timer = Some(TimerProgram {
        period_us: ctx.round_period_us,
        action: TimerAction::EvaluateRound,
    });
    ctx.round_ready = false;
    info!(
        "RUNNING: GO — {:?}, round period {}us",
        ctx.committed, ctx.round_period_us
    );
}

fn running_update(ctx: &mut PhaseContext) -> Option<PhaseId> {
    if ctx.round_ready {
        // Round in flight; the timer callback decides what happens next.
        return None;
    }

    if ctx.inputs.round_won {
        ctx.score += 1;
        ctx.commands.round_result = Some(ctx.score);
        // Integer division truncates at every step, never rounds.
        ctx.round_period_us = ctx.round_period_us * (100 - ctx.decay_percent) / 100;
        ctx.commands.timer = Some(TimerProgram {
            period_us: ctx.round_period_us,
            action: TimerAction::EvaluateRound,
        });
        info!(
            "RUNNING: score {}, next round period {}us",
            ctx.score, ctx.round_period_us
        );
    }

    ctx.commands.clear_indicators = true;
    ctx.target = ctx.inputs.next_target & 0x0F;
    ctx.commands.show_target = Some(ctx.target);
    ctx.round_ready = true;
    info!("RUNNING: write {} in binary", ctx.target);

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  SLEEPING phase — interrupt-wakeable halt
// ═══════════════════════════════════════════════════════════════════════════

fn sleeping_enter(ctx: &mut PhaseContext) {
    ctx.commands.stop_timer = true;
    ctx.commands.status_led = Some(0);
    ctx.commands.render = Some(DisplayRequest::Sleeping);
    info!("SLEEPING: entering power mode");
}

fn sleeping_update(ctx: &mut PhaseContext) -> Option<PhaseId> {
    if ctx.inputs.woke {
        info!("SLEEPING: waking up");
        ctx.commands.settle_ms = 2 * ctx.config.button_settle_ms;
        return Some(PhaseId::Initial);
    }

    ctx.commands.halt = true;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  GAME_OVER phase — final score, LED hold, restart countdown
// ═══════════════════════════════════════════════════════════════════════════

fn game_over_enter(ctx: &mut PhaseContext) {
    ctx.commands.timer = Some(TimerProgram {
        period_us: ctx.config.base_period_us,
        action: TimerAction::RestartAfterGameOver,
    });
    ctx.commands.render = Some(DisplayRequest::GameOver(ctx.score));
    ctx.commands.clear_indicators = true;
    ctx.commands.led_pulse_ms = Some(ctx.config.game_over_hold_ms);
    info!("GAME_OVER: final score {}", ctx.score);
}

fn game_over_update(_ctx: &mut PhaseContext) -> Option<PhaseId> {
    // Nothing to poll; the restart countdown fires from timer context.
    None
}
