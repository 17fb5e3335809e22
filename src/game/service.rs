//! Game service — the hexagonal core.
//!
//! [`GameService`] owns the phase engine, its context, and a reference to
//! the interrupt-shared cells.  Each main-loop pass it:
//!
//! 1. snapshots the polled inputs and consumes the ISR-posted flags,
//! 2. applies any phase transition requested from interrupt context,
//! 3. runs one engine pass (pure phase logic),
//! 4. publishes the resulting phase/target back to the shared cells,
//! 5. drains the command struct into port calls.
//!
//! ```text
//!  SensorPort ───▶ ┌──────────────────────────┐ ───▶ DisplayPort
//!  RandomPort ───▶ │       GameService        │ ───▶ EventSink
//!  SharedState ──▶ │  PhaseEngine · commands  │ ───▶ RoundScheduler
//! ActuatorPort ◀── └──────────────────────────┘ ◀─── PowerPort (halt)
//! ```
//!
//! Reprogramming the shared timer happens exclusively here (step 5) — never
//! from the callback being replaced.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::GameConfig;
use crate::phases::context::{DisplayRequest, InputSnapshot, PhaseContext};
use crate::phases::states::build_phase_table;
use crate::phases::{PhaseEngine, PhaseId};
use crate::scheduler::{RoundScheduler, SubTickTimer};
use crate::shared::SharedState;

use super::events::GameEvent;
use super::ports::{ActuatorPort, DisplayPort, EventSink, PowerPort, RandomPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// GameService
// ───────────────────────────────────────────────────────────────

/// The game service orchestrates all domain logic.
pub struct GameService<'a> {
    engine: PhaseEngine,
    ctx: PhaseContext,
    shared: &'a SharedState,
}

impl<'a> GameService<'a> {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the engine — call [`start`](Self::start) next.
    pub fn new(config: GameConfig, shared: &'a SharedState) -> Self {
        let ctx = PhaseContext::new(config);
        let engine = PhaseEngine::new(build_phase_table(), PhaseId::Initial);
        Self { engine, ctx, shared }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the Initial entry actions and apply their side effects (welcome
    /// screen, idle countdown arm).  Call once before the first `tick`.
    pub fn start(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort + PowerPort + DelayNs),
        display: &mut impl DisplayPort,
        sched: &mut RoundScheduler<'_, impl SubTickTimer>,
        sink: &mut impl EventSink,
    ) {
        self.engine.start(&mut self.ctx);
        self.shared.set_phase(self.engine.current_phase());
        self.apply_commands(hw, display, sched, sink);
        sink.emit(&GameEvent::Started(self.engine.current_phase()));
        info!("game service started in {:?}", self.engine.current_phase());
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one full pass: snapshot inputs → consume ISR requests → phase
    /// logic → publish shared state → apply commands.
    ///
    /// The `hw` parameter satisfies the sensor, actuator, power, and delay
    /// ports at once — this avoids a quadruple mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort + PowerPort + DelayNs),
        display: &mut impl DisplayPort,
        rng: &mut impl RandomPort,
        sched: &mut RoundScheduler<'_, impl SubTickTimer>,
        sink: &mut impl EventSink,
    ) {
        // 1. Snapshot polled inputs and consume the ISR-posted flags.
        self.ctx.inputs = InputSnapshot {
            pot_raw: hw.read_difficulty_raw(),
            start_pressed: hw.start_button_level(),
            next_target: rng.next_target(),
            round_won: self.shared.take_round_won(),
            woke: self.shared.take_wake(),
        };
        if self.ctx.inputs.round_won {
            // A won round re-opens the setup latch for this pass.
            self.ctx.round_ready = false;
        }

        let prev = self.engine.current_phase();

        // 2. Transitions requested from timer / button interrupt context.
        if let Some(requested) = self.shared.take_pending_phase() {
            self.engine.force_transition(requested, &mut self.ctx);
        }

        // 3. Pure phase logic.
        self.engine.tick(&mut self.ctx);

        // 4. Publish before side effects: the halt below relies on the edge
        //    handlers seeing the Sleeping phase.
        let current = self.engine.current_phase();
        self.shared.set_phase(current);
        if current != prev {
            sink.emit(&GameEvent::PhaseChanged { from: prev, to: current });
        }

        // 5. Side effects through the ports.
        self.apply_commands(hw, display, sched, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current phase.
    pub fn phase(&self) -> PhaseId {
        self.engine.current_phase()
    }

    /// Correct rounds this session.
    pub fn score(&self) -> u32 {
        self.ctx.score
    }

    /// Current round sub-period (microseconds).
    pub fn round_period_us(&self) -> u32 {
        self.ctx.round_period_us
    }

    /// Tier committed for the running session.
    pub fn committed_difficulty(&self) -> crate::difficulty::Difficulty {
        self.ctx.committed
    }

    /// Target the player is currently encoding.
    pub fn target(&self) -> u8 {
        self.ctx.target
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate the pass's command struct into port calls.
    ///
    /// Fixed order: render → LED level → round result (+feedback hold) →
    /// settle → timer reprogram → indicator clear → target render → LED
    /// pulse → halt.  The round clock is armed only after the cue/feedback
    /// holds so the player never loses budget to the display.
    fn apply_commands(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort + PowerPort + DelayNs),
        display: &mut impl DisplayPort,
        sched: &mut RoundScheduler<'_, impl SubTickTimer>,
        sink: &mut impl EventSink,
    ) {
        let cmds = core::mem::take(&mut self.ctx.commands);

        if let Some(request) = cmds.render {
            match request {
                DisplayRequest::Welcome => display.render_welcome(),
                DisplayRequest::DifficultyMenu(d) => display.render_difficulty_menu(d),
                DisplayRequest::DifficultyUpdate(d) => {
                    display.render_difficulty_update(d);
                    sink.emit(&GameEvent::DifficultyChanged(d));
                }
                DisplayRequest::Go => display.render_go(),
                DisplayRequest::GameOver(score) => {
                    display.render_game_over(score);
                    sink.emit(&GameEvent::GameOver { score });
                }
                DisplayRequest::Sleeping => display.render_sleeping(),
            }
        }

        if let Some(level) = cmds.status_led {
            hw.set_status_led(level);
        }

        if let Some(score) = cmds.round_result {
            display.render_round_result(score);
            sink.emit(&GameEvent::RoundWon { score });
            hw.delay_ms(u32::from(self.ctx.config.feedback_ms));
        }

        if cmds.settle_ms > 0 {
            hw.delay_ms(u32::from(cmds.settle_ms));
        }

        if cmds.stop_timer {
            sched.stop();
        }

        if let Some(program) = cmds.timer {
            sched.reprogram(program.period_us, program.action);
        }

        if cmds.clear_indicators {
            self.shared.clear_input_mask();
            hw.set_indicators(0);
        }

        if let Some(n) = cmds.show_target {
            self.shared.set_target(n);
            display.render_target(n);
            sink.emit(&GameEvent::TargetDrawn(n));
        }

        if let Some(hold_ms) = cmds.led_pulse_ms {
            hw.set_status_led(u8::MAX);
            hw.delay_ms(u32::from(hold_ms));
            hw.set_status_led(0);
        }

        if cmds.halt {
            hw.halt_until_wake();
        }
    }
}
