//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured game events to the
//! ESP-IDF logger (UART / USB-CDC in production).  A future score
//! leaderboard transport would implement the same trait.

use log::info;

use crate::game::events::GameEvent;
use crate::game::ports::EventSink;

/// Adapter that logs every [`GameEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Started(phase) => {
                info!("START | initial_phase={:?}", phase);
            }
            GameEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            GameEvent::DifficultyChanged(tier) => {
                info!("DIFF  | knob at {:?} (decay {}%)", tier, tier.decay_percent());
            }
            GameEvent::TargetDrawn(n) => {
                info!("ROUND | write {} in binary (0b{:04b})", n, n);
            }
            GameEvent::RoundWon { score } => {
                info!("ROUND | correct, score={}", score);
            }
            GameEvent::GameOver { score } => {
                info!("OVER  | final score {}", score);
            }
        }
    }
}
