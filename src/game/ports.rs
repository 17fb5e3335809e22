//! Port traits — the hexagonal boundary between game logic and the outside.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GameService (domain)
//! ```
//!
//! Driven adapters (board I/O, LCD, RNG, event sinks) implement these
//! traits.  The [`GameService`](super::service::GameService) consumes them
//! via generics, so the domain core never touches hardware directly.  The
//! settle-delay seam reuses `embedded_hal::delay::DelayNs` rather than a
//! bespoke trait.

use crate::difficulty::Difficulty;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: polled inputs the phase handlers consume.
pub trait SensorPort {
    /// Raw difficulty potentiometer reading, 0..=1023.
    fn read_difficulty_raw(&mut self) -> u16;

    /// Current level of the start button line (the welcome phase polls it;
    /// edge interrupts take over everywhere else).
    fn start_button_level(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: LED outputs.
pub trait ActuatorPort {
    /// Set the status LED PWM level (0 = off, 255 = full).
    fn set_status_led(&mut self, level: u8);

    /// Drive the four indicator LEDs from a 4-bit mask.
    fn set_indicators(&mut self, mask: u8);

    /// Everything dark — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → LCD)
// ───────────────────────────────────────────────────────────────

/// Phase-tagged render requests.  Synchronous, infallible, fast enough not
/// to perturb the timing-sensitive phases (bounded by the settle delays
/// already budgeted around them).
pub trait DisplayPort {
    fn render_welcome(&mut self);
    fn render_difficulty_menu(&mut self, current: Difficulty);
    fn render_difficulty_update(&mut self, current: Difficulty);
    fn render_go(&mut self);
    fn render_round_result(&mut self, score: u32);
    fn render_target(&mut self, n: u8);
    fn render_game_over(&mut self, score: u32);
    fn render_sleeping(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Randomness port
// ───────────────────────────────────────────────────────────────

/// Target source, seeded once at boot.
pub trait RandomPort {
    /// Next target in 0..=15.
    fn next_target(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Power port
// ───────────────────────────────────────────────────────────────

/// The blocking low-power halt.  Returns when any button interrupt has
/// fired; the wake flag in the shared cells tells the caller why.
pub trait PowerPort {
    fn halt_until_wake(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`GameEvent`](super::events::GameEvent)s
/// through this port.  Adapters decide where they go (serial log today; a
/// future score display would implement the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::GameEvent);
}
