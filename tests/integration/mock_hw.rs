//! Mock hardware for integration tests.
//!
//! Records every actuator call, delay, render, and halt so tests can
//! assert on the full side-effect history without touching real GPIO/PWM
//! registers.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use binrush::difficulty::Difficulty;
use binrush::game::events::GameEvent;
use binrush::game::ports::{ActuatorPort, DisplayPort, EventSink, PowerPort, RandomPort, SensorPort};
use binrush::scheduler::SubTickTimer;

// ── Actuator / delay / halt record ───────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    StatusLed(u8),
    Indicators(u8),
    AllOff,
    DelayMs(u32),
    Halt,
}

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Raw value the difficulty pot reads.
    pub pot_raw: u16,
    /// Level of the polled start button line.
    pub start_level: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pot_raw: 0,
            start_level: false,
        }
    }

    pub fn last_status_led(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::StatusLed(level) => Some(*level),
            HwCall::AllOff => Some(0),
            _ => None,
        })
    }

    pub fn halts(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, HwCall::Halt)).count()
    }

    pub fn total_delay_ms(&self) -> u32 {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::DelayMs(ms) => Some(*ms),
                _ => None,
            })
            .sum()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_difficulty_raw(&mut self) -> u16 {
        self.pot_raw
    }

    fn start_button_level(&mut self) -> bool {
        self.start_level
    }
}

impl ActuatorPort for MockHardware {
    fn set_status_led(&mut self, level: u8) {
        self.calls.push(HwCall::StatusLed(level));
    }

    fn set_indicators(&mut self, mask: u8) {
        self.calls.push(HwCall::Indicators(mask));
    }

    fn all_off(&mut self) {
        self.calls.push(HwCall::AllOff);
    }
}

impl PowerPort for MockHardware {
    fn halt_until_wake(&mut self) {
        self.calls.push(HwCall::Halt);
    }
}

impl DelayNs for MockHardware {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(HwCall::DelayMs(ns / 1_000_000));
    }
}

// ── Display double ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCall {
    Welcome,
    Menu(Difficulty),
    Update(Difficulty),
    Go,
    Result(u32),
    Target(u8),
    GameOver(u32),
    Sleeping,
}

pub struct MockDisplay {
    pub renders: Vec<RenderCall>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self { renders: Vec::new() }
    }

    pub fn count(&self, call: RenderCall) -> usize {
        self.renders.iter().filter(|r| **r == call).count()
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for MockDisplay {
    fn render_welcome(&mut self) {
        self.renders.push(RenderCall::Welcome);
    }
    fn render_difficulty_menu(&mut self, current: Difficulty) {
        self.renders.push(RenderCall::Menu(current));
    }
    fn render_difficulty_update(&mut self, current: Difficulty) {
        self.renders.push(RenderCall::Update(current));
    }
    fn render_go(&mut self) {
        self.renders.push(RenderCall::Go);
    }
    fn render_round_result(&mut self, score: u32) {
        self.renders.push(RenderCall::Result(score));
    }
    fn render_target(&mut self, n: u8) {
        self.renders.push(RenderCall::Target(n));
    }
    fn render_game_over(&mut self, score: u32) {
        self.renders.push(RenderCall::GameOver(score));
    }
    fn render_sleeping(&mut self) {
        self.renders.push(RenderCall::Sleeping);
    }
}

// ── Deterministic target source ──────────────────────────────

/// Returns a settable constant — tests pin the next round's target.
pub struct ConstRng {
    pub value: u8,
}

impl RandomPort for ConstRng {
    fn next_target(&mut self) -> u8 {
        self.value
    }
}

// ── Recording tick source ────────────────────────────────────

/// Shared trace of hardware timer programming, readable while the
/// scheduler owns the timer half.
#[derive(Clone, Default)]
pub struct TimerTrace(Rc<RefCell<Vec<u32>>>);

#[allow(dead_code)]
impl TimerTrace {
    pub fn periods(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

pub struct SimTimer {
    trace: TimerTrace,
}

impl SimTimer {
    pub fn new() -> (Self, TimerTrace) {
        let trace = TimerTrace::default();
        (Self { trace: trace.clone() }, trace)
    }
}

impl SubTickTimer for SimTimer {
    fn start_periodic(&mut self, period_us: u32) {
        self.trace.0.borrow_mut().push(period_us);
    }

    fn stop(&mut self) {}
}

// ── Event recording sink ─────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<GameEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &GameEvent) {
        self.events.push(*event);
    }
}
