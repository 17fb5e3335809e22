//! End-to-end gameplay tests over the GameService → ports pipeline.
//!
//! These run on the host (x86_64) and drive the same code paths the device
//! runs: the service consumes mock ports, interrupt activity is injected by
//! calling the ISR-side functions (`on_sub_tick`, `on_button_edge`)
//! directly, exactly as the timer task and GPIO ISRs would.

use crate::mock_hw::{
    ConstRng, HwCall, MockDisplay, MockHardware, RecordingSink, RenderCall, SimTimer, TimerTrace,
};

use binrush::config::{GameConfig, DEBOUNCE_MS};
use binrush::difficulty::Difficulty;
use binrush::drivers::buttons::on_button_edge;
use binrush::game::events::GameEvent;
use binrush::game::service::GameService;
use binrush::phases::PhaseId;
use binrush::scheduler::{on_sub_tick, RoundScheduler, TICKS_PER_UNIT};
use binrush::shared::SharedState;

// ── Test rig ─────────────────────────────────────────────────

struct Rig<'a> {
    shared: &'a SharedState,
    game: GameService<'a>,
    sched: RoundScheduler<'a, SimTimer>,
    trace: TimerTrace,
    hw: MockHardware,
    display: MockDisplay,
    rng: ConstRng,
    sink: RecordingSink,
}

impl<'a> Rig<'a> {
    /// Boot the controller: construct everything and run the Initial entry
    /// actions, as `main()` does on the device.
    fn boot(shared: &'a SharedState) -> Self {
        let (timer, trace) = SimTimer::new();
        let mut rig = Self {
            shared,
            game: GameService::new(GameConfig::default(), shared),
            sched: RoundScheduler::new(shared, timer),
            trace,
            hw: MockHardware::new(),
            display: MockDisplay::new(),
            rng: ConstRng { value: 0 },
            sink: RecordingSink::new(),
        };
        rig.game.start(
            &mut rig.hw,
            &mut rig.display,
            &mut rig.sched,
            &mut rig.sink,
        );
        rig
    }

    fn tick(&mut self) {
        self.game.tick(
            &mut self.hw,
            &mut self.display,
            &mut self.rng,
            &mut self.sched,
            &mut self.sink,
        );
    }

    /// Let one full logical timeout elapse on the shared timer.
    fn elapse_unit(&self) {
        for _ in 0..TICKS_PER_UNIT {
            on_sub_tick(self.shared);
        }
    }

    /// Inject a button edge the way the GPIO ISR would.
    fn press(&self, line: u8, at_ms: u32) {
        let _ = on_button_edge(self.shared, line, at_ms, DEBOUNCE_MS);
    }

    /// Press the polled start button for one pass (Initial phase only).
    fn press_start(&mut self) {
        self.hw.start_level = true;
        self.tick();
        self.hw.start_level = false;
    }
}

// ── Welcome phase ────────────────────────────────────────────

#[test]
fn boot_renders_welcome_and_arms_idle_countdown() {
    let shared = SharedState::new();
    let rig = Rig::boot(&shared);

    assert_eq!(rig.game.phase(), PhaseId::Initial);
    assert_eq!(rig.display.count(RenderCall::Welcome), 1);
    assert_eq!(rig.trace.periods(), vec![100_000]);
    assert!(rig.sink.events.contains(&GameEvent::Started(PhaseId::Initial)));
}

#[test]
fn welcome_entry_actions_run_exactly_once_per_activation() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    for _ in 0..25 {
        rig.tick();
    }
    assert_eq!(rig.display.count(RenderCall::Welcome), 1);
    assert_eq!(rig.trace.periods().len(), 1, "idle countdown armed once");
}

#[test]
fn status_led_breathes_while_idle() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.tick();
    assert_eq!(rig.hw.last_status_led(), Some(5));
    rig.tick();
    assert_eq!(rig.hw.last_status_led(), Some(10));

    // Enough passes to hit the top and turn around: 255/5 = 51 up-steps.
    for _ in 0..51 {
        rig.tick();
    }
    let level = rig.hw.last_status_led().unwrap();
    assert!(level < 255, "ramp must have inverted at the ceiling, got {level}");
}

// ── Idle timeout → sleep → wake ──────────────────────────────

#[test]
fn idle_timeout_sleeps_and_wake_edge_restarts() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.tick();
    rig.elapse_unit(); // idle countdown expires in timer context
    rig.tick();
    assert_eq!(rig.game.phase(), PhaseId::Sleeping);
    assert_eq!(rig.display.count(RenderCall::Sleeping), 1);
    assert_eq!(rig.hw.last_status_led(), Some(0));
    assert_eq!(rig.hw.halts(), 1, "Sleeping must enter the blocking halt");

    // Any qualifying edge wakes the controller.
    rig.press(2, 60_000);
    rig.tick();
    assert_eq!(rig.game.phase(), PhaseId::Initial);
    assert_eq!(rig.game.score(), 0);
    assert_eq!(rig.display.count(RenderCall::Welcome), 2, "Initial re-runs its setup");
    assert_eq!(*rig.trace.periods().last().unwrap(), 100_000);
}

// ── Difficulty selection ─────────────────────────────────────

#[test]
fn start_press_opens_difficulty_menu() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100;
    rig.press_start();
    assert_eq!(rig.game.phase(), PhaseId::SettingDifficulty);
    assert_eq!(rig.display.count(RenderCall::Menu(Difficulty::Easy)), 1);
    // Selection window is twice the idle window.
    assert_eq!(*rig.trace.periods().last().unwrap(), 200_000);
    // The breathing LED is silenced for the menu.
    assert_eq!(rig.hw.last_status_led(), Some(0));
}

#[test]
fn knob_crossing_updates_display_once_and_commits_on_exit() {
    // Knob sweeps from the Easy quartile to Hard between two passes.
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 200;
    rig.press_start();
    rig.tick();
    assert_eq!(rig.display.count(RenderCall::Update(Difficulty::Hard)), 0);

    rig.hw.pot_raw = 600;
    rig.tick();
    assert_eq!(rig.display.count(RenderCall::Update(Difficulty::Hard)), 1);
    rig.tick();
    rig.tick();
    assert_eq!(
        rig.display.count(RenderCall::Update(Difficulty::Hard)),
        1,
        "an unchanged tier must not re-render"
    );
    assert_eq!(
        rig.game.committed_difficulty(),
        Difficulty::Easy,
        "tier is committed only on leaving the phase"
    );

    rig.press(0, 5_000);
    rig.rng.value = 2;
    rig.tick();
    assert_eq!(rig.game.phase(), PhaseId::Running);
    assert_eq!(rig.game.committed_difficulty(), Difficulty::Hard);
}

#[test]
fn selection_timeout_starts_with_live_selection() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100;
    rig.press_start();
    rig.rng.value = 9;
    rig.elapse_unit(); // selection window expires
    rig.tick();

    assert_eq!(rig.game.phase(), PhaseId::Running);
    assert_eq!(rig.game.committed_difficulty(), Difficulty::Easy);
    assert_eq!(rig.display.count(RenderCall::Go), 1);
    assert_eq!(rig.display.count(RenderCall::Target(9)), 1);
    assert_eq!(rig.game.target(), 9);
}

// ── Three correct Easy rounds shrink the budget discretely ───

#[test]
fn easy_session_decays_100000_90000_81000_72900() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100; // Easy → decay 10%
    rig.press_start();
    rig.press(0, 1_000);
    rig.rng.value = 5;
    rig.tick();
    assert_eq!(rig.game.phase(), PhaseId::Running);
    assert_eq!(rig.game.round_period_us(), 100_000);
    assert_eq!(*rig.trace.periods().last().unwrap(), 100_000);

    // Round 1: target 5 = bits {0, 2}.
    rig.press(0, 2_000);
    rig.press(2, 2_200);
    assert_eq!(shared.input_mask(), 0b0101);
    rig.elapse_unit();
    rig.rng.value = 3;
    rig.tick();
    assert_eq!(rig.game.score(), 1);
    assert_eq!(rig.game.round_period_us(), 90_000);
    assert_eq!(rig.display.count(RenderCall::Result(1)), 1);

    // Round 2: target 3 = bits {0, 1}; mask was cleared on setup.
    assert_eq!(shared.input_mask(), 0);
    rig.press(0, 3_000);
    rig.press(1, 3_200);
    rig.elapse_unit();
    rig.rng.value = 10;
    rig.tick();
    assert_eq!(rig.game.score(), 2);
    assert_eq!(rig.game.round_period_us(), 81_000);

    // Round 3: target 10 = bits {1, 3}.
    rig.press(1, 4_000);
    rig.press(3, 4_200);
    rig.elapse_unit();
    rig.tick();
    assert_eq!(rig.game.score(), 3);
    assert_eq!(rig.game.round_period_us(), 72_900);

    let periods = rig.trace.periods();
    assert!(
        periods.ends_with(&[100_000, 90_000, 81_000, 72_900]),
        "timer must follow the truncating decay sequence, got {periods:?}"
    );
}

#[test]
fn running_passes_are_quiet_while_a_round_is_in_flight() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100;
    rig.press_start();
    rig.press(0, 1_000);
    rig.rng.value = 4;
    rig.tick();

    let renders = rig.display.renders.len();
    let periods = rig.trace.periods().len();
    for _ in 0..50 {
        rig.tick();
    }
    assert_eq!(rig.display.renders.len(), renders, "no re-render mid-round");
    assert_eq!(rig.trace.periods().len(), periods, "no re-arm mid-round");
}

// ── Mask vs target at the round deadline ─────────────────────

#[test]
fn mask_five_wins_against_target_five() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100;
    rig.press_start();
    rig.press(0, 1_000);
    rig.rng.value = 5;
    rig.tick();

    rig.press(0, 2_000); // bit 0 → 1
    rig.press(2, 2_200); // bit 2 → 4
    rig.elapse_unit();
    rig.tick();
    assert_eq!(rig.game.phase(), PhaseId::Running);
    assert_eq!(rig.game.score(), 1);
}

#[test]
fn mask_five_against_target_six_is_game_over() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100;
    rig.press_start();
    rig.press(0, 1_000);
    rig.rng.value = 6;
    rig.tick();

    rig.press(0, 2_000);
    rig.press(2, 2_200); // mask = 5, target = 6
    rig.elapse_unit();
    rig.tick();

    assert_eq!(rig.game.phase(), PhaseId::GameOver);
    assert_eq!(rig.display.count(RenderCall::GameOver(0)), 1);
    assert!(rig.sink.events.contains(&GameEvent::GameOver { score: 0 }));

    // Status LED asserted fully on for the hold interval, then dropped.
    let pulse = [HwCall::StatusLed(255), HwCall::DelayMs(1_000), HwCall::StatusLed(0)];
    assert!(
        rig.hw.calls.windows(3).any(|w| w == pulse),
        "expected the game-over LED pulse in {:?}",
        rig.hw.calls
    );
    // Restart countdown armed at the idle period.
    assert_eq!(*rig.trace.periods().last().unwrap(), 100_000);
}

#[test]
fn game_over_restart_countdown_returns_to_welcome() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100;
    rig.press_start();
    rig.press(0, 1_000);
    rig.rng.value = 1;
    rig.tick();

    // Win one round so the score is nonzero, then lose.
    rig.press(0, 2_000);
    rig.elapse_unit();
    rig.rng.value = 2;
    rig.tick();
    assert_eq!(rig.game.score(), 1);

    rig.elapse_unit(); // empty mask vs target 2 → wrong
    rig.tick();
    assert_eq!(rig.game.phase(), PhaseId::GameOver);
    assert!(rig.sink.events.contains(&GameEvent::GameOver { score: 1 }));

    rig.elapse_unit(); // restart countdown expires
    rig.tick();
    assert_eq!(rig.game.phase(), PhaseId::Initial);
    assert_eq!(rig.game.score(), 0, "score resets on re-entering the welcome phase");
    assert_eq!(rig.game.round_period_us(), 100_000, "round budget resets too");
}

// ── Shared debounce window across lines ──────────────────────

#[test]
fn rapid_second_edge_on_another_line_is_suppressed() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100;
    rig.press_start();
    rig.press(0, 1_000);
    rig.rng.value = 3;
    rig.tick();

    rig.press(0, 2_000);
    rig.press(1, 2_040); // 40ms later, different line: swallowed
    assert_eq!(shared.input_mask(), 0b0001);

    rig.press(1, 2_140); // outside the window: accepted
    assert_eq!(shared.input_mask(), 0b0011);
}

// ── Session immutability of the committed tier ───────────────

#[test]
fn knob_movement_during_running_cannot_change_the_decay() {
    let shared = SharedState::new();
    let mut rig = Rig::boot(&shared);

    rig.hw.pot_raw = 100;
    rig.press_start();
    rig.press(0, 1_000);
    rig.rng.value = 1;
    rig.tick();
    assert_eq!(rig.game.committed_difficulty(), Difficulty::Easy);

    // Crank the knob mid-session; the decay stays Easy.
    rig.hw.pot_raw = 1_000;
    rig.press(0, 2_000);
    rig.elapse_unit();
    rig.rng.value = 1;
    rig.tick();
    assert_eq!(rig.game.committed_difficulty(), Difficulty::Easy);
    assert_eq!(rig.game.round_period_us(), 90_000, "10% Easy decay, not 30%");
}
