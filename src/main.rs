//! BinRush Firmware — Main Entry Point
//!
//! Hexagonal architecture around a cooperative superloop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │   Board            Lcd            LogEventSink   GameRng     │
//! │   (Sensor+Actuator (DisplayPort)  (EventSink)    (RandomPort)│
//! │    +Power+Delay)                                             │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            GameService (pure logic)                    │  │
//! │  │  PhaseEngine · round decay · command application       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  RoundScheduler (shared timer) · button ISRs (shared cells)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use binrush::adapters::hardware::Board;
use binrush::adapters::lcd::Lcd;
use binrush::adapters::log_sink::LogEventSink;
use binrush::adapters::rng::GameRng;
use binrush::config::GameConfig;
use binrush::drivers::hw_timer::HwTimer;
use binrush::drivers::watchdog::Watchdog;
use binrush::drivers::hw_init;
use binrush::game::service::GameService;
use binrush::power::PowerManager;
use binrush::scheduler::RoundScheduler;
use binrush::shared::SHARED;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BinRush v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals + interrupts ───────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        // A game without buttons is unplayable; hold here for the reset.
        log::error!("ISR service init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new(10_000);

    // ── 3. Construct adapters ─────────────────────────────────
    let config = GameConfig::default();
    let mut board = Board::new(PowerManager::new(&SHARED));
    let mut lcd = Lcd::new();
    let mut rng = GameRng::from_entropy();
    let mut sched = RoundScheduler::new(&SHARED, HwTimer::new());
    let mut sink = LogEventSink::new();

    // ── 4. Game service ───────────────────────────────────────
    let mut game = GameService::new(config, &SHARED);
    game.start(&mut board, &mut lcd, &mut sched, &mut sink);

    info!("System ready. Entering game loop.");

    // ── 5. Cooperative main loop ──────────────────────────────
    loop {
        game.tick(&mut board, &mut lcd, &mut rng, &mut sched, &mut sink);
        watchdog.feed();

        // One tick of headroom so the idle task is never starved; the
        // phases add their own settle delays on top.
        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(1);
    }
}
