//! Grasp feedback firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                      LogEventSink             │
//! │  (Sensor+Actuator+Hardware)           (EventSink)              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   run_until_shutdown: HardwareContext · AppService     │    │
//! │  │   FSM · FeedbackController                             │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Stop button ISR ──▶ ShutdownToken                             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::Delay;
use log::info;

use grasp_feedback::adapters::hardware::HardwareAdapter;
use grasp_feedback::adapters::log_sink::LogEventSink;
use grasp_feedback::app::lifecycle::run_until_shutdown;
use grasp_feedback::config::SystemConfig;
use grasp_feedback::shutdown::ShutdownToken;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Grasp feedback v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config and cancellation ────────────────────────────
    let config = SystemConfig::default();
    let shutdown = ShutdownToken::new();

    // ── 3. Adapters ───────────────────────────────────────────
    let hw = HardwareAdapter::new(&config, Delay::new_default(), shutdown.clone());
    let mut loop_delay = Delay::new_default();
    let mut log_sink = LogEventSink::new();

    // ── 4. Run until the stop button is pressed ───────────────
    run_until_shutdown(hw, config, &mut loop_delay, &shutdown, &mut log_sink)?;

    info!("Control loop exited cleanly");
    Ok(())
}
