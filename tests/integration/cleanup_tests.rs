//! Shutdown and cleanup: whatever the loop is doing when the stop button
//! is pressed, the light ends dark, the tone ends silent, and the pins are
//! released exactly once.

use std::panic::{AssertUnwindSafe, catch_unwind};

use grasp_feedback::app::events::AppEvent;
use grasp_feedback::app::lifecycle::{HardwareContext, run_until_shutdown};
use grasp_feedback::config::{FeedbackMode, SystemConfig};
use grasp_feedback::drivers::feedback::FeedbackOutcome;
use grasp_feedback::drivers::hw_init::HwInitError;
use grasp_feedback::error::Error;
use grasp_feedback::fsm::StateId;
use grasp_feedback::shutdown::ShutdownToken;

use crate::mock_hw::{CallLog, HwCall, LogSink, MockDelay, MockHardware, Trip};

fn assert_clean_exit(log: &CallLog) {
    let calls = log.calls();
    assert_eq!(calls.first(), Some(&HwCall::Configure));
    assert_eq!(calls.last(), Some(&HwCall::Release));
    assert_eq!(log.count(HwCall::Configure), 1);
    assert_eq!(log.count(HwCall::Release), 1);
    assert_eq!(log.final_outputs(), (0, false));
}

fn interrupted_feedback(sink: &LogSink) -> bool {
    sink.events
        .iter()
        .any(|e| matches!(e, AppEvent::FeedbackFinished { outcome: FeedbackOutcome::Interrupted, .. }))
}

#[test]
fn stop_during_idle_wait() {
    let shutdown = ShutdownToken::new();
    let hw = MockHardware::at_cm(&[80.0, 81.0, 82.0, 83.0], &shutdown);
    let log = hw.log.clone();
    // 1st pause completes, 2nd is cut at 250 ms.
    let mut delay = MockDelay::new(&log, &shutdown).trip_after_ms(750);
    let mut sink = LogSink::new();

    run_until_shutdown(hw, SystemConfig::default(), &mut delay, &shutdown, &mut sink).unwrap();

    assert_clean_exit(&log);
    assert_eq!(log.count(HwCall::Measure), 2);
    assert_eq!(sink.count(|e| *e == AppEvent::ShutdownRequested), 1);
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: StateId::Idle,
        to: StateId::Shutdown,
    }));
}

#[test]
fn stop_mid_brightening() {
    let shutdown = ShutdownToken::new();
    let hw = MockHardware::at_cm(&[4.0, 4.0], &shutdown).with_trip(Trip::OnDuty { duty: 50, nth: 0 });
    let log = hw.log.clone();
    let mut delay = MockDelay::new(&log, &shutdown);
    let mut sink = LogSink::new();

    run_until_shutdown(hw, SystemConfig::default(), &mut delay, &shutdown, &mut sink).unwrap();

    assert_clean_exit(&log);
    let duties = log.light_duties();
    assert!(!duties.contains(&100), "ramp continued past the stop: {duties:?}");
    assert_eq!(log.count(HwCall::Measure), 1);
    assert!(interrupted_feedback(&sink));
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: StateId::Feedback,
        to: StateId::Shutdown,
    }));
}

#[test]
fn stop_mid_dimming() {
    let shutdown = ShutdownToken::new();
    let hw = MockHardware::at_cm(&[4.0, 4.0], &shutdown).with_trip(Trip::OnDuty { duty: 50, nth: 1 });
    let log = hw.log.clone();
    let mut delay = MockDelay::new(&log, &shutdown);
    let mut sink = LogSink::new();

    run_until_shutdown(hw, SystemConfig::default(), &mut delay, &shutdown, &mut sink).unwrap();

    assert_clean_exit(&log);
    let duties = log.light_duties();
    // Full brightening, dimming down to 50, then the rest writes.
    assert_eq!(duties.iter().filter(|d| **d == 100).count(), 2);
    assert!(!duties[21..].contains(&45), "dimming continued past the stop: {duties:?}");
    assert_eq!(log.count(HwCall::Measure), 1);
    assert!(interrupted_feedback(&sink));
}

#[test]
fn stop_during_sustained_tone() {
    let shutdown = ShutdownToken::new();
    let config = SystemConfig {
        feedback_mode: FeedbackMode::SustainedTone,
        ..SystemConfig::default()
    };
    let hw = MockHardware::at_cm(&[3.0, 3.0], &shutdown);
    let log = hw.log.clone();
    let mut delay = MockDelay::new(&log, &shutdown).trip_after_ms(300);
    let mut sink = LogSink::new();

    run_until_shutdown(hw, config, &mut delay, &shutdown, &mut sink).unwrap();

    assert_clean_exit(&log);
    let slept: u32 = log
        .calls()
        .iter()
        .map(|c| if let HwCall::Sleep(ms) = c { *ms } else { 0 })
        .sum();
    assert_eq!(slept, 300);
    assert!(interrupted_feedback(&sink));
}

#[test]
fn stop_requested_before_start() {
    let shutdown = ShutdownToken::new();
    shutdown.request();
    let hw = MockHardware::at_cm(&[4.0], &shutdown);
    let log = hw.log.clone();
    let mut delay = MockDelay::new(&log, &shutdown);
    let mut sink = LogSink::new();

    run_until_shutdown(hw, SystemConfig::default(), &mut delay, &shutdown, &mut sink).unwrap();

    assert_clean_exit(&log);
    assert_eq!(log.count(HwCall::Measure), 0);
}

#[test]
fn configure_failure_releases_and_propagates() {
    let shutdown = ShutdownToken::new();
    let mut hw = MockHardware::at_cm(&[4.0], &shutdown);
    hw.fail_configure = true;
    let log = hw.log.clone();
    let mut delay = MockDelay::new(&log, &shutdown);
    let mut sink = LogSink::new();

    let result = run_until_shutdown(hw, SystemConfig::default(), &mut delay, &shutdown, &mut sink);

    assert_eq!(
        result,
        Err(Error::Peripheral(HwInitError::LedcInitFailed(-1)))
    );
    assert_eq!(log.calls(), vec![HwCall::Configure, HwCall::Release]);
    assert!(sink.events.is_empty());
}

#[test]
fn explicit_then_implicit_release_is_single() {
    let shutdown = ShutdownToken::new();
    let hw = MockHardware::at_cm(&[], &shutdown);
    let log = hw.log.clone();

    let mut ctx = HardwareContext::acquire(hw).unwrap();
    ctx.release();
    ctx.release();
    drop(ctx);

    assert_clean_exit(&log);
}

#[test]
fn panic_in_loop_still_releases() {
    let shutdown = ShutdownToken::new();
    let mut hw = MockHardware::at_cm(&[4.0], &shutdown);
    hw.panic_on_measure = true;
    let log = hw.log.clone();
    let mut delay = MockDelay::new(&log, &shutdown);
    let mut sink = LogSink::new();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        run_until_shutdown(hw, SystemConfig::default(), &mut delay, &shutdown, &mut sink)
    }));

    assert!(outcome.is_err());
    assert_clean_exit(&log);
}
