//! The production `HardwareAdapter` on the host simulation backend.
//!
//! The simulated pin and PWM registers are process-wide, so these tests
//! serialise on one lock.  No other test in this binary touches them.

use std::sync::Mutex;

use grasp_feedback::adapters::hardware::HardwareAdapter;
use grasp_feedback::adapters::time::StdDelay;
use grasp_feedback::app::lifecycle::HardwareContext;
use grasp_feedback::app::ports::{ActuatorPort, SensorPort};
use grasp_feedback::config::SystemConfig;
use grasp_feedback::drivers::hw_init::{
    self, LEDC_CH_LIGHT, LEDC_CH_TONE, LEDC_MAX_DUTY, sim_ledc_duty, sim_set_input,
};
use grasp_feedback::error::SensorError;
use grasp_feedback::pins;
use grasp_feedback::sensors::Distance;
use grasp_feedback::shutdown::ShutdownToken;

static SIM: Mutex<()> = Mutex::new(());

fn adapter(config: &SystemConfig) -> HardwareAdapter<StdDelay> {
    HardwareAdapter::new(config, StdDelay, ShutdownToken::new())
}

#[test]
fn actuators_drive_ledc_and_release_zeroes_them() {
    let _sim = SIM.lock().unwrap_or_else(|e| e.into_inner());

    let mut hw = HardwareContext::acquire(adapter(&SystemConfig::default())).unwrap();

    hw.set_light_duty(100);
    hw.tone_on();
    assert_eq!(sim_ledc_duty(LEDC_CH_LIGHT), LEDC_MAX_DUTY);
    assert_eq!(sim_ledc_duty(LEDC_CH_TONE), hw_init::percent_to_ledc(pins::TONE_DUTY_PERCENT));
    assert!(hw.is_tone_on());

    hw.set_light_duty(40);
    assert_eq!(hw.light_duty(), 40);
    assert_eq!(sim_ledc_duty(LEDC_CH_LIGHT), hw_init::percent_to_ledc(40));

    hw.release();
    assert_eq!(sim_ledc_duty(LEDC_CH_LIGHT), 0);
    assert_eq!(sim_ledc_duty(LEDC_CH_TONE), 0);
    assert_eq!(hw.light_duty(), 0);
    assert!(!hw.is_tone_on());
}

#[test]
fn silent_echo_line_times_out() {
    let _sim = SIM.lock().unwrap_or_else(|e| e.into_inner());

    let config = SystemConfig {
        echo_timeout_us: 2_000,
        ..SystemConfig::default()
    };
    let mut hw = HardwareContext::acquire(adapter(&config)).unwrap();
    sim_set_input(pins::ECHO_GPIO, false);

    assert_eq!(hw.measure(), Err(SensorError::EchoRiseTimeout));
}

#[test]
fn stuck_high_echo_line_reads_out_of_range() {
    let _sim = SIM.lock().unwrap_or_else(|e| e.into_inner());

    let config = SystemConfig {
        echo_timeout_us: 2_000,
        ..SystemConfig::default()
    };
    let mut hw = HardwareContext::acquire(adapter(&config)).unwrap();
    sim_set_input(pins::ECHO_GPIO, true);

    assert_eq!(hw.measure(), Ok(Distance::OUT_OF_RANGE));
}
