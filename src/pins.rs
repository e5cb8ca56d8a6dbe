//! GPIO / peripheral pin assignments for the grasp feedback board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Ultrasonic distance sensor (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a measurement.
pub const TRIGGER_GPIO: i32 = 4;
/// Digital input: HIGH for the round-trip time of the ultrasonic burst.
/// The sensor drives 5 V; the board has a 1k/2k divider in front of this pin.
pub const ECHO_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Feedback actuators
// ---------------------------------------------------------------------------

/// LEDC PWM channel for the feedback light (heartbeat pulse).
pub const LIGHT_PWM_GPIO: i32 = 17;
/// LEDC PWM channel for the passive piezo buzzer.
pub const TONE_PWM_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Operator stop button (active-low, BOOT button on the devkit)
// ---------------------------------------------------------------------------

/// Falling edge requests a clean shutdown of the control loop.
pub const STOP_BUTTON_GPIO: i32 = 0;

/// Every pin the firmware configures.  Released together at shutdown.
pub const CONFIGURED_PINS: [i32; 5] = [
    TRIGGER_GPIO,
    ECHO_GPIO,
    LIGHT_PWM_GPIO,
    TONE_PWM_GPIO,
    STOP_BUTTON_GPIO,
];

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the feedback light (100 Hz).
pub const LIGHT_PWM_FREQ_HZ: u32 = 100;
/// LEDC frequency for the buzzer tone (E5, 659 Hz).
pub const TONE_PWM_FREQ_HZ: u32 = 659;
/// Buzzer duty while sounding, in percent (square wave).
pub const TONE_DUTY_PERCENT: u8 = 50;
