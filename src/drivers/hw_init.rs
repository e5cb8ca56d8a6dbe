//! One-shot hardware peripheral initialization and release.
//!
//! Configures GPIO directions, LEDC timers/channels and the stop-button
//! interrupt using raw ESP-IDF sys calls.  `init_peripherals()` runs once
//! when the [`HardwareContext`](crate::app::lifecycle::HardwareContext) is
//! acquired and `release_peripherals()` once when it is released.
//!
//! On host builds every function is backed by an in-memory pin table so
//! drivers and adapters run unchanged in tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::{info, warn};

use crate::error::ActuatorError;
use crate::pins;
use crate::shutdown::ShutdownToken;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

pub const LEDC_CH_LIGHT: u32 = 0;
pub const LEDC_CH_TONE: u32 = 1;

/// Largest LEDC duty value at the configured resolution.
pub const LEDC_MAX_DUTY: u32 = (1 << pins::PWM_RESOLUTION_BITS) - 1;

/// Map a 0–100 % duty onto the LEDC duty register range.
pub fn percent_to_ledc(percent: u8) -> u32 {
    u32::from(percent.min(100)) * LEDC_MAX_DUTY / 100
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once when the hardware context is acquired, before
    // the control loop starts; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    sim::reset();
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::TRIGGER_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    unsafe { gpio_set_level(pins::TRIGGER_GPIO, 0) };

    info!("hw_init: trigger output configured (GPIO{})", pins::TRIGGER_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set_level(pin, high);
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Echo is push-pull driven by the sensor; no pulls.
    let echo_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ECHO_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { gpio_config(&echo_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::STOP_BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        ..Default::default()
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: echo + stop button inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::level(pin)
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: feedback light (100 Hz, 8-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LIGHT_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    // Timer 1: buzzer tone (659 Hz, 8-bit)
    let timer1 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_1,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::TONE_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer1) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    // Channel 0: light, starts dark
    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_LIGHT,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::LIGHT_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    // Channel 1: tone, starts silent
    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_TONE,
        timer_sel: ledc_timer_t_LEDC_TIMER_1,
        gpio_num: pins::TONE_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (light=CH0@{}Hz, tone=CH1@{}Hz)",
        pins::LIGHT_PWM_FREQ_HZ, pins::TONE_PWM_FREQ_HZ);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) -> Result<(), ActuatorError> {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        if ret != ESP_OK as i32 { return Err(ActuatorError::PwmWriteFailed); }
        let ret = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        if ret != ESP_OK as i32 { return Err(ActuatorError::PwmWriteFailed); }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(channel: u32, duty: u32) -> Result<(), ActuatorError> {
    if sim::set_duty(channel, duty) {
        Ok(())
    } else {
        Err(ActuatorError::PwmWriteFailed)
    }
}

/// Current duty register value of a simulated LEDC channel.
#[cfg(not(target_os = "espidf"))]
pub fn sim_ledc_duty(channel: u32) -> u32 {
    sim::duty(channel)
}

/// Drive a simulated input pin (host builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_input(pin: i32, high: bool) {
    sim::set_level(pin, high);
}

// ── Stop button ISR ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn stop_button_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` was produced by ShutdownToken::into_isr_arg() in
    // install_stop_isr(); the flag it points to is never freed.
    unsafe { crate::shutdown::request_from_isr(arg as *const _) };
}

/// Install the GPIO ISR service and route the stop button's falling edge
/// to `shutdown`.  Call after init_peripherals().
#[cfg(target_os = "espidf")]
pub fn install_stop_isr(shutdown: &ShutdownToken) -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handler only does
    // an atomic store.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let arg = shutdown.clone().into_isr_arg() as *mut core::ffi::c_void;
        let ret = gpio_isr_handler_add(pins::STOP_BUTTON_GPIO, Some(stop_button_isr), arg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::STOP_BUTTON_GPIO);
    }
    info!("hw_init: stop button ISR installed (GPIO{})", pins::STOP_BUTTON_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn install_stop_isr(_shutdown: &ShutdownToken) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): stop button ISR skipped");
    Ok(())
}

// ── Release ──────────────────────────────────────────────────

/// Stop both PWM channels at a LOW idle level and reset every configured
/// pin to its power-on state.  Failures are logged; release continues.
#[cfg(target_os = "espidf")]
pub fn release_peripherals() {
    // SAFETY: Called once from HardwareContext::release() after the
    // control loop has exited; nothing else touches these pins.
    unsafe {
        for ch in [LEDC_CH_LIGHT, LEDC_CH_TONE] {
            let ret = ledc_stop(ledc_mode_t_LEDC_LOW_SPEED_MODE, ch, 0);
            if ret != ESP_OK as i32 {
                warn!("hw_init: {} on LEDC CH{} (rc={})", ActuatorError::PwmStopFailed, ch, ret);
            }
        }

        gpio_isr_handler_remove(pins::STOP_BUTTON_GPIO);

        for pin in pins::CONFIGURED_PINS {
            let ret = gpio_reset_pin(pin);
            if ret != ESP_OK as i32 {
                warn!("hw_init: GPIO{} reset failed (rc={})", pin, ret);
            }
        }
    }
    info!("hw_init: all peripherals released");
}

#[cfg(not(target_os = "espidf"))]
pub fn release_peripherals() {
    sim::reset();
    log::info!("hw_init(sim): peripherals released");
}

// ── Host simulation backend ──────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    const PIN_COUNT: usize = 49;

    static LEVELS: [AtomicBool; PIN_COUNT] = [const { AtomicBool::new(false) }; PIN_COUNT];
    static DUTIES: [AtomicU32; 2] = [const { AtomicU32::new(0) }; 2];

    fn slot(pin: i32) -> Option<&'static AtomicBool> {
        usize::try_from(pin).ok().and_then(|i| LEVELS.get(i))
    }

    pub fn set_level(pin: i32, high: bool) {
        if let Some(level) = slot(pin) {
            level.store(high, Ordering::Relaxed);
        }
    }

    pub fn level(pin: i32) -> bool {
        slot(pin).is_some_and(|level| level.load(Ordering::Relaxed))
    }

    /// `false` for a channel that was never configured.
    pub fn set_duty(channel: u32, duty: u32) -> bool {
        let Some(reg) = DUTIES.get(channel as usize) else {
            return false;
        };
        reg.store(duty, Ordering::Relaxed);
        true
    }

    pub fn duty(channel: u32) -> u32 {
        DUTIES.get(channel as usize).map_or(0, |reg| reg.load(Ordering::Relaxed))
    }

    pub fn reset() {
        for level in &LEVELS {
            level.store(false, Ordering::Relaxed);
        }
        for reg in &DUTIES {
            reg.store(0, Ordering::Relaxed);
        }
    }
}
