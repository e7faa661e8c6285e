//! One-shot pin setup and raw pad helpers.
//!
//! Thin wrappers over ESP-IDF GPIO / IO MUX sys calls.  On the host every
//! helper is a no-op and `gpio_read` reports the idle (high) level.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    UartRouteFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartRouteFailed(rc) => write!(f, "UART pin routing failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use crate::pins;

/// Configure the boot button as a plain input with pull-up.
#[cfg(target_os = "espidf")]
pub fn init_button_pin() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: called once from main() before the event loop.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!("hw_init: button GPIO{} configured", pins::BUTTON_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_button_pin() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): button init skipped");
    Ok(())
}

// ── Level access ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: main-loop only; pin number comes from `pins`.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── Direction / pull ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_set_output_enabled(pin: i32, enabled: bool) {
    let mode = if enabled {
        gpio_mode_t_GPIO_MODE_INPUT_OUTPUT
    } else {
        gpio_mode_t_GPIO_MODE_INPUT
    };
    // SAFETY: main-loop only.
    unsafe {
        gpio_set_direction(pin, mode);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_set_output_enabled(_pin: i32, _enabled: bool) {}

#[cfg(target_os = "espidf")]
pub fn gpio_set_pullup(pin: i32, enabled: bool) {
    // SAFETY: main-loop only.
    unsafe {
        if enabled {
            gpio_pullup_en(pin);
        } else {
            gpio_pullup_dis(pin);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_set_pullup(_pin: i32, _enabled: bool) {}

// ── Pad function ──────────────────────────────────────────────

/// Detach any peripheral from the pad and hand it to the GPIO block.
#[cfg(target_os = "espidf")]
pub fn pad_select_gpio(pin: i32) {
    // SAFETY: main-loop only.
    unsafe {
        esp_rom_gpio_pad_select_gpio(pin as u32);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn pad_select_gpio(_pin: i32) {}

/// Route the TX line of `uart` to `pin`.
#[cfg(target_os = "espidf")]
pub fn route_uart_tx(uart: i32, pin: i32) -> Result<(), HwInitError> {
    const NO_CHANGE: i32 = -1;
    // SAFETY: main-loop only.
    let ret = unsafe { uart_set_pin(uart as _, pin, NO_CHANGE, NO_CHANGE, NO_CHANGE) };
    if ret != ESP_OK {
        return Err(HwInitError::UartRouteFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn route_uart_tx(_uart: i32, _pin: i32) -> Result<(), HwInitError> {
    Ok(())
}
