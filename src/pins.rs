//! GPIO assignments for the ESPTerm module.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Boot button
// ---------------------------------------------------------------------------

/// BOOT / flash button, active-low with pull-up.  Holding it triggers
/// rescue mode (~1 s) or factory reset (~6 s).
pub const BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// On-board LED
// ---------------------------------------------------------------------------
//
// ESP-01 boards wire the LED to GPIO1, ESP-01S boards to GPIO2.  Both are
// UART transmit lines in normal operation, so the hold indicator drives
// both and hands them back to the UARTs afterwards.

/// UART0 TX; LED on ESP-01.
pub const LED_A_GPIO: i32 = 1;
/// UART1 TX (alternate function); LED on ESP-01S.  Also user-configurable.
pub const LED_B_GPIO: i32 = 2;

/// The LEDs are lit when the line is driven low.
pub const LED_ACTIVE_LOW: bool = true;

// ---------------------------------------------------------------------------
// User-configurable GPIOs
// ---------------------------------------------------------------------------

pub const USER_GPIO2: i32 = 2;
pub const USER_GPIO4: i32 = 4;
pub const USER_GPIO5: i32 = 5;

/// Bit mask for `gpio` in the combined output-set register.
pub const fn mask(gpio: i32) -> u32 {
    1u32 << gpio
}
