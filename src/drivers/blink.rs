//! Hold indicator: lock-step blink of the two LED-mapped pins.
//!
//! The LEDs share their pads with the UART transmit lines, so at any time
//! exactly one party drives them.  [`IndicatorOwner`] records who:
//!
//! ```text
//!   Uart ──take_over(rate)──▶ Blink(rate) ──take_over(rate')──▶ Blink(rate')
//!    ▲                            │
//!    └────────hand_back()─────────┘
//! ```
//!
//! Each blink tick re-reads the button.  Once it reads released the LEDs
//! are parked dark (line high) instead of toggling, so a late tick after
//! release cannot leave them flashing.

use crate::app::ports::{PinFunction, PinPort};
use crate::config::GpioConf;
use crate::pins::{LED_A_GPIO, LED_ACTIVE_LOW, LED_B_GPIO, mask};

const LED_MASK: u32 = mask(LED_A_GPIO) | mask(LED_B_GPIO);

/// Blink speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkRate {
    /// Release now enters rescue mode.
    Slow,
    /// Keep holding for a factory reset.
    Fast,
}

impl BlinkRate {
    pub const fn period_ms(self) -> u32 {
        match self {
            Self::Slow => 500,
            Self::Fast => 100,
        }
    }
}

/// Which party drives the LED pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorOwner {
    Uart,
    Blink(BlinkRate),
}

pub struct BlinkIndicator {
    owner: IndicatorOwner,
    /// Phase written on the next tick.
    lit: bool,
}

impl Default for BlinkIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkIndicator {
    pub fn new() -> Self {
        Self {
            owner: IndicatorOwner::Uart,
            lit: false,
        }
    }

    pub fn owner(&self) -> IndicatorOwner {
        self.owner
    }

    /// Claim the LED pads (or change rate if already claimed).
    ///
    /// On first claim the pads are switched to GPIO and the LEDs forced on.
    /// Returns the timer period to (re)arm.
    pub fn take_over(&mut self, rate: BlinkRate, pins: &mut impl PinPort) -> u32 {
        if self.owner == IndicatorOwner::Uart {
            pins.select_function(LED_A_GPIO, PinFunction::Gpio);
            pins.select_function(LED_B_GPIO, PinFunction::Gpio);
            Self::drive(pins, true);
            self.lit = false;
        }
        self.owner = IndicatorOwner::Blink(rate);
        rate.period_ms()
    }

    /// Blink timer callback.  `released` is the live button state.
    pub fn tick(&mut self, released: bool, pins: &mut impl PinPort) {
        if self.owner == IndicatorOwner::Uart {
            return;
        }
        if released {
            self.lit = false;
            Self::drive(pins, false);
            return;
        }
        Self::drive(pins, self.lit);
        self.lit = !self.lit;
    }

    /// Return the pads to their UART functions.
    ///
    /// GPIO2 only goes back to UART1 when the user has not configured it as
    /// a GPIO.  Returns `false` if the indicator did not own the pads.
    pub fn hand_back(&mut self, pins: &mut impl PinPort, gpio2_conf: GpioConf) -> bool {
        if self.owner == IndicatorOwner::Uart {
            return false;
        }
        pins.select_function(LED_A_GPIO, PinFunction::Uart0Tx);
        if gpio2_conf == GpioConf::Off {
            pins.select_function(LED_B_GPIO, PinFunction::Uart1Tx);
        }
        self.owner = IndicatorOwner::Uart;
        true
    }

    fn drive(pins: &mut impl PinPort, lit: bool) {
        let high = lit != LED_ACTIVE_LOW;
        if high {
            pins.output_set(LED_MASK, 0, LED_MASK, 0);
        } else {
            pins.output_set(0, LED_MASK, LED_MASK, 0);
        }
    }
}
