//! User GPIO mode applier.
//!
//! Maps each pin's [`GpioConf`] to one of five canonical electrical
//! configurations:
//!
//! | conf      | set | reset | enable | disable | input | pullup |
//! |-----------|-----|-------|--------|---------|-------|--------|
//! | Off       |     |   x   |        |    x    |       |        |
//! | Out0      |     |   x   |   x    |         |       |        |
//! | Out1      |  x  |       |   x    |         |       |        |
//! | InPullup  |     |       |        |    x    |   x   |   x    |
//! | InNoPull  |     |       |        |    x    |   x   |        |
//!
//! Applying is idempotent: the result only depends on the configuration.

use crate::app::ports::{PinFunction, PinPort};
use crate::config::{GpioConf, SystemConfig};
use crate::pins::{USER_GPIO2, USER_GPIO4, USER_GPIO5, mask};

/// Electrical state requested for one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMapping {
    pub set: bool,
    pub reset: bool,
    pub enable: bool,
    pub disable: bool,
    pub input: bool,
    pub pullup: bool,
}

pub const fn pin_mapping(conf: GpioConf) -> PinMapping {
    let (set, reset, enable, disable, input, pullup) = match conf {
        GpioConf::Off => (false, true, false, true, false, false),
        GpioConf::Out0 => (false, true, true, false, false, false),
        GpioConf::Out1 => (true, false, true, false, false, false),
        GpioConf::InPullup => (false, false, false, true, true, true),
        GpioConf::InNoPull => (false, false, false, true, true, false),
    };
    PinMapping {
        set,
        reset,
        enable,
        disable,
        input,
        pullup,
    }
}

/// The user-configurable pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPin {
    Gpio2,
    Gpio4,
    Gpio5,
}

impl UserPin {
    pub const ALL: [UserPin; 3] = [UserPin::Gpio2, UserPin::Gpio4, UserPin::Gpio5];

    pub const fn gpio(self) -> i32 {
        match self {
            Self::Gpio2 => USER_GPIO2,
            Self::Gpio4 => USER_GPIO4,
            Self::Gpio5 => USER_GPIO5,
        }
    }

    /// Peripheral function the pad falls back to when the pin is `Off`.
    pub const fn alternate_function(self) -> Option<PinFunction> {
        match self {
            Self::Gpio2 => Some(PinFunction::Uart1Tx),
            Self::Gpio4 | Self::Gpio5 => None,
        }
    }

    pub fn conf(self, config: &SystemConfig) -> GpioConf {
        match self {
            Self::Gpio2 => config.gpio2_conf,
            Self::Gpio4 => config.gpio4_conf,
            Self::Gpio5 => config.gpio5_conf,
        }
    }

    pub fn set_conf(self, config: &mut SystemConfig, conf: GpioConf) {
        match self {
            Self::Gpio2 => config.gpio2_conf = conf,
            Self::Gpio4 => config.gpio4_conf = conf,
            Self::Gpio5 => config.gpio5_conf = conf,
        }
    }

    pub fn from_gpio(gpio: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.gpio() == gpio)
    }
}

/// Apply `conf` to a single pin.
pub fn apply_pin(pin: UserPin, conf: GpioConf, pins: &mut impl PinPort) {
    let m = pin_mapping(conf);
    let bit = mask(pin.gpio());
    let bit_if = |flag: bool| if flag { bit } else { 0 };

    pins.output_set(bit_if(m.set), bit_if(m.reset), bit_if(m.enable), bit_if(m.disable));
    pins.set_pullup(pin.gpio(), m.pullup);

    let function = match (conf, pin.alternate_function()) {
        (GpioConf::Off, Some(alt)) => alt,
        _ => PinFunction::Gpio,
    };
    pins.select_function(pin.gpio(), function);
}

/// Apply every user pin's configuration.
pub fn apply_pin_modes(config: &SystemConfig, pins: &mut impl PinPort) {
    for pin in UserPin::ALL {
        apply_pin(pin, pin.conf(config), pins);
    }
}
