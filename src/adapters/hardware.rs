//! Hardware adapter: bridges real pads to domain port traits.
//!
//! [`GpioAdapter`] is the only type that touches GPIO / IO MUX registers
//! (through [`hw_init`](crate::drivers::hw_init)).  [`DeviceAdapter`]
//! bundles it with the settings and parser link so the service sees a
//! single [`DevicePorts`](crate::app::ports::DevicePorts) implementor.
//! On non-espidf targets the register helpers are simulation stubs and the
//! shadow state below is the only record of what was written.

use log::warn;

use crate::app::ports::{
    ConfigError, ConfigPort, ParserPort, PinFunction, PinPort, SettingsPort, WifiPort,
};
use crate::config::{SystemConfig, WifiMode};
use crate::drivers::hw_init;

use super::parser_link::ParserLink;
use super::settings::DeviceSettings;

/// GPIO numbers covered by the mask registers.
pub const GPIO_COUNT: usize = 16;

const UART0: i32 = 0;
const UART1: i32 = 1;

/// Pad driver with a shadow copy of everything written.
pub struct GpioAdapter {
    levels: u32,
    output_enabled: u32,
    pullups: u32,
    functions: [PinFunction; GPIO_COUNT],
}

impl Default for GpioAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAdapter {
    pub fn new() -> Self {
        Self {
            levels: 0,
            output_enabled: 0,
            pullups: 0,
            functions: [PinFunction::Gpio; GPIO_COUNT],
        }
    }

    /// Last level written to `gpio`.
    pub fn driven_level(&self, gpio: i32) -> bool {
        bit(self.levels, gpio)
    }

    pub fn is_output(&self, gpio: i32) -> bool {
        bit(self.output_enabled, gpio)
    }

    pub fn has_pullup(&self, gpio: i32) -> bool {
        bit(self.pullups, gpio)
    }

    pub fn function(&self, gpio: i32) -> Option<PinFunction> {
        usize::try_from(gpio)
            .ok()
            .and_then(|i| self.functions.get(i).copied())
    }
}

fn bit(word: u32, gpio: i32) -> bool {
    (0..GPIO_COUNT as i32).contains(&gpio) && word & (1 << gpio) != 0
}

impl PinPort for GpioAdapter {
    fn select_function(&mut self, gpio: i32, function: PinFunction) {
        let Some(slot) = usize::try_from(gpio)
            .ok()
            .and_then(|i| self.functions.get_mut(i))
        else {
            warn!("GPIO: select_function on invalid pin {}", gpio);
            return;
        };

        let routed = match function {
            PinFunction::Gpio => {
                hw_init::pad_select_gpio(gpio);
                Ok(())
            }
            PinFunction::Uart0Tx => hw_init::route_uart_tx(UART0, gpio),
            PinFunction::Uart1Tx => hw_init::route_uart_tx(UART1, gpio),
        };
        match routed {
            Ok(()) => *slot = function,
            Err(e) => warn!("GPIO{}: {}", gpio, e),
        }
    }

    fn set_pullup(&mut self, gpio: i32, enabled: bool) {
        if !(0..GPIO_COUNT as i32).contains(&gpio) {
            warn!("GPIO: set_pullup on invalid pin {}", gpio);
            return;
        }
        hw_init::gpio_set_pullup(gpio, enabled);
        if enabled {
            self.pullups |= 1 << gpio;
        } else {
            self.pullups &= !(1 << gpio);
        }
    }

    fn output_set(&mut self, set_mask: u32, clear_mask: u32, enable_mask: u32, disable_mask: u32) {
        for gpio in 0..GPIO_COUNT as i32 {
            let b = 1u32 << gpio;
            if set_mask & b != 0 {
                hw_init::gpio_write(gpio, true);
            } else if clear_mask & b != 0 {
                hw_init::gpio_write(gpio, false);
            }
            if enable_mask & b != 0 {
                hw_init::gpio_set_output_enabled(gpio, true);
            } else if disable_mask & b != 0 {
                hw_init::gpio_set_output_enabled(gpio, false);
            }
        }

        self.levels = (self.levels | set_mask) & !(clear_mask & !set_mask);
        self.output_enabled = (self.output_enabled | enable_mask) & !(disable_mask & !enable_mask);
    }

    fn read_level(&self, gpio: i32) -> bool {
        hw_init::gpio_read(gpio)
    }
}

/// Every port the I/O service needs, in one value.
pub struct DeviceAdapter<C: ConfigPort> {
    pub gpio: GpioAdapter,
    pub settings: DeviceSettings<C>,
    parser: &'static ParserLink,
}

impl<C: ConfigPort> DeviceAdapter<C> {
    pub fn new(gpio: GpioAdapter, settings: DeviceSettings<C>, parser: &'static ParserLink) -> Self {
        Self {
            gpio,
            settings,
            parser,
        }
    }
}

impl<C: ConfigPort> PinPort for DeviceAdapter<C> {
    fn select_function(&mut self, gpio: i32, function: PinFunction) {
        self.gpio.select_function(gpio, function);
    }

    fn set_pullup(&mut self, gpio: i32, enabled: bool) {
        self.gpio.set_pullup(gpio, enabled);
    }

    fn output_set(&mut self, set_mask: u32, clear_mask: u32, enable_mask: u32, disable_mask: u32) {
        self.gpio
            .output_set(set_mask, clear_mask, enable_mask, disable_mask);
    }

    fn read_level(&self, gpio: i32) -> bool {
        self.gpio.read_level(gpio)
    }
}

impl<C: ConfigPort> WifiPort for DeviceAdapter<C> {
    fn opmode(&self) -> WifiMode {
        self.settings.opmode()
    }

    fn set_opmode(&mut self, mode: WifiMode) {
        self.settings.set_opmode(mode);
    }

    fn apply_settings(&mut self) {
        self.settings.apply_settings();
    }
}

impl<C: ConfigPort> SettingsPort for DeviceAdapter<C> {
    fn system(&self) -> SystemConfig {
        self.settings.system()
    }

    fn update_system(&mut self, config: SystemConfig) -> Result<(), ConfigError> {
        self.settings.update_system(config)
    }

    fn store(&mut self) -> Result<(), ConfigError> {
        self.settings.store()
    }

    fn restore_defaults(&mut self) -> Result<(), ConfigError> {
        self.settings.restore_defaults()
    }
}

impl<C: ConfigPort> ParserPort for DeviceAdapter<C> {
    fn char_count(&self) -> u32 {
        self.parser.count()
    }

    fn reset(&mut self) {
        self.parser.request_reset();
    }
}
