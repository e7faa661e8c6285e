//! Mock device for integration tests.
//!
//! Records every pin call and every WiFi / settings / parser interaction
//! so tests can assert on the full history without touching registers.
//! The boot button level is set directly by the test.

use espterm_io::app::events::AppEvent;
use espterm_io::app::ports::{
    ConfigError, EventSink, ParserPort, PinFunction, PinPort, SettingsPort, WifiPort,
};
use espterm_io::config::{SystemConfig, WifiMode, validate_config};
use espterm_io::pins::{BUTTON_GPIO, LED_A_GPIO, LED_B_GPIO, mask};

// ── Pin call record ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCall {
    Select { gpio: i32, function: PinFunction },
    Pullup { gpio: i32, enabled: bool },
    Output { set: u32, clear: u32, enable: u32, disable: u32 },
}

pub const LED_MASK: u32 = mask(LED_A_GPIO) | mask(LED_B_GPIO);

// ── MockDevice ────────────────────────────────────────────────

pub struct MockDevice {
    pub pin_calls: Vec<PinCall>,
    pub button_pressed: bool,

    pub system: SystemConfig,
    pub opmode: WifiMode,
    pub apply_count: u32,
    pub store_count: u32,
    pub restore_count: u32,
    /// Returned by `store` / `restore_defaults`.
    pub persist_result: Result<(), ConfigError>,

    pub char_count: u32,
    pub parser_resets: u32,
}

#[allow(dead_code)]
impl MockDevice {
    pub fn new() -> Self {
        Self {
            pin_calls: Vec::new(),
            button_pressed: false,
            system: SystemConfig::default(),
            opmode: WifiMode::SoftAp,
            apply_count: 0,
            store_count: 0,
            restore_count: 0,
            persist_result: Ok(()),
            char_count: 0,
            parser_resets: 0,
        }
    }

    pub fn with_system(system: SystemConfig) -> Self {
        Self {
            system,
            ..Self::new()
        }
    }

    /// Last function routed to `gpio`, if any.
    pub fn function_of(&self, gpio: i32) -> Option<PinFunction> {
        self.pin_calls.iter().rev().find_map(|c| match *c {
            PinCall::Select { gpio: g, function } if g == gpio => Some(function),
            _ => None,
        })
    }

    /// Output writes touching both LED pins, in order.
    pub fn led_writes(&self) -> Vec<PinCall> {
        self.pin_calls
            .iter()
            .copied()
            .filter(|c| matches!(c, PinCall::Output { enable, .. } if *enable == LED_MASK))
            .collect()
    }

    /// Output writes touching `gpio`, in order.
    pub fn outputs_for(&self, gpio: i32) -> Vec<PinCall> {
        let bit = mask(gpio);
        self.pin_calls
            .iter()
            .copied()
            .filter(|c| match *c {
                PinCall::Output { set, clear, enable, disable } => {
                    (set | clear | enable | disable) & bit != 0
                }
                _ => false,
            })
            .collect()
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// LEDs are active low: lit means both lines driven low.
pub const LEDS_LIT: PinCall = PinCall::Output {
    set: 0,
    clear: LED_MASK,
    enable: LED_MASK,
    disable: 0,
};

pub const LEDS_DARK: PinCall = PinCall::Output {
    set: LED_MASK,
    clear: 0,
    enable: LED_MASK,
    disable: 0,
};

impl PinPort for MockDevice {
    fn select_function(&mut self, gpio: i32, function: PinFunction) {
        self.pin_calls.push(PinCall::Select { gpio, function });
    }

    fn set_pullup(&mut self, gpio: i32, enabled: bool) {
        self.pin_calls.push(PinCall::Pullup { gpio, enabled });
    }

    fn output_set(&mut self, set: u32, clear: u32, enable: u32, disable: u32) {
        self.pin_calls.push(PinCall::Output {
            set,
            clear,
            enable,
            disable,
        });
    }

    fn read_level(&self, gpio: i32) -> bool {
        if gpio == BUTTON_GPIO {
            !self.button_pressed
        } else {
            true
        }
    }
}

impl WifiPort for MockDevice {
    fn opmode(&self) -> WifiMode {
        self.opmode
    }

    fn set_opmode(&mut self, mode: WifiMode) {
        self.opmode = mode;
    }

    fn apply_settings(&mut self) {
        self.apply_count += 1;
    }
}

impl SettingsPort for MockDevice {
    fn system(&self) -> SystemConfig {
        self.system
    }

    fn update_system(&mut self, config: SystemConfig) -> Result<(), ConfigError> {
        validate_config(&config)?;
        self.system = config;
        Ok(())
    }

    fn store(&mut self) -> Result<(), ConfigError> {
        self.store_count += 1;
        self.persist_result
    }

    fn restore_defaults(&mut self) -> Result<(), ConfigError> {
        self.restore_count += 1;
        self.persist_result?;
        self.system = SystemConfig::default();
        self.opmode = WifiMode::SoftAp;
        Ok(())
    }
}

impl ParserPort for MockDevice {
    fn char_count(&self) -> u32 {
        self.char_count
    }

    fn reset(&mut self) {
        self.parser_resets += 1;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
