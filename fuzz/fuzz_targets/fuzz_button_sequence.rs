//! Fuzz target: `IoService` under arbitrary button / parser input
//!
//! Each input byte is one step: bit 0 = button pressed, bit 1 = a character
//! arrived, bits 2..8 = milliseconds to advance (0–63, scaled ×16).
//!
//! Invariants checked:
//! - No panics
//! - The LED pads are owned by the blink indicator only while the button
//!   has been held for at least two polls
//! - Rescue / factory-reset actions only follow a release
//!
//! cargo fuzz run fuzz_button_sequence

#![no_main]

use espterm_io::app::events::AppEvent;
use espterm_io::app::ports::{
    ConfigError, EventSink, ParserPort, PinFunction, PinPort, SettingsPort, WifiPort,
};
use espterm_io::app::service::IoService;
use espterm_io::config::{SystemConfig, WifiMode};
use espterm_io::drivers::blink::IndicatorOwner;
use espterm_io::pins::BUTTON_GPIO;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Dev {
    pressed: bool,
    chars: u32,
    stores: u32,
    restores: u32,
}

impl PinPort for Dev {
    fn select_function(&mut self, _gpio: i32, _function: PinFunction) {}
    fn set_pullup(&mut self, _gpio: i32, _enabled: bool) {}
    fn output_set(&mut self, _s: u32, _c: u32, _e: u32, _d: u32) {}
    fn read_level(&self, gpio: i32) -> bool {
        !(gpio == BUTTON_GPIO && self.pressed)
    }
}

impl WifiPort for Dev {
    fn opmode(&self) -> WifiMode {
        WifiMode::SoftAp
    }
    fn set_opmode(&mut self, _mode: WifiMode) {}
    fn apply_settings(&mut self) {}
}

impl SettingsPort for Dev {
    fn system(&self) -> SystemConfig {
        SystemConfig::default()
    }
    fn update_system(&mut self, _config: SystemConfig) -> Result<(), ConfigError> {
        Ok(())
    }
    fn store(&mut self) -> Result<(), ConfigError> {
        self.stores += 1;
        Ok(())
    }
    fn restore_defaults(&mut self) -> Result<(), ConfigError> {
        self.restores += 1;
        Ok(())
    }
}

impl ParserPort for Dev {
    fn char_count(&self) -> u32 {
        self.chars
    }
    fn reset(&mut self) {}
}

#[derive(Default)]
struct Releases(u32);

impl EventSink for Releases {
    fn emit(&mut self, event: &AppEvent) {
        if matches!(event, AppEvent::HoldReleased { .. }) {
            self.0 += 1;
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut dev = Dev::default();
    let mut sink = Releases::default();
    let mut svc = IoService::new();
    svc.start(&mut dev, &mut sink);

    for &step in data {
        dev.pressed = step & 1 != 0;
        if step & 2 != 0 {
            dev.chars = dev.chars.wrapping_add(1);
        }
        svc.advance(u32::from(step >> 2) * 16, &mut dev, &mut sink);

        if svc.indicator_owner() != IndicatorOwner::Uart {
            assert!(svc.press_count() >= 2);
        }
        assert!(dev.stores + dev.restores <= sink.0);
    }
});
