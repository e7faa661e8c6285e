//! Live settings adapter.
//!
//! Owns the in-RAM [`Settings`] and the [`ConfigPort`] backend they are
//! persisted to.  Implements [`SettingsPort`] for the domain and
//! [`WifiPort`] on top of the WiFi section plus the radio.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, SettingsPort, WifiPort};
use crate::config::{Settings, SystemConfig, WifiMode, validate_config};

use super::wifi::WifiRadio;

pub struct DeviceSettings<C: ConfigPort> {
    backend: C,
    live: Settings,
    radio: WifiRadio,
}

impl<C: ConfigPort> DeviceSettings<C> {
    /// Load settings from `backend`, falling back to defaults when the
    /// stored blob is unreadable.
    pub fn load(backend: C) -> Self {
        let live = backend.load().unwrap_or_else(|e| {
            warn!("Settings: load failed ({}), using defaults", e);
            Settings::default()
        });
        Self {
            backend,
            live,
            radio: WifiRadio::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.live
    }

    pub fn radio(&self) -> &WifiRadio {
        &self.radio
    }

    pub fn backend(&self) -> &C {
        &self.backend
    }
}

impl<C: ConfigPort> WifiPort for DeviceSettings<C> {
    fn opmode(&self) -> WifiMode {
        self.live.wifi.opmode
    }

    fn set_opmode(&mut self, mode: WifiMode) {
        self.live.wifi.opmode = mode;
    }

    fn apply_settings(&mut self) {
        // Failure leaves the radio in its previous mode; the stored
        // settings still win on next boot.
        if let Err(e) = self.radio.apply_opmode(self.live.wifi.opmode) {
            warn!("Settings: {}", e);
        }
    }
}

impl<C: ConfigPort> SettingsPort for DeviceSettings<C> {
    fn system(&self) -> SystemConfig {
        self.live.system
    }

    fn update_system(&mut self, config: SystemConfig) -> Result<(), ConfigError> {
        validate_config(&config)?;
        self.live.system = config;
        Ok(())
    }

    fn store(&mut self) -> Result<(), ConfigError> {
        self.backend.save(&self.live)
    }

    fn restore_defaults(&mut self) -> Result<(), ConfigError> {
        let defaults = Settings::default();
        self.backend.save(&defaults)?;
        self.live = defaults;
        self.apply_settings();
        info!("Settings: factory defaults restored");
        Ok(())
    }
}
