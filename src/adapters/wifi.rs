//! WiFi radio adapter.
//!
//! Only the operating mode is in scope here; association, credentials and
//! the soft-AP itself belong to the WiFi manager.
//!
//! ## cfg gating
//!
//! On `espidf` the mode goes straight to `esp_wifi_set_mode`.  The host
//! build logs the request and remembers it for inspection.

use core::fmt;

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::config::WifiMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    /// The driver rejected the mode change (ESP-IDF error code).
    ModeRejected(i32),
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeRejected(rc) => write!(f, "WiFi mode change rejected (rc={})", rc),
        }
    }
}

/// Handle to the WiFi radio.
#[derive(Debug, Default)]
pub struct WifiRadio {
    applied: Option<WifiMode>,
}

impl WifiRadio {
    pub fn new() -> Self {
        Self { applied: None }
    }

    /// Last mode successfully pushed to the radio.
    pub fn applied_mode(&self) -> Option<WifiMode> {
        self.applied
    }

    pub fn apply_opmode(&mut self, mode: WifiMode) -> Result<(), WifiError> {
        platform_set_mode(mode)?;
        self.applied = Some(mode);
        info!("WiFi: opmode -> {:?}", mode);
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
fn platform_set_mode(mode: WifiMode) -> Result<(), WifiError> {
    let raw = match mode {
        WifiMode::Station => wifi_mode_t_WIFI_MODE_STA,
        WifiMode::SoftAp => wifi_mode_t_WIFI_MODE_AP,
        WifiMode::StationAp => wifi_mode_t_WIFI_MODE_APSTA,
    };
    // SAFETY: the WiFi driver is initialised by the WiFi manager before
    // the main loop; called from the main task only.
    let ret = unsafe { esp_wifi_set_mode(raw) };
    if ret != ESP_OK {
        warn!("WiFi: esp_wifi_set_mode failed (rc={})", ret);
        return Err(WifiError::ModeRejected(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn platform_set_mode(_mode: WifiMode) -> Result<(), WifiError> {
    Ok(())
}
