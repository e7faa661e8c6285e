//! Persisted device configuration.
//!
//! [`Settings`] is the single blob stored in NVS.  It groups the system
//! section (user GPIO modes, parser idle timeout) with the WiFi section
//! that the boot button rewrites when entering rescue mode.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Largest accepted parser idle timeout (milliseconds).
pub const MAX_PARSER_TIMEOUT_MS: u32 = 10_000;

/// Electrical configuration of one user-configurable pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum GpioConf {
    /// Pin is released to its peripheral function (UART1 TX on GPIO2).
    #[default]
    Off = 0,
    /// Output, driven low.
    Out0 = 1,
    /// Output, driven high.
    Out1 = 2,
    /// Input with the internal pull-up enabled.
    InPullup = 3,
    /// Floating input.
    InNoPull = 4,
}

impl GpioConf {
    pub const ALL: [GpioConf; 5] = [
        GpioConf::Off,
        GpioConf::Out0,
        GpioConf::Out1,
        GpioConf::InPullup,
        GpioConf::InNoPull,
    ];
}

impl TryFrom<u8> for GpioConf {
    type Error = ConfigError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Off),
            1 => Ok(Self::Out0),
            2 => Ok(Self::Out1),
            3 => Ok(Self::InPullup),
            4 => Ok(Self::InNoPull),
            _ => Err(ConfigError::ValidationFailed("gpio conf must be 0–4")),
        }
    }
}

/// WiFi operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiMode {
    Station,
    SoftAp,
    /// Station + access point: the "rescue mode" entered from the boot button.
    StationAp,
}

/// System section of the settings blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub gpio2_conf: GpioConf,
    pub gpio4_conf: GpioConf,
    pub gpio5_conf: GpioConf,
    /// Reset the ANSI parser after this many milliseconds without input.
    /// 0 disables the idle watchdog.
    pub parser_tout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            gpio2_conf: GpioConf::Off,
            gpio4_conf: GpioConf::Off,
            gpio5_conf: GpioConf::Off,
            parser_tout_ms: 10,
        }
    }
}

/// WiFi section of the settings blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    pub opmode: WifiMode,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            opmode: WifiMode::SoftAp,
        }
    }
}

/// Everything persisted as one blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub system: SystemConfig,
    pub wifi: WifiConfig,
}

/// Range-check a system config before it goes live or into flash.
pub fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if cfg.parser_tout_ms > MAX_PARSER_TIMEOUT_MS {
        return Err(ConfigError::ValidationFailed(
            "parser_tout_ms must be 0–10000",
        ));
    }
    Ok(())
}
