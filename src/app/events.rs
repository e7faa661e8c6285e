//! Outbound application events.
//!
//! The [`IoService`](super::service::IoService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, web UI status, etc.).

use crate::app::ports::ConfigError;
use crate::config::GpioConf;
use crate::drivers::blink::BlinkRate;
use crate::drivers::button::ReleaseAction;

/// Structured events emitted by the I/O core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Timers armed; `hold_detection` is false when GPIO0 was low at boot.
    Started { hold_detection: bool },

    /// GPIO0 read low at boot; the hold button is ignored until reboot.
    HoldDetectionDisabled,

    /// Hold indicator switched on or changed speed.
    IndicatorBlinking(BlinkRate),

    /// Button released after `presses` polls.
    HoldReleased { presses: u32, action: ReleaseAction },

    /// WiFi switched to station+AP and settings persisted.
    RescueModeEntered,

    /// Factory defaults restored.
    FactoryReset,

    /// A release action could not persist settings.
    PersistFailed(ConfigError),

    /// The ANSI parser was reset after `idle_ms` without input.
    ParserReset { idle_ms: u32 },

    /// User pin modes (re)applied.
    PinModesApplied {
        gpio2: GpioConf,
        gpio4: GpioConf,
        gpio5: GpioConf,
    },
}
