//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to the debug UART in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { hold_detection } => {
                info!("START | hold_detection={}", hold_detection);
            }
            AppEvent::HoldDetectionDisabled => {
                warn!("BUTTON | stuck low at boot, hold detection off");
            }
            AppEvent::IndicatorBlinking(rate) => {
                info!("BUTTON | indicator {:?} ({} ms)", rate, rate.period_ms());
            }
            AppEvent::HoldReleased { presses, action } => {
                info!("BUTTON | released after {} polls -> {:?}", presses, action);
            }
            AppEvent::RescueModeEntered => {
                info!("BUTTON | rescue mode (station+AP) stored");
            }
            AppEvent::FactoryReset => {
                info!("BUTTON | factory defaults restored");
            }
            AppEvent::PersistFailed(e) => {
                warn!("BUTTON | persist failed: {}", e);
            }
            AppEvent::ParserReset { idle_ms } => {
                info!("PARSER | reset after {} ms idle", idle_ms);
            }
            AppEvent::PinModesApplied {
                gpio2,
                gpio4,
                gpio5,
            } => {
                info!(
                    "GPIO | 2={:?} 4={:?} 5={:?}",
                    gpio2, gpio4, gpio5
                );
            }
        }
    }
}
