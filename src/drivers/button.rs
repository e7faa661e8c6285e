//! Boot-button hold detector.
//!
//! ## Hardware
//!
//! Active-low momentary switch on GPIO0 with pull-up.  The pin is polled
//! every [`HOLD_POLL_MS`]; each poll that reads "pressed" adds one to the
//! press counter.
//!
//! ## Hold thresholds
//!
//! | Presses | Held for | Event                                         |
//! |---------|----------|-----------------------------------------------|
//! | 2       | 1 s      | `RescueArmed`: LEDs on, slow blink            |
//! | 10      | 5 s      | `FactoryResetArmed`: fast blink               |
//! | 2..=11  | release  | `Released(RescueMode)`                        |
//! | >= 12   | release  | `Released(FactoryReset)`                      |
//! | 1       | release  | `Released(None)`: tap or bounce, ignored      |
//!
//! The terminal action only fires on the release edge, never on entry to
//! the long-hold stage.
//!
//! If the button already reads pressed at boot (GPIO0 strapped low after
//! flashing), detection is disabled for the whole session.

/// Poll period of the hold detector.
pub const HOLD_POLL_MS: u32 = 500;

const RESCUE_ARM_PRESSES: u32 = 2;
const FACTORY_RESET_ARM_PRESSES: u32 = 10;
const RESCUE_PRESSES: u32 = 2;
const FACTORY_RESET_PRESSES: u32 = 12;

/// What a release does, decided by the final press count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    None,
    /// Switch WiFi to station+AP and persist.
    RescueMode,
    /// Restore factory default settings.
    FactoryReset,
}

impl ReleaseAction {
    pub fn for_presses(presses: u32) -> Self {
        if presses >= FACTORY_RESET_PRESSES {
            Self::FactoryReset
        } else if presses >= RESCUE_PRESSES {
            Self::RescueMode
        } else {
            Self::None
        }
    }
}

/// Events emitted by [`HoldDetector::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    /// Held long enough that a release now enters rescue mode.
    RescueArmed,
    /// Held long enough that a release soon performs a factory reset.
    FactoryResetArmed,
    /// Button released after `presses` pressed polls.
    Released { presses: u32, action: ReleaseAction },
}

/// Derived hold stage, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldStage {
    Idle,
    HeldShort,
    HeldMedium,
    HeldLong,
}

pub struct HoldDetector {
    enabled: bool,
    presses: u32,
}

impl Default for HoldDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HoldDetector {
    pub fn new() -> Self {
        Self {
            enabled: true,
            presses: 0,
        }
    }

    /// Build a detector from the button level sampled at boot.
    pub fn from_boot_level(pressed_at_boot: bool) -> Self {
        Self {
            enabled: !pressed_at_boot,
            presses: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Consecutive pressed polls so far.
    pub fn presses(&self) -> u32 {
        self.presses
    }

    pub fn stage(&self) -> HoldStage {
        match self.presses {
            0 => HoldStage::Idle,
            1 => HoldStage::HeldShort,
            n if n < FACTORY_RESET_ARM_PRESSES => HoldStage::HeldMedium,
            _ => HoldStage::HeldLong,
        }
    }

    /// Call once per [`HOLD_POLL_MS`] with the debounced button state.
    pub fn tick(&mut self, pressed: bool) -> Option<HoldEvent> {
        if self.enabled && pressed {
            self.presses = self.presses.saturating_add(1);
            return match self.presses {
                RESCUE_ARM_PRESSES => Some(HoldEvent::RescueArmed),
                FACTORY_RESET_ARM_PRESSES => Some(HoldEvent::FactoryResetArmed),
                _ => None,
            };
        }

        if self.presses == 0 {
            return None;
        }

        let presses = self.presses;
        self.presses = 0;
        Some(HoldEvent::Released {
            presses,
            action: ReleaseAction::for_presses(presses),
        })
    }
}
