//! Inbound commands to the I/O service.
//!
//! These represent configuration changes requested by the outside world
//! (web configuration page, serial console) that the
//! [`IoService`](super::service::IoService) validates and applies.

use crate::drivers::pin_modes::UserPin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCommand {
    /// Set one user pin from its raw stored value (0–4).
    SetGpioConf { pin: UserPin, raw: u8 },

    /// Change the parser idle timeout (0 disables).
    SetParserTimeout(u32),

    /// Re-apply the current pin configuration.
    ReapplyPinModes,
}
