//! Pin-level building blocks, hardware initialisation, and tick source.

pub mod blink;
pub mod button;
pub mod hw_init;
pub mod hw_timer;
pub mod pin_modes;
pub mod watchdog;
