//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules behind the boot button, the hold
//! indicator, the parser idle watchdog and user pin configuration.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
