//! ESPTerm I/O library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod events;
pub mod pins;
pub mod scheduler;

// Register-touching code is cfg-gated inside; the host build gets
// simulation stubs.
pub mod adapters;
pub mod drivers;
