//! Port traits: the hexagonal boundary between I/O logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IoService (domain)
//! ```
//!
//! Driven adapters (GPIO bank, WiFi manager, settings store, parser link,
//! event sinks) implement these traits.  The
//! [`IoService`](super::service::IoService) consumes them via generics, so
//! the button/blink/watchdog logic never touches registers directly.

use crate::config::{Settings, SystemConfig, WifiMode};

// ───────────────────────────────────────────────────────────────
// Pin capability port (driven adapter: domain ↔ GPIO / IO MUX)
// ───────────────────────────────────────────────────────────────

/// Function routed to a pad by the IO multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    /// Plain GPIO, controlled through [`PinPort::output_set`].
    Gpio,
    /// UART0 transmit (GPIO1 at boot).
    Uart0Tx,
    /// UART1 transmit (GPIO2 alternate function).
    Uart1Tx,
}

/// Low-level pin capabilities.
///
/// Masks use bit `n` for GPIO `n`, matching the SDK's combined
/// set/clear/enable/disable register write.
pub trait PinPort {
    /// Route `function` to the pad of `gpio`.
    fn select_function(&mut self, gpio: i32, function: PinFunction);

    /// Enable or disable the internal pull-up of `gpio`.
    fn set_pullup(&mut self, gpio: i32, enabled: bool);

    /// Drive high / drive low / enable output / disable output in one call.
    fn output_set(&mut self, set_mask: u32, clear_mask: u32, enable_mask: u32, disable_mask: u32);

    /// Raw input level (`true` = high).
    fn read_level(&self, gpio: i32) -> bool;
}

// ───────────────────────────────────────────────────────────────
// WiFi manager port
// ───────────────────────────────────────────────────────────────

pub trait WifiPort {
    /// Currently configured operating mode.
    fn opmode(&self) -> WifiMode;

    /// Change the configured operating mode (takes effect on `apply_settings`).
    fn set_opmode(&mut self, mode: WifiMode);

    /// Push the configured WiFi settings to the radio.
    fn apply_settings(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Settings port (live configuration + persistence commands)
// ───────────────────────────────────────────────────────────────

/// Live settings owned by the persistence layer.
pub trait SettingsPort {
    /// Current system configuration.
    fn system(&self) -> SystemConfig;

    /// Validate and replace the live system configuration (not persisted).
    fn update_system(&mut self, config: SystemConfig) -> Result<(), ConfigError>;

    /// Persist the current live settings.
    fn store(&mut self) -> Result<(), ConfigError>;

    /// Replace live and stored settings with factory defaults.
    fn restore_defaults(&mut self) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Parser port
// ───────────────────────────────────────────────────────────────

/// The slice of the ANSI parser the idle watchdog needs.
pub trait ParserPort {
    /// Monotonic (wrapping) count of received characters.
    fn char_count(&self) -> u32;

    /// Drop any partially received escape sequence.
    fn reset(&mut self);
}

/// Every port the [`IoService`](super::service::IoService) drives.
pub trait DevicePorts: PinPort + WifiPort + SettingsPort + ParserPort {}

impl<T: PinPort + WifiPort + SettingsPort + ParserPort> DevicePorts for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the settings blob.
///
/// Implementations MUST validate before persisting and return
/// [`Settings::default()`] when nothing has been stored yet.
pub trait ConfigPort {
    fn load(&self) -> Result<Settings, ConfigError>;

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.
///
/// Write operations MUST be atomic: no partial writes on power loss.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] and [`SettingsPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Full => Self::StorageFull,
            StorageError::NotFound | StorageError::IoError => Self::IoError,
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
