//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to               |
//! |----------------|--------------------|---------------------------|
//! | `hardware`     | PinPort            | GPIO / IO MUX registers   |
//! |                | DevicePorts (all)  | composite of the below    |
//! |                | ParserPort         | via `ParserLink`          |
//! | `log_sink`     | EventSink          | Serial log output         |
//! | `nvs`          | ConfigPort         | NVS / in-memory store     |
//! |                | StoragePort        |                           |
//! | `parser_link`  | `ParserLink`       | ANSI parser (atomics)     |
//! | `settings`     | SettingsPort       | live settings + ConfigPort|
//! |                | WifiPort           | WiFi radio                |
//! | `wifi`         | `WifiRadio`        | ESP-IDF WiFi mode         |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod parser_link;
pub mod settings;
pub mod wifi;
