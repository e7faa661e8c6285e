//! Fuzz target: settings blob decoding
//!
//! Plants arbitrary bytes as the stored settings blob and loads it.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Anything that loads passes validation and re-saves unchanged
//!
//! cargo fuzz run fuzz_settings_blob

#![no_main]

use espterm_io::adapters::nvs::{NvsAdapter, SETTINGS_KEY, SETTINGS_NAMESPACE};
use espterm_io::app::ports::{ConfigPort, StoragePort};
use espterm_io::config::validate_config;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut nvs) = NvsAdapter::new() else {
        return;
    };
    if nvs.write(SETTINGS_NAMESPACE, SETTINGS_KEY, data).is_err() {
        return;
    }

    if let Ok(settings) = nvs.load() {
        assert!(validate_config(&settings.system).is_ok());
        nvs.save(&settings).expect("loaded settings must re-save");
        assert_eq!(nvs.load().ok(), Some(settings));
    }
});
