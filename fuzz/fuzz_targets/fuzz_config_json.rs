//! Fuzz target: `SystemConfig::from_json`
//!
//! Arbitrary text must never panic the config parser, and anything it
//! accepts must pass validation.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use waterharvest::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(cfg) = SystemConfig::from_json(text) {
        assert!(cfg.validate().is_ok(), "from_json returned an invalid config");
    }
});
