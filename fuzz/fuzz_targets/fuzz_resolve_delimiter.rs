//! Fuzz target for separator resolution.
//!
//! Any accepted separator must be a single ASCII byte.

#![no_main]

use libfuzzer_sys::fuzz_target;
use csvhtml_render::resolve_delimiter;

fuzz_target!(|separator: &str| {
    if let Ok(byte) = resolve_delimiter(Some(separator), None) {
        assert!(byte.is_ascii());
    }
});
