//! Fuzz target for delimited-text parsing.
//!
//! Tests that `read_table` handles arbitrary bytes (quotes, ragged rows,
//! non-UTF8) without panicking, for both header modes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use csvhtml_render::read_table;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    tab: bool,
    header: bool,
    data: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let delimiter = if input.tab { b'\t' } else { b',' };
    if let Ok(table) = read_table(input.data, delimiter, input.header) {
        assert_eq!(table.header.is_some(), input.header);
    }
});
