//! Fuzz target for table markup.
//!
//! With escaping on, cell text must never open a tag of its own.

#![no_main]

use libfuzzer_sys::fuzz_target;
use csvhtml_render::{build_table, MarkupOptions, Table};

fuzz_target!(|rows: Vec<Vec<String>>| {
    let table = Table { header: None, rows };
    let options = MarkupOptions {
        detect_links: false,
        escape_cells: true,
    };
    let html = build_table(&table, &options);
    assert_eq!(html.matches("<td>").count(), html.matches("</td>").count());
    for cell in html.split("<td>").skip(1) {
        let content = cell.split("</td>").next().unwrap_or_default();
        assert!(!content.contains('<'), "unescaped markup in cell: {content:?}");
    }
});
