//! Delimited-text to HTML table rendering.
//!
//! Turns comma- or tab-separated input into a self-contained HTML page with
//! a sortable table.
//!
//! # Pipeline
//!
//! - Reader: parses the input into an optional header row plus body rows
//! - Markup: builds the `<table>` fragment, wrapping `http(s)://` cells in links
//! - Document: fills the page template with the fragment and embedded assets
//!
//! # Example
//!
//! ```no_run
//! use csvhtml_render::{DocumentGenerator, InputSource, RenderConfig};
//! use std::path::PathBuf;
//!
//! let input = InputSource::File(PathBuf::from("people.csv"));
//! let config = RenderConfig::new(b',').with_title(RenderConfig::title_for(&input));
//! let generator = DocumentGenerator::new(config);
//! let html = generator.generate(&input).unwrap();
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod markup;
pub mod reader;

pub use config::{resolve_delimiter, InputSource, RenderConfig, DEFAULT_TITLE};
pub use document::{render_document, WATCH_ROUTE};
pub use error::{ErrorKind, RenderError, Result};
pub use generator::DocumentGenerator;
pub use markup::{build_table, MarkupOptions};
pub use reader::{read_table, Row, Table};
