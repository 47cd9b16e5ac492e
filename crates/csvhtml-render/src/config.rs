//! Render configuration types.

use crate::error::{RenderError, Result};
use std::path::{Path, PathBuf};

/// Title used when the input has no name (stdin).
pub const DEFAULT_TITLE: &str = "CSV to HTML";

/// File extensions that imply tab-separated input.
const TAB_EXTENSIONS: &[&str] = &["tsv", "tab"];

/// Where the delimited text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputSource {
    /// Standard input (unnamed).
    #[default]
    Stdin,
    /// A named file, re-opened for every render.
    File(PathBuf),
}

impl InputSource {
    /// Path of a named input.
    pub fn path(&self) -> Option<&Path> {
        match self {
            InputSource::Stdin => None,
            InputSource::File(path) => Some(path),
        }
    }

    /// Base name of a named input.
    pub fn name(&self) -> Option<String> {
        self.path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    pub fn is_named(&self) -> bool {
        matches!(self, InputSource::File(_))
    }
}

/// Resolve the field delimiter.
///
/// With no explicit separator, `.tsv`/`.tab` inputs use TAB and everything
/// else uses a comma. The two-character token `\t` means TAB. Any other
/// separator must be exactly one ASCII character.
pub fn resolve_delimiter(explicit: Option<&str>, input: Option<&Path>) -> Result<u8> {
    let separator = match explicit {
        None | Some("") => {
            return Ok(if input.is_some_and(has_tab_extension) {
                b'\t'
            } else {
                b','
            });
        }
        Some("\\t") => return Ok(b'\t'),
        Some(s) => s,
    };

    match separator.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(RenderError::InvalidConfig(format!(
            "invalid separator {separator:?}: must be exactly one character"
        ))),
    }
}

fn has_tab_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TAB_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Immutable settings for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Treat the first record as column labels.
    pub header: bool,
    /// Wrap `http://`/`https://` cells in anchors.
    pub detect_links: bool,
    /// HTML-escape cell text. Off by default: cells are emitted verbatim.
    pub escape_cells: bool,
    /// Document title.
    pub title: String,
    /// Embed the long-poll reload script.
    pub live_reload: bool,
    /// Minify the finished document.
    pub minify: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl RenderConfig {
    /// Create a configuration with defaults for the given delimiter.
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            header: true,
            detect_links: true,
            escape_cells: false,
            title: DEFAULT_TITLE.to_string(),
            live_reload: false,
            minify: false,
        }
    }

    /// Title for an input: its base name, or [`DEFAULT_TITLE`].
    pub fn title_for(input: &InputSource) -> String {
        input.name().unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_detect_links(mut self, detect: bool) -> Self {
        self.detect_links = detect;
        self
    }

    pub fn with_escape_cells(mut self, escape: bool) -> Self {
        self.escape_cells = escape;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}
