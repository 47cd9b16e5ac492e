//! CLI-equivalent options and their resolution into a [`RenderConfig`].

use csvhtml_render::{resolve_delimiter, InputSource, RenderConfig, Result};
use std::path::Path;

/// Everything the command line can set. Built once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Input source; stdin when no file is named.
    pub input: InputSource,
    /// Separator override as typed (`\t` accepted for TAB).
    pub separator: Option<String>,
    /// First record is the header.
    pub header: bool,
    /// Wrap `http(s)://` cells in links.
    pub detect_links: bool,
    /// HTML-escape cell text.
    pub escape_cells: bool,
    /// Minify the emitted document.
    pub minify: bool,
    /// Listen address; `None` means single-shot mode.
    pub serve: Option<String>,
    /// Live reload in serve mode.
    pub watch: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            input: InputSource::Stdin,
            separator: None,
            header: true,
            detect_links: true,
            escape_cells: false,
            minify: false,
            serve: None,
            watch: true,
        }
    }
}

impl ServiceOptions {
    /// Listen address, ignoring an empty string.
    pub fn serve_addr(&self) -> Option<&str> {
        self.serve.as_deref().filter(|addr| !addr.is_empty())
    }

    /// Live reload needs serve mode, the watch flag, and a named input.
    pub fn live_reload_eligible(&self) -> bool {
        self.serve_addr().is_some() && self.watch && self.input.is_named()
    }

    /// File watched by `/watch`, when live reload is eligible.
    pub fn watched_path(&self) -> Option<&Path> {
        if self.live_reload_eligible() {
            self.input.path()
        } else {
            None
        }
    }

    /// Resolve the immutable render configuration.
    ///
    /// Fails with `InvalidConfig` on a bad separator, before any input is
    /// touched.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let delimiter = resolve_delimiter(self.separator.as_deref(), self.input.path())?;
        Ok(RenderConfig::new(delimiter)
            .with_header(self.header)
            .with_detect_links(self.detect_links)
            .with_escape_cells(self.escape_cells)
            .with_title(RenderConfig::title_for(&self.input))
            .with_live_reload(self.live_reload_eligible())
            .with_minify(self.minify))
    }
}
