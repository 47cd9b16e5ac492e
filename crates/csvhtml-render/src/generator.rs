//! Document generator: reader → markup → page.

use crate::config::{InputSource, RenderConfig};
use crate::document::render_document;
use crate::error::Result;
use crate::markup::{build_table, MarkupOptions};
use crate::reader::{open_input, read_table};

use std::io::{Read, Write};
use tracing::{debug, info};

/// Renders delimited input into a complete HTML document.
///
/// Holds no per-render state, so one generator can serve concurrent renders;
/// every call parses its input from scratch.
#[derive(Debug, Clone)]
pub struct DocumentGenerator {
    config: RenderConfig,
}

impl DocumentGenerator {
    /// Create a new generator with configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Open `source`, render it, and close it again.
    pub fn generate(&self, source: &InputSource) -> Result<String> {
        debug!(input = ?source.path(), "rendering document");
        let reader = open_input(source)?;
        self.generate_from_reader(reader)
    }

    /// Render from an already-open reader.
    pub fn generate_from_reader<R: Read>(&self, input: R) -> Result<String> {
        let table = read_table(input, self.config.delimiter, self.config.header)?;

        let options = MarkupOptions {
            detect_links: self.config.detect_links,
            escape_cells: self.config.escape_cells,
        };
        let fragment = build_table(&table, &options);
        let html = render_document(&fragment, &self.config)?;

        info!(
            bytes = html.len(),
            rows = table.rows.len(),
            title = %self.config.title,
            "Document rendered"
        );
        Ok(html)
    }

    /// Render `source` and write the document to `out`.
    pub fn write_to<W: Write>(&self, source: &InputSource, mut out: W) -> Result<()> {
        let html = self.generate(source)?;
        out.write_all(html.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use std::io::Write as _;

    #[test]
    fn test_generator_default() {
        let generator = DocumentGenerator::new(RenderConfig::default());
        assert_eq!(generator.config().delimiter, b',');
        assert!(!generator.config().live_reload);
    }

    #[test]
    fn test_generate_from_reader() {
        let generator = DocumentGenerator::new(RenderConfig::default());
        let html = generator
            .generate_from_reader("name,site\nrust,https://rust-lang.org\n".as_bytes())
            .unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains(r#"<span class="header-cell-content">site</span>"#));
        assert!(html.contains(
            r#"<td><a href="https://rust-lang.org">https://rust-lang.org</a></td>"#
        ));
    }

    #[test]
    fn test_generate_from_file_uses_delimiter() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        write!(file, "a\tb\n1,2\t3\n").unwrap();

        let config = RenderConfig::new(b'\t');
        let generator = DocumentGenerator::new(config);
        let html = generator
            .generate(&InputSource::File(file.path().to_path_buf()))
            .unwrap();
        assert!(html.contains("<tr><td>1,2</td><td>3</td></tr>"));
    }

    #[test]
    fn test_generate_missing_file() {
        let generator = DocumentGenerator::new(RenderConfig::default());
        let err = generator
            .generate(&InputSource::File("/nonexistent/csvhtml.csv".into()))
            .unwrap_err();
        assert!(matches!(err, RenderError::OpenInput { .. }));
    }

    #[test]
    fn test_write_to_sink() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "h\nv\n").unwrap();

        let generator = DocumentGenerator::new(RenderConfig::default());
        let mut out = Vec::new();
        generator
            .write_to(&InputSource::File(file.path().to_path_buf()), &mut out)
            .unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("<td>v</td>"));
    }

    #[test]
    fn test_read_failure_produces_no_document() {
        let generator = DocumentGenerator::new(RenderConfig::default());
        let err = generator.generate_from_reader("".as_bytes()).unwrap_err();
        assert!(err.is_read_error());
    }
}
