//! Render service: single-shot output or HTTP serve mode.

use crate::options::ServiceOptions;
use crate::serve::{self, ServeError, ServeState};

use csvhtml_render::{DocumentGenerator, RenderError};
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

/// Failure of a whole service run.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("render document: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Serve(#[from] ServeError),
}

/// Render once into `out`. Fully synchronous.
pub fn run_once<W: Write>(options: &ServiceOptions, out: W) -> Result<(), RenderError> {
    let config = options.render_config()?;
    debug!(?config, "single-shot render");
    DocumentGenerator::new(config).write_to(&options.input, out)
}

/// Run in the mode the options select.
///
/// Configuration is resolved before binding, so a bad separator fails the
/// process instead of every request.
pub fn run(options: &ServiceOptions) -> Result<(), ServiceError> {
    let Some(addr) = options.serve_addr() else {
        let stdout = io::stdout();
        run_once(options, stdout.lock())?;
        return Ok(());
    };

    let config = options.render_config()?;
    let state = ServeState::new(options, config);
    actix_web::rt::System::new().block_on(serve::serve(addr, state))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvhtml_render::InputSource;
    use std::io::Write as _;

    #[test]
    fn test_run_once_writes_document() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "city,url\nOslo,https://oslo.no\n").unwrap();

        let options = ServiceOptions {
            input: InputSource::File(file.path().to_path_buf()),
            ..ServiceOptions::default()
        };
        let mut out = Vec::new();
        run_once(&options, &mut out).unwrap();

        let html = String::from_utf8(out).unwrap();
        assert!(html.contains(r#"<a href="https://oslo.no">https://oslo.no</a>"#));
        assert!(!html.contains("/watch"));
    }

    #[test]
    fn test_run_once_invalid_separator_writes_nothing() {
        let options = ServiceOptions {
            input: InputSource::File("/nonexistent/input.csv".into()),
            separator: Some("ab".into()),
            ..ServiceOptions::default()
        };
        let mut out = Vec::new();
        let err = run_once(&options, &mut out).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_once_missing_file_is_read_error() {
        let options = ServiceOptions {
            input: InputSource::File("/nonexistent/input.csv".into()),
            ..ServiceOptions::default()
        };
        let err = run_once(&options, Vec::new()).unwrap_err();
        assert!(err.is_read_error());
    }

    #[test]
    fn test_service_error_context() {
        let err = ServiceError::from(RenderError::MissingHeader);
        assert_eq!(
            err.to_string(),
            "render document: read header row: input is empty"
        );
    }
}
