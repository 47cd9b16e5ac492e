//! Exit codes for the csvhtml CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use csvhtml_render::{ErrorKind, RenderError};

use crate::service::ServiceError;

/// Exit codes for csvhtml.
///
/// These codes are a stable contract for scripts wrapping the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Document written (or server stopped cleanly)
    Clean = 0,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments or configuration (e.g. bad separator)
    ArgsError = 10,

    /// Input could not be opened or parsed
    InputError = 11,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Template rendering failed
    InternalError = 20,

    /// I/O error (stdout write, listener bind)
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the error code name as a string constant.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&RenderError> for ExitCode {
    fn from(err: &RenderError) -> Self {
        match err.kind() {
            ErrorKind::InvalidConfig => ExitCode::ArgsError,
            ErrorKind::Read => ExitCode::InputError,
            ErrorKind::Template => ExitCode::InternalError,
            ErrorKind::Io => ExitCode::IoError,
        }
    }
}

impl From<&ServiceError> for ExitCode {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::Render(e) => ExitCode::from(e),
            ServiceError::Serve(_) => ExitCode::IoError,
        }
    }
}
