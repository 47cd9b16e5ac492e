//! csvhtml core library
//!
//! This library provides the service side of csvhtml:
//! - Exit codes for CLI operations
//! - CLI-equivalent options and their resolution into a render config
//! - Single-shot and HTTP serve modes
//! - The `/watch` long-poll change notification, cancelled on client disconnect
//! - Structured logging setup
//!
//! The binary entry point is in `main.rs`.

pub mod disconnect;
pub mod exit_codes;
pub mod logging;
pub mod options;
pub mod serve;
pub mod service;
pub mod watch;

pub use options::ServiceOptions;
pub use service::{run, run_once, ServiceError};
