//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!
//! Consumers:
//!     → logging.rs (fmt layer on stdout, filtered by RUST_LOG)
//!     → tower-http TraceLayer spans for HTTP requests
//! ```
//!
//! # Design Decisions
//! - Structured fields over interpolated messages
//! - Log level configurable via environment
//! - Failures of best-effort steps are only visible here

pub mod logging;
