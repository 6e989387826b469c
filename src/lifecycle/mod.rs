//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Prepare workspace → Deregister old nodes → Cleanup → Write configs
//!     → Fetch binaries → Launch detached → Serve HTTP
//!
//! Shutdown (shutdown.rs):
//!     Signal received → HTTP server stops accepting → Exit
//!     (launched children keep running)
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Linear startup: each step runs after the previous one
//! - Only workspace creation, proxy config and the HTTP bind are fatal
//! - The listener starts last (traffic only when provisioning is done)

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, bootstrap_for, run, write_configs, BootstrapReport, StartupError};
