//! Artifact fetching subsystem.
//!
//! # Data Flow
//! ```text
//! Architecture::detect (arch.rs)
//!     → artifact_plan (catalog.rs): ordered list of file name + URL
//!     → fetch_all (fetch.rs): concurrent downloads, joined
//!     → executables in the workspace (mode 0755)
//! ```
//!
//! # Design Decisions
//! - Best-effort: a failed download removes its partial file and is reported,
//!   never propagated
//! - Every download shares one client with a total timeout
//! - No checksum verification and no retry

pub mod arch;
pub mod catalog;
pub mod fetch;

pub use arch::Architecture;
pub use catalog::{artifact_plan, Artifact, ArtifactKind};
pub use fetch::{fetch_all, FetchError, FetchOutcome, Fetcher};
