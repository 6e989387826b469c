//! HTTP surface of the node.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, trace + timeout layers)
//!     → GET /            health text
//!     → GET /<sub_path>  base64 subscription, once generated
//! ```

pub mod server;

pub use server::{build_router, AppState, HttpServer, HEALTH_BODY};
