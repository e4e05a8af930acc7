//! Moodline Server
//!
//! HTTP API serving sentiment classifications for page titles. The model
//! backend is resolved once at startup through a tiered cascade (registry,
//! local snapshot, pretrained fallback); every request is answered in the
//! same response shape regardless of which tier is live.

pub mod config;
pub mod routes;

pub use config::{Cli, ServerConfig};
pub use routes::{create_router, AppState};
