//! Library loan tracker.
//!
//! Tracks book checkouts in a flat JSON file and reminds borrowers by email
//! when a loan reaches its due date:
//! - HTTP endpoints to add, list, edit, and delete loans
//! - near-due warnings computed on every listing
//! - a background sweep that emails borrowers on the due day
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use loan_tracker::{Config, RecordStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(Config::load()?);
//!     let store = Arc::new(RecordStore::new(&config.server.store_path));
//!     loan_tracker::server::start(config, store).await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod mailer;
pub mod server;
pub mod store;
pub mod sweep;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use server::{start as start_server, ServerState};
pub use store::{LoanRecord, RecordStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
