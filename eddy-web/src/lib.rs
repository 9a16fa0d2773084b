//! Eddy Web - JSON API Server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Exposes the aggregation operations as a small JSON API, plus password
//! protected provider management and a static asset fallback for the
//! browser front end.

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, router, run_server, serve};
