//! Quick Open: a query redirector.
//!
//! A query is classified, searched against the configured provider if
//! needed, ranked, and answered with a redirect to the best page. The
//! routing engine lives in [`quickopen_route`]; this crate adds the
//! configuration file, environment overlay and the HTTP endpoint.

pub mod config;
pub mod error;
pub mod server;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use server::QuickOpenServer;
