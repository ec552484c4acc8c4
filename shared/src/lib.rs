//! Shared types for the loyalty platform
//!
//! Data models and utilities used by the loyalty server and, via the API,
//! by the storefront / back-office clients.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
