//! Data models
//!
//! Shared between loyalty-server and the web clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps Unix millis.
//!
//! Wire casing follows the existing clients: loyalty payloads are camelCase,
//! affiliate payloads snake_case.

pub mod affiliate;
pub mod member;
pub mod payout;
pub mod point_history;
pub mod redemption;
pub mod tier;
pub mod voucher;

// Re-exports
pub use affiliate::*;
pub use member::*;
pub use payout::*;
pub use point_history::*;
pub use redemption::*;
pub use tier::*;
pub use voucher::*;
