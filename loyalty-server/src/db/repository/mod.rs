//! Repository Module
//!
//! One module per aggregate. Module-level async functions over
//! `&SqlitePool`; every multi-row mutation runs inside a transaction whose
//! UPDATEs carry their precondition in the WHERE clause — `rows_affected()
//! == 0` aborts with the specific business error and nothing commits.

pub mod affiliate;
pub mod affiliate_tier;
pub mod member;
pub mod payout;
pub mod point_history;
pub mod redemption;
pub mod tier;
pub mod voucher;

use thiserror::Error;

/// Repository error types — the business-rule taxonomy of the ledger
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("Insufficient points: {0}")]
    InsufficientPoints(String),

    #[error("Voucher unavailable: {0}")]
    VoucherUnavailable(String),

    #[error("Voucher expired: {0}")]
    VoucherExpired(String),

    #[error("Code already used: {0}")]
    CodeAlreadyUsed(String),

    #[error("Code expired: {0}")]
    CodeExpired(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Already processed: {0}")]
    AlreadyProcessed(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Duplicate threshold: {0}")]
    DuplicateThreshold(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// True when a sqlx error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.message().to_lowercase().contains("unique"),
        _ => false,
    }
}
