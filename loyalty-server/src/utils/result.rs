//! RepoError → AppError 映射
//!
//! Repository 层业务错误在 API 边界统一转换为 HTTP 错误。

use crate::db::repository::RepoError;
use crate::utils::AppError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        let msg = err.to_string();
        match err {
            RepoError::NotFound(_) => AppError::NotFound(msg),

            RepoError::InvalidAmount(_) | RepoError::Validation(_) => AppError::Validation(msg),

            RepoError::DuplicateThreshold(_)
            | RepoError::Conflict(_)
            | RepoError::AlreadyProcessed(_) => AppError::Conflict(msg),

            RepoError::InsufficientBalance(_)
            | RepoError::InsufficientPoints(_)
            | RepoError::VoucherUnavailable(_)
            | RepoError::VoucherExpired(_)
            | RepoError::CodeAlreadyUsed(_)
            | RepoError::CodeExpired(_)
            | RepoError::InvalidTransition(_) => AppError::BusinessRule(msg),

            RepoError::Database(_) => AppError::Database(msg),
        }
    }
}
