//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`DataResponse`] / [`MessageResponse`] - API 响应结构
//! - 日志工具

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResult, DataResponse, MessageResponse, data, message};
pub use logger::init_logger;
