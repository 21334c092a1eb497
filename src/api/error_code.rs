//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::RotatorError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 轮换/统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,
    RequestTimeout = 1031,

    // 轮换/统计错误 3000-3099
    NoCandidates = 3000,
}

impl From<RotatorError> for ErrorCode {
    fn from(err: RotatorError) -> Self {
        match err {
            RotatorError::NoCandidates(_) => ErrorCode::NoCandidates,
            RotatorError::NotFound(_) => ErrorCode::NotFound,
            RotatorError::Validation(_) => ErrorCode::BadRequest,
            RotatorError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            RotatorError::Cancelled(_) => ErrorCode::RequestTimeout,
            RotatorError::DatabaseConfig(_)
            | RotatorError::DatabaseOperation(_)
            | RotatorError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
