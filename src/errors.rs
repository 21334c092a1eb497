use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum RotatorError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    NoCandidates(String),
    Serialization(String),
    Cancelled(String),
}

impl RotatorError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            RotatorError::DatabaseConfig(_) => "E001",
            RotatorError::DatabaseConnection(_) => "E002",
            RotatorError::DatabaseOperation(_) => "E003",
            RotatorError::Validation(_) => "E004",
            RotatorError::NotFound(_) => "E005",
            RotatorError::NoCandidates(_) => "E006",
            RotatorError::Serialization(_) => "E007",
            RotatorError::Cancelled(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            RotatorError::DatabaseConfig(_) => "Database Configuration Error",
            RotatorError::DatabaseConnection(_) => "Database Connection Error",
            RotatorError::DatabaseOperation(_) => "Database Operation Error",
            RotatorError::Validation(_) => "Validation Error",
            RotatorError::NotFound(_) => "Resource Not Found",
            RotatorError::NoCandidates(_) => "No Candidate Banners",
            RotatorError::Serialization(_) => "Serialization Error",
            RotatorError::Cancelled(_) => "Request Cancelled",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            RotatorError::DatabaseConfig(msg) => msg,
            RotatorError::DatabaseConnection(msg) => msg,
            RotatorError::DatabaseOperation(msg) => msg,
            RotatorError::Validation(msg) => msg,
            RotatorError::NotFound(msg) => msg,
            RotatorError::NoCandidates(msg) => msg,
            RotatorError::Serialization(msg) => msg,
            RotatorError::Cancelled(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码，API 层直接使用
    pub fn http_status(&self) -> StatusCode {
        match self {
            RotatorError::DatabaseConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RotatorError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            RotatorError::DatabaseOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RotatorError::Validation(_) => StatusCode::BAD_REQUEST,
            RotatorError::NotFound(_) => StatusCode::NOT_FOUND,
            RotatorError::NoCandidates(_) => StatusCode::NOT_FOUND,
            RotatorError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RotatorError::Cancelled(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RotatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RotatorError {}

// 便捷的构造函数
impl RotatorError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        RotatorError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        RotatorError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        RotatorError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        RotatorError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        RotatorError::NotFound(msg.into())
    }

    pub fn no_candidates<T: Into<String>>(msg: T) -> Self {
        RotatorError::NoCandidates(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        RotatorError::Serialization(msg.into())
    }

    pub fn cancelled<T: Into<String>>(msg: T) -> Self {
        RotatorError::Cancelled(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for RotatorError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                RotatorError::DatabaseConnection(err.to_string())
            }
            _ => RotatorError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RotatorError {
    fn from(err: serde_json::Error) -> Self {
        RotatorError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RotatorError>;
