// ==========================================
// 标牌报价估算引擎 - API层错误类型
// ==========================================
// 职责: 汇总引擎/配置/导入层错误，转换为面向用户的错误消息
// ==========================================

use crate::config::error::ConfigError;
use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 计算引擎拒绝输入（保留引擎错误码）
    #[error("报价计算失败 [{code}]: {message}")]
    CalculationError { code: String, message: String },

    #[error("参数配置错误: {0}")]
    ConfigurationError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Internal(msg) => ApiError::InternalError(msg),
            other => ApiError::CalculationError {
                code: other.code().to_string(),
                message: other.to_string(),
            },
        }
    }
}

// ==========================================
// 从 ConfigError 转换
// ==========================================
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound(id) => ApiError::NotFound(format!("报价参数方案(id={})", id)),
            ConfigError::Database(e) => ApiError::DatabaseError(e.to_string()),
            ConfigError::Lock(msg) => ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg)),
            ConfigError::Serde(e) => ApiError::ConfigurationError(format!("方案 JSON 无法解析: {}", e)),
            ConfigError::InvalidValue { key, message } => {
                ApiError::ConfigurationError(format!("{}: {}", key, message))
            }
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件 {}", path)),
            ImportError::UnsupportedFormat(ext) => {
                ApiError::InvalidInput(format!("文件格式不支持: {}", ext))
            }
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
