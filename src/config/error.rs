// ==========================================
// 标牌报价估算引擎 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("数据库操作失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("锁获取失败: {0}")]
    Lock(String),

    #[error("配置 JSON 解析失败: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("报价参数方案不存在: {0}")]
    ProfileNotFound(String),

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
