// ==========================================
// 标牌报价估算引擎 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 校验失败必须在依赖它的算术之前抛出，不返回部分结果
// ==========================================

use thiserror::Error;

/// 引擎错误类型
///
/// 引擎是确定性的纯函数管线，错误不做重试，直接交给调用方决定如何呈现。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 宽/高/直径/面积 ≤ 0 或非有限数
    #[error("尺寸无效 ({field}={value}): 必须为大于 0 的有限数")]
    InvalidDimension { field: String, value: f64 },

    /// 数量 ≤ 0
    #[error("数量无效: quantity={0}，必须 ≥ 1")]
    InvalidQuantity(i64),

    /// 派生除数为 0（signs_produced 与 quantity 同时为 0）
    #[error("除数为零: {0}")]
    DivisionByZero(String),

    /// 必填参数缺失或取值非法（负数/非有限数/越界）
    #[error("配置错误 ({field}): {message}")]
    ConfigurationError { field: String, message: String },

    /// 单位成本为负数或非有限数
    #[error("单位成本无效: unit_cost={0}")]
    InvalidCost(f64),

    /// 阻塞任务异常退出（批量重算时）
    #[error("内部错误: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn invalid_dimension(field: &str, value: f64) -> Self {
        EngineError::InvalidDimension {
            field: field.to_string(),
            value,
        }
    }

    pub fn configuration(field: &str, message: impl Into<String>) -> Self {
        EngineError::ConfigurationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// 错误类别代码（用于报表/日志聚合）
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidDimension { .. } => "INVALID_DIMENSION",
            EngineError::InvalidQuantity(_) => "INVALID_QUANTITY",
            EngineError::DivisionByZero(_) => "DIVISION_BY_ZERO",
            EngineError::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            EngineError::InvalidCost(_) => "INVALID_COST",
            EngineError::Internal(_) => "INTERNAL",
        }
    }
}

// ==========================================
// 通用校验辅助
// ==========================================

/// 配置项必须为 ≥ 0 的有限数
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::configuration(field, format!("取值非有限数: {}", value)));
    }
    if value < 0.0 {
        return Err(EngineError::configuration(field, format!("不允许为负数: {}", value)));
    }
    Ok(())
}

/// 配置项必须为 > 0 的有限数
pub(crate) fn ensure_positive(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::configuration(field, format!("必须大于 0: {}", value)));
    }
    Ok(())
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
