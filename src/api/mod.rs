// ==========================================
// 标牌报价估算引擎 - API 层
// ==========================================
// 职责: 提供报价业务接口，供命令行及其它调用方使用
// ==========================================

pub mod error;
pub mod pricing_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use pricing_api::{LineQuote, PricingApi, ScheduleQuote};
