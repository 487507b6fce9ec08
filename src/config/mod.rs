// ==========================================
// 标牌报价估算引擎 - 配置层
// ==========================================
// 职责: 报价参数目录管理，解析本次计算使用的参数方案
// 存储: config_kv 表
// ==========================================

pub mod catalog_trait;
pub mod config_manager;
pub mod error;
pub mod pricing_profile;
pub mod static_catalog;

// 重导出核心配置管理器
pub use catalog_trait::{PricingCatalog, GLOBAL_PROFILE_ID};
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use pricing_profile::PricingProfile;
pub use static_catalog::StaticCatalog;
