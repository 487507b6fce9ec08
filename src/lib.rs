// ==========================================
// 标牌报价估算引擎 - 核心库
// ==========================================
// 管线: 批次优化 → 物料用量 → 成本汇总 → 售价推荐
// 技术栈: Rust + SQLite（参数目录）
// 系统定位: 报价辅助（最终报价由估算员确认）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值对象与类型
pub mod domain;

// 引擎层 - 纯计算
pub mod engine;

// 导入层 - 标牌清单
pub mod importer;

// 配置层 - 参数目录
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CostAllocation, LaborBasis, PricingBasis, SubstrateKind};

// 领域值对象
pub use domain::{
    BatchResult, CostResult, EstimateFees, EstimateLine, EstimateTotals, FullComputation,
    LaborRates, LineEconomics, MaterialRates, MaterialUsage, PressSheetConfig, PriceResult,
    PricingCurveConfig, SignSpec,
};

// 引擎
pub use engine::{
    compute_full, BatchOptimizer, BatchPricer, CostAggregator, EngineError, EngineResult,
    EstimateRollup, MaterialUsageCalculator, PriceRecommender,
};

// 配置
pub use config::{ConfigManager, PricingCatalog, PricingProfile, StaticCatalog};

// API
pub use api::{ApiError, PricingApi, ScheduleQuote};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "标牌报价估算引擎";
