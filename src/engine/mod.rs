// ==========================================
// 标牌报价估算引擎 - 引擎层
// ==========================================
// 管线: 批次优化 → 物料用量 → 成本汇总 → 售价推荐
// 职责: 纯计算，不读配置存储，不做 I/O
// 红线: 所有引擎无状态，可任意并发调用
// ==========================================

pub mod batch_optimizer;
pub mod batch_pricer;
pub mod cost_aggregator;
pub mod error;
pub mod estimate_rollup;
pub mod material_usage;
pub mod pipeline;
pub mod price_recommender;

// 重导出核心引擎
pub use batch_optimizer::BatchOptimizer;
pub use batch_pricer::{BatchPricer, BatchPricingReport, LineFailure, PricedLine};
pub use cost_aggregator::CostAggregator;
pub use error::{EngineError, EngineResult};
pub use estimate_rollup::EstimateRollup;
pub use material_usage::MaterialUsageCalculator;
pub use pipeline::compute_full;
pub use price_recommender::PriceRecommender;
