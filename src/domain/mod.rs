// ==========================================
// 标牌报价估算引擎 - 领域层
// ==========================================
// 职责: 定义输入规格、费率配置与计算结果值对象
// 红线: 领域层不做计算编排，不读取配置存储
// ==========================================

pub mod estimate;
pub mod rates;
pub mod results;
pub mod sign;
pub mod types;

// 重导出核心类型
pub use estimate::{
    EquipmentRental, EstimateFees, EstimateLine, EstimateTotals, LineEconomics,
};
pub use rates::{
    LaborRatePair, LaborRates, LayerRate, MaterialRates, PressSheetConfig, PricingCurveConfig,
};
pub use results::{BatchResult, CostResult, FullComputation, MaterialUsage, PriceResult};
pub use sign::SignSpec;
pub use types::{CostAllocation, LaborBasis, PricingBasis, SubstrateKind};
