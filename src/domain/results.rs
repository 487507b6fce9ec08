// ==========================================
// 标牌报价估算引擎 - 计算结果领域模型
// ==========================================
// 所有结果均为按需计算的值对象，不落库
// ==========================================

use crate::domain::types::PricingBasis;
use serde::{Deserialize, Serialize};

// ==========================================
// BatchResult - 批次优化结果
// ==========================================
// 不变量: signs_produced ≥ quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub quantity: u64,        // 订购数量
    pub signs_per_mold: u64,  // 每模块数
    pub molds_needed: u64,    // 所需模数
    pub signs_produced: u64,  // 实际产出 = molds × signs_per_mold
    pub surplus_stock: u64,   // 多出库存 = signs_produced − quantity
}

// ==========================================
// MaterialUsage - 物料用量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialUsage {
    // ===== 面板/基材层（大板） =====
    pub sheets_needed: f64,          // 大板用量（允许小数）
    pub total_sheet_area_sqin: f64,  // 消耗板面积
    pub total_sign_area_sqin: f64,   // 成品面积（按订购数量）
    pub waste_percent: f64,          // 损耗率 [0, 100]（基材层，整块面积）
    pub base_waste_percent: f64,     // 面板层损耗率（扣除视窗开口）

    // ===== 视窗层（视窗板，整张计） =====
    pub window_layer: bool,          // 是否计入视窗层
    pub windows_per_sheet: u64,      // 每张视窗板可排视窗数
    pub window_sheets_needed: u64,   // 视窗板用量
    pub total_window_area_sqin: f64, // 视窗成品面积
    pub window_waste_percent: f64,   // 视窗层损耗率 [0, 100]
}

// ==========================================
// CostResult - 成本汇总
// ==========================================
// 不变量: total_unit_cost ≥ 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub material_unit_cost: f64,
    pub labor_unit_cost: f64,
    pub overhead_unit_cost: f64,
    pub total_unit_cost: f64,
    pub waste_percent: f64,

    // ===== 批次合计 =====
    pub sheet_material_cost: f64,
    pub consumable_cost: f64,
    pub labor_cost: f64,
}

// ==========================================
// PriceResult - 售价推荐
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    pub unit_price: f64,        // 取整后单价
    pub unit_cost_floor: f64,   // 成本底价
    pub size_curve_price: f64,  // 尺寸曲线价（已含最低价）
    pub basis: PricingBasis,    // 胜出依据
}

// ==========================================
// FullComputation - 单行完整计算结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FullComputation {
    pub batch: BatchResult,
    pub usage: MaterialUsage,
    pub cost: CostResult,
    pub price: PriceResult,
}
