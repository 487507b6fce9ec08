// ==========================================
// 标牌报价估算引擎 - 报价单领域模型
// ==========================================
// 用途: 报价行、行级经济指标、报价单费用与合计
// ==========================================

use crate::domain::sign::SignSpec;
use crate::engine::error::{ensure_non_negative, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// EstimateLine - 报价行（一个标牌类型）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateLine {
    pub sign_type: String,            // 标牌类型编号（A / SN-1 / RID-1 …）
    #[serde(default)]
    pub description: Option<String>,
    pub spec: SignSpec,
}

impl EstimateLine {
    pub fn new(sign_type: impl Into<String>, spec: SignSpec) -> Self {
        Self {
            sign_type: sign_type.into(),
            description: None,
            spec,
        }
    }
}

// ==========================================
// LineEconomics - 行级经济指标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineEconomics {
    pub line_total: f64,         // qty × unit_price
    pub material_extended: f64,  // qty × material_unit_cost
    pub labor_extended: f64,     // qty × labor_unit_cost
    pub labor_hours: f64,        // molds × 模时 / 60
    pub breakeven_price: f64,    // = total_unit_cost
    pub profit_margin_pct: f64,  // (price − cost) / price × 100
}

// ==========================================
// EstimateFees - 报价单级费用输入
// ==========================================
/// 缺省字段取默认值（安装 40/h、差旅 0.72/mi × 往返 × 2 趟、模时 50 分钟、车间 85/h）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateFees {
    // ===== 安装 =====
    pub install_hours: f64,
    pub install_rate: f64,          // 安装班组合计小时费率

    // ===== 差旅 =====
    pub travel_miles: f64,          // 单程里程
    pub travel_rate: f64,           // 每英里费率
    pub travel_trips: u32,          // 往返趟数

    // ===== 设备租赁 =====
    #[serde(default)]
    pub equipment: Option<EquipmentRental>,

    // ===== 车间人工（仅跟踪，不计入客户报价） =====
    pub mold_time_minutes: f64,
    pub shop_rate: f64,
}

impl Default for EstimateFees {
    fn default() -> Self {
        Self {
            install_hours: 0.0,
            install_rate: 40.0,
            travel_miles: 0.0,
            travel_rate: 0.72,
            travel_trips: 2,
            equipment: None,
            mold_time_minutes: 50.0,
            shop_rate: 85.0,
        }
    }
}

impl EstimateFees {
    pub fn validate(&self) -> EngineResult<()> {
        ensure_non_negative("fees.install_hours", self.install_hours)?;
        ensure_non_negative("fees.install_rate", self.install_rate)?;
        ensure_non_negative("fees.travel_miles", self.travel_miles)?;
        ensure_non_negative("fees.travel_rate", self.travel_rate)?;
        ensure_non_negative("fees.mold_time_minutes", self.mold_time_minutes)?;
        ensure_non_negative("fees.shop_rate", self.shop_rate)?;
        if let Some(eq) = &self.equipment {
            ensure_non_negative("fees.equipment.days", eq.days)?;
            ensure_non_negative("fees.equipment.daily_rate", eq.daily_rate)?;
            ensure_non_negative("fees.equipment.delivery", eq.delivery)?;
        }
        Ok(())
    }
}

/// 设备租赁（升降机/剪叉车等）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRental {
    #[serde(default)]
    pub equipment_type: Option<String>,
    pub days: f64,
    pub daily_rate: f64,
    pub delivery: f64,
}

// ==========================================
// EstimateTotals - 报价单合计
// ==========================================
// 客户报价 = 标牌 + 安装 + 差旅 + 设备；车间人工只跟踪
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EstimateTotals {
    pub line_count: usize,
    pub total_molds: u64,
    pub signage_total: f64,
    pub shop_labor_total: f64,
    pub install_total: f64,
    pub travel_total: f64,
    pub equipment_total: f64,
    pub subtotal: f64,
    pub total: f64,
    pub profit_amount: f64,
    pub profit_margin_pct: f64,
}
