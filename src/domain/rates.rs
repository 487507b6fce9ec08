// ==========================================
// 标牌报价估算引擎 - 费率与参数领域模型
// ==========================================
// 用途: 压板/大板几何、物料费率、人工费率、价格曲线
// 约束: 纯配置值对象，由调用方显式传入，引擎不读取任何全局配置
// ==========================================

use crate::domain::types::{CostAllocation, LaborBasis, SubstrateKind};
use crate::engine::error::{ensure_non_negative, ensure_positive, EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// PressSheetConfig - 压板与大板几何
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressSheetConfig {
    pub width_in: f64,              // 压板宽 (in)
    pub height_in: f64,             // 压板高 (in)
    pub molds_per_master_sheet: u32, // 每张大板可出模数
    pub master_width_in: f64,       // 大板宽 (in)
    pub master_height_in: f64,      // 大板高 (in)

    // ===== 视窗板（独立排版） =====
    #[serde(default = "default_window_sheet_width")]
    pub window_sheet_width_in: f64,
    #[serde(default = "default_window_sheet_height")]
    pub window_sheet_height_in: f64,
}

fn default_window_sheet_width() -> f64 {
    24.0
}

fn default_window_sheet_height() -> f64 {
    48.0
}

impl Default for PressSheetConfig {
    fn default() -> Self {
        Self {
            width_in: 13.0,
            height_in: 19.0,
            molds_per_master_sheet: 17,
            master_width_in: 49.0,
            master_height_in: 97.0,
            window_sheet_width_in: default_window_sheet_width(),
            window_sheet_height_in: default_window_sheet_height(),
        }
    }
}

impl PressSheetConfig {
    pub fn master_area_sqin(&self) -> f64 {
        self.master_width_in * self.master_height_in
    }

    pub fn window_sheet_area_sqin(&self) -> f64 {
        self.window_sheet_width_in * self.window_sheet_height_in
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_positive("press.width_in", self.width_in)?;
        ensure_positive("press.height_in", self.height_in)?;
        if self.molds_per_master_sheet == 0 {
            return Err(EngineError::configuration(
                "press.molds_per_master_sheet",
                "每张大板出模数必须 ≥ 1",
            ));
        }
        ensure_positive("press.master_width_in", self.master_width_in)?;
        ensure_positive("press.master_height_in", self.master_height_in)?;
        ensure_positive("press.window_sheet_width_in", self.window_sheet_width_in)?;
        ensure_positive("press.window_sheet_height_in", self.window_sheet_height_in)?;
        Ok(())
    }
}

// ==========================================
// LayerRate - 单层物料费率
// ==========================================
// 按张计价，或按面积计价（折算为整张大板价格）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", content = "value", rename_all = "snake_case")]
pub enum LayerRate {
    PerSheet(f64),
    PerSquareInch(f64),
}

impl LayerRate {
    /// 折算为每张大板的价格
    pub fn per_sheet(&self, master_area_sqin: f64) -> f64 {
        match *self {
            LayerRate::PerSheet(cost) => cost,
            LayerRate::PerSquareInch(cost) => cost * master_area_sqin,
        }
    }

    fn raw(&self) -> f64 {
        match *self {
            LayerRate::PerSheet(v) | LayerRate::PerSquareInch(v) => v,
        }
    }
}

// ==========================================
// MaterialRates - 物料与耗材费率
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRates {
    // ===== 板材层 =====
    pub base_sheet: LayerRate,      // 面板（Pionite）
    pub substrate: LayerRate,       // 基材（ABS/亚克力）
    pub window_insert: LayerRate,   // 视窗层（按视窗板计价，仅带视窗标牌计入）

    // ===== 每块耗材 =====
    pub ink_per_sign: f64,
    pub paint_per_sign: f64,
    pub hotstamp_per_sign: f64,

    // ===== 每模耗材 =====
    pub tape_per_mold: f64,
    pub lube_per_mold: f64,

    // ===== 分摊口径 =====
    #[serde(default)]
    pub allocation: CostAllocation,
}

impl Default for MaterialRates {
    fn default() -> Self {
        Self {
            base_sheet: LayerRate::PerSheet(211.30),
            substrate: LayerRate::PerSheet(SubstrateKind::AbsEighth.default_sheet_cost()),
            window_insert: LayerRate::PerSheet(75.0),
            ink_per_sign: 0.33,
            paint_per_sign: 0.60,
            hotstamp_per_sign: 0.0,
            tape_per_mold: 0.25,
            lube_per_mold: 0.50,
            allocation: CostAllocation::Produced,
        }
    }
}

impl MaterialRates {
    /// 按目录默认价替换基材层
    pub fn with_substrate(mut self, kind: SubstrateKind) -> Self {
        self.substrate = LayerRate::PerSheet(kind.default_sheet_cost());
        self
    }

    /// 每块耗材费率合计
    pub fn per_sign_sum(&self) -> f64 {
        self.ink_per_sign + self.paint_per_sign + self.hotstamp_per_sign
    }

    /// 每模耗材费率合计
    pub fn per_mold_sum(&self) -> f64 {
        self.tape_per_mold + self.lube_per_mold
    }

    /// 面板 + 基材每张大板价格合计
    pub fn sheet_rate_sum(&self, master_area_sqin: f64) -> f64 {
        self.base_sheet.per_sheet(master_area_sqin) + self.substrate.per_sheet(master_area_sqin)
    }

    /// 每张视窗板价格
    pub fn window_sheet_rate(&self, window_sheet_area_sqin: f64) -> f64 {
        self.window_insert.per_sheet(window_sheet_area_sqin)
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_non_negative("rates.base_sheet", self.base_sheet.raw())?;
        ensure_non_negative("rates.substrate", self.substrate.raw())?;
        ensure_non_negative("rates.window_insert", self.window_insert.raw())?;
        ensure_non_negative("rates.ink_per_sign", self.ink_per_sign)?;
        ensure_non_negative("rates.paint_per_sign", self.paint_per_sign)?;
        ensure_non_negative("rates.hotstamp_per_sign", self.hotstamp_per_sign)?;
        ensure_non_negative("rates.tape_per_mold", self.tape_per_mold)?;
        ensure_non_negative("rates.lube_per_mold", self.lube_per_mold)?;
        Ok(())
    }
}

// ==========================================
// LaborRates - 人工费率
// ==========================================
/// 每模人工成本（最好/最坏情况）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaborRatePair {
    pub best_per_mold: f64,
    pub worst_per_mold: f64,
}

impl Default for LaborRatePair {
    fn default() -> Self {
        Self {
            best_per_mold: 40.0,
            worst_per_mold: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRates {
    pub minutes_per_mold: f64,              // 每模工时（分钟）
    pub hourly_rate: f64,                   // 车间小时费率（已含管理费）
    #[serde(default)]
    pub rate_pair: Option<LaborRatePair>,   // 最好/最坏每模成本
    #[serde(default)]
    pub basis: LaborBasis,                  // 计价口径
    #[serde(default)]
    pub overhead_pct: f64,                  // 额外管理费率（%），默认 0
}

impl Default for LaborRates {
    fn default() -> Self {
        Self {
            minutes_per_mold: 50.0,
            hourly_rate: 85.0,
            rate_pair: None,
            basis: LaborBasis::Standard,
            overhead_pct: 0.0,
        }
    }
}

impl LaborRates {
    /// 按选定口径计算每模人工成本
    pub fn cost_per_mold(&self) -> EngineResult<f64> {
        match self.basis {
            LaborBasis::Standard => Ok((self.minutes_per_mold / 60.0) * self.hourly_rate),
            LaborBasis::BestCase => Ok(self.require_pair()?.best_per_mold),
            LaborBasis::WorstCase => Ok(self.require_pair()?.worst_per_mold),
        }
    }

    /// 每模工时（小时）
    pub fn hours_per_mold(&self) -> f64 {
        self.minutes_per_mold / 60.0
    }

    fn require_pair(&self) -> EngineResult<LaborRatePair> {
        self.rate_pair.ok_or_else(|| {
            EngineError::configuration(
                "labor.rate_pair",
                format!("计价口径 {} 需要最好/最坏每模成本，但未配置", self.basis),
            )
        })
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_non_negative("labor.minutes_per_mold", self.minutes_per_mold)?;
        ensure_non_negative("labor.hourly_rate", self.hourly_rate)?;
        ensure_non_negative("labor.overhead_pct", self.overhead_pct)?;
        if let Some(pair) = self.rate_pair {
            ensure_non_negative("labor.rate_pair.best_per_mold", pair.best_per_mold)?;
            ensure_non_negative("labor.rate_pair.worst_per_mold", pair.worst_per_mold)?;
        }
        if self.basis != LaborBasis::Standard {
            self.require_pair()?;
        }
        Ok(())
    }
}

// ==========================================
// PricingCurveConfig - 尺寸价格曲线
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingCurveConfig {
    pub reference_area_sqin: f64,   // 参考面积（6×6 = 36）
    pub reference_price: f64,       // 参考价格
    pub floor_price: f64,           // 最低价
    pub growth_factor: f64,         // 大尺寸增长系数
    pub rounding_increment: f64,    // 取整步长
    pub min_margin_multiplier: f64, // 成本底价倍数
}

impl Default for PricingCurveConfig {
    fn default() -> Self {
        Self {
            reference_area_sqin: 36.0,
            reference_price: 55.0,
            floor_price: 35.0,
            growth_factor: 0.22,
            rounding_increment: 5.0,
            min_margin_multiplier: 1.15,
        }
    }
}

impl PricingCurveConfig {
    pub fn validate(&self) -> EngineResult<()> {
        ensure_positive("curve.reference_area_sqin", self.reference_area_sqin)?;
        ensure_non_negative("curve.reference_price", self.reference_price)?;
        ensure_non_negative("curve.floor_price", self.floor_price)?;
        ensure_non_negative("curve.growth_factor", self.growth_factor)?;
        ensure_positive("curve.rounding_increment", self.rounding_increment)?;
        ensure_non_negative("curve.min_margin_multiplier", self.min_margin_multiplier)?;
        Ok(())
    }
}
