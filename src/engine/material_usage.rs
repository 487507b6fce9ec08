// ==========================================
// 标牌报价估算引擎 - 物料用量计算
// ==========================================
// 职责: 由模数折算大板用量与损耗率
// 口径: 损耗按订购数量计，多出库存视为资产而非损耗
//       视窗层在独立视窗板上排版，按整张计
// ==========================================

use crate::domain::rates::PressSheetConfig;
use crate::domain::results::{BatchResult, MaterialUsage};
use crate::domain::sign::SignSpec;
use crate::engine::batch_optimizer::{ceil_div, BatchOptimizer};
use crate::engine::error::EngineResult;
use tracing::{debug, instrument};

// ==========================================
// MaterialUsageCalculator - 物料用量计算器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialUsageCalculator {
    // 无状态引擎
}

impl MaterialUsageCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算大板用量与损耗率
    ///
    /// - sheets_needed = molds_needed / molds_per_master_sheet（按小数计费，不向上取整）
    /// - total_sheet_area = sheets_needed × 大板面积
    /// - total_sign_area = quantity × 单块面积
    /// - waste_percent = (板面积 − 成品面积) / 板面积 × 100，截断到 [0, 100]
    /// - base_waste_percent 同上，成品面积扣除视窗开口
    /// - 视窗: 宽 × 视窗高 在视窗板上按两种朝向排布，window_sheets = ⌈quantity / 每板视窗数⌉
    #[instrument(skip_all, fields(molds_needed = batch.molds_needed, quantity = batch.quantity))]
    pub fn usage(
        &self,
        batch: &BatchResult,
        spec: &SignSpec,
        press: &PressSheetConfig,
    ) -> EngineResult<MaterialUsage> {
        spec.validate()?;
        press.validate()?;

        let sheets_needed = batch.molds_needed as f64 / f64::from(press.molds_per_master_sheet);
        let total_sheet_area_sqin = sheets_needed * press.master_area_sqin();
        let total_sign_area_sqin = batch.quantity as f64 * spec.area_sqin();
        let overall_waste = waste_percent(total_sheet_area_sqin, total_sign_area_sqin);

        let window_area = spec.window_area_sqin();
        let base_area = (spec.area_sqin() - window_area).max(0.0);
        let base_waste_percent =
            waste_percent(total_sheet_area_sqin, batch.quantity as f64 * base_area);

        let (windows_per_sheet, window_sheets_needed) = match spec.window_height() {
            Some(window_h) => {
                let per_sheet = BatchOptimizer::signs_per_mold(
                    spec.width_in,
                    window_h,
                    press.window_sheet_width_in,
                    press.window_sheet_height_in,
                );
                (per_sheet, ceil_div(batch.quantity, per_sheet))
            }
            None => (0, 0),
        };
        let total_window_area_sqin = batch.quantity as f64 * window_area;
        let window_waste_percent = waste_percent(
            window_sheets_needed as f64 * press.window_sheet_area_sqin(),
            total_window_area_sqin,
        );

        debug!(
            sheets_needed,
            waste_percent = overall_waste,
            window_sheets_needed,
            window_waste_percent,
            "物料用量计算完成"
        );

        Ok(MaterialUsage {
            sheets_needed,
            total_sheet_area_sqin,
            total_sign_area_sqin,
            waste_percent: overall_waste,
            base_waste_percent,
            window_layer: spec.windowed,
            windows_per_sheet,
            window_sheets_needed,
            total_window_area_sqin,
            window_waste_percent,
        })
    }
}

/// 损耗率（%），板面积为 0 时记 0
pub fn waste_percent(total_sheet_area: f64, total_sign_area: f64) -> f64 {
    if total_sheet_area <= 0.0 {
        return 0.0;
    }
    let pct = (total_sheet_area - total_sign_area) / total_sheet_area * 100.0;
    pct.clamp(0.0, 100.0)
}
