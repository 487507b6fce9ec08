// ==========================================
// 标牌报价估算引擎 - 成本汇总引擎
// ==========================================
// 职责: 板材 + 耗材 + 人工 → 单位成本
// 口径: 默认耗材按实际产出块数计（含库存），单位成本按产出块数分摊
//       CostAllocation::Ordered 时两者均按订购数量
// ==========================================

use crate::domain::rates::{LaborRates, MaterialRates, PressSheetConfig};
use crate::domain::results::{BatchResult, CostResult, MaterialUsage};
use crate::domain::types::CostAllocation;
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, instrument};

// ==========================================
// CostAggregator - 成本汇总引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CostAggregator {
    // 按面积计价的板材层需要折算到整张
    master_area_sqin: f64,
    window_sheet_area_sqin: f64,
}

impl CostAggregator {
    pub fn new(press: &PressSheetConfig) -> Self {
        Self {
            master_area_sqin: press.master_area_sqin(),
            window_sheet_area_sqin: press.window_sheet_area_sqin(),
        }
    }

    /// 汇总单位成本
    ///
    /// - 板材 = sheets_needed × (面板 + 基材) + window_sheets_needed × 视窗板价格
    /// - 计件数 = signs_produced（Produced，为 0 时退回 quantity）或 quantity（Ordered）
    /// - 耗材 = 计件数 × Σ 每块耗材 + molds_needed × Σ 每模耗材
    /// - divisor = 计件数
    /// - 人工 = molds_needed × 每模人工成本
    /// - 总单位成本 = 材料 + 人工 (+ 管理费，默认 0)
    ///
    /// # 错误
    /// - `DivisionByZero`: quantity 为 0（单位成本无定义）
    /// - `ConfigurationError`: 费率非法或缺失
    #[instrument(skip_all, fields(
        molds_needed = batch.molds_needed,
        signs_produced = batch.signs_produced,
        labor_basis = %labor.basis,
        allocation = %rates.allocation
    ))]
    pub fn cost(
        &self,
        batch: &BatchResult,
        usage: &MaterialUsage,
        rates: &MaterialRates,
        labor: &LaborRates,
    ) -> EngineResult<CostResult> {
        if batch.quantity == 0 {
            return Err(EngineError::DivisionByZero(
                "quantity = 0，单位成本无定义".to_string(),
            ));
        }
        rates.validate()?;
        labor.validate()?;

        let allocated_signs = match rates.allocation {
            CostAllocation::Produced if batch.signs_produced > 0 => batch.signs_produced,
            _ => batch.quantity,
        };
        let divisor = allocated_signs as f64;

        // 1. 板材
        let sheet_material_cost = usage.sheets_needed * rates.sheet_rate_sum(self.master_area_sqin)
            + usage.window_sheets_needed as f64 * rates.window_sheet_rate(self.window_sheet_area_sqin);

        // 2. 耗材
        let consumable_cost = allocated_signs as f64 * rates.per_sign_sum()
            + batch.molds_needed as f64 * rates.per_mold_sum();

        // 3. 人工
        let labor_cost = batch.molds_needed as f64 * labor.cost_per_mold()?;

        let material_unit_cost = (sheet_material_cost + consumable_cost) / divisor;
        let labor_unit_cost = labor_cost / divisor;
        let overhead_unit_cost = (material_unit_cost + labor_unit_cost) * (labor.overhead_pct / 100.0);
        let total_unit_cost = (material_unit_cost + labor_unit_cost + overhead_unit_cost).max(0.0);

        debug!(
            material_unit_cost,
            labor_unit_cost,
            overhead_unit_cost,
            total_unit_cost,
            "成本汇总完成"
        );

        Ok(CostResult {
            material_unit_cost,
            labor_unit_cost,
            overhead_unit_cost,
            total_unit_cost,
            waste_percent: usage.waste_percent,
            sheet_material_cost,
            consumable_cost,
            labor_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rates::{LaborRatePair, LayerRate};
    use crate::domain::sign::SignSpec;
    use crate::domain::types::LaborBasis;
    use crate::engine::batch_optimizer::BatchOptimizer;
    use crate::engine::material_usage::MaterialUsageCalculator;

    fn prepare(spec: &SignSpec) -> (BatchResult, MaterialUsage) {
        let press = PressSheetConfig::default();
        let batch = BatchOptimizer::new().optimize(spec, &press).unwrap();
        let usage = MaterialUsageCalculator::new().usage(&batch, spec, &press).unwrap();
        (batch, usage)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_rates_six_by_six() {
        let (batch, usage) = prepare(&SignSpec::new(6.0, 6.0, 50));
        let aggregator = CostAggregator::new(&PressSheetConfig::default());
        let cost = aggregator
            .cost(&batch, &usage, &MaterialRates::default(), &LaborRates::default())
            .unwrap();

        let sheet = 9.0 / 17.0 * (211.30 + 80.0);
        let consumables = 54.0 * (0.33 + 0.60) + 9.0 * (0.25 + 0.50);
        let labor = 9.0 * (50.0 / 60.0) * 85.0;

        assert!(approx(cost.sheet_material_cost, sheet));
        assert!(approx(cost.consumable_cost, consumables));
        assert!(approx(cost.labor_cost, labor));
        assert!(approx(cost.material_unit_cost, (sheet + consumables) / 54.0));
        assert!(approx(cost.labor_unit_cost, labor / 54.0));
        assert_eq!(cost.overhead_unit_cost, 0.0);
        assert!(approx(
            cost.total_unit_cost,
            cost.material_unit_cost + cost.labor_unit_cost
        ));
        assert_eq!(cost.waste_percent, usage.waste_percent);
    }

    #[test]
    fn test_window_layer_adds_whole_window_sheets() {
        let aggregator = CostAggregator::new(&PressSheetConfig::default());
        let (batch, plain) = prepare(&SignSpec::new(6.0, 6.0, 50));
        // 6×6 整高视窗: 32 个/板 → 2 张
        let (_, windowed) = prepare(&SignSpec::new(6.0, 6.0, 50).with_window(true));
        // 6×1.5 视窗条: 4×32 = 128 个/板 → 1 张
        let (_, strip) = prepare(&SignSpec::new(6.0, 6.0, 50).with_window_height(1.5));

        let rates = MaterialRates::default();
        let labor = LaborRates::default();
        let a = aggregator.cost(&batch, &plain, &rates, &labor).unwrap();
        let b = aggregator.cost(&batch, &windowed, &rates, &labor).unwrap();
        let c = aggregator.cost(&batch, &strip, &rates, &labor).unwrap();

        assert!(approx(b.sheet_material_cost - a.sheet_material_cost, 2.0 * 75.0));
        assert!(approx(c.sheet_material_cost - a.sheet_material_cost, 75.0));
    }

    #[test]
    fn test_ordered_allocation() {
        let aggregator = CostAggregator::new(&PressSheetConfig::default());
        let (batch, usage) = prepare(&SignSpec::new(6.0, 6.0, 50));
        let rates = MaterialRates {
            allocation: CostAllocation::Ordered,
            ..MaterialRates::default()
        };
        let cost = aggregator
            .cost(&batch, &usage, &rates, &LaborRates::default())
            .unwrap();

        let sheet = 9.0 / 17.0 * (211.30 + 80.0);
        let consumables = 50.0 * (0.33 + 0.60) + 9.0 * (0.25 + 0.50);
        let labor = 9.0 * (50.0 / 60.0) * 85.0;
        assert!(approx(cost.consumable_cost, consumables));
        assert!(approx(cost.material_unit_cost, (sheet + consumables) / 50.0));
        assert!(approx(cost.labor_unit_cost, labor / 50.0));
    }

    #[test]
    fn test_per_area_layer_rate() {
        let press = PressSheetConfig::default();
        let aggregator = CostAggregator::new(&press);
        let (batch, usage) = prepare(&SignSpec::new(6.0, 6.0, 17 * 6));
        let rates = MaterialRates {
            base_sheet: LayerRate::PerSquareInch(0.05),
            substrate: LayerRate::PerSheet(0.0),
            ..MaterialRates::default()
        };
        let cost = aggregator
            .cost(&batch, &usage, &rates, &LaborRates::default())
            .unwrap();
        // 17 模 = 1 张大板
        assert!(approx(cost.sheet_material_cost, 0.05 * 4753.0));
    }

    #[test]
    fn test_worst_case_labor_pair() {
        let aggregator = CostAggregator::new(&PressSheetConfig::default());
        let (batch, usage) = prepare(&SignSpec::new(6.0, 6.0, 50));
        let labor = LaborRates {
            rate_pair: Some(LaborRatePair::default()),
            basis: LaborBasis::WorstCase,
            ..LaborRates::default()
        };
        let cost = aggregator
            .cost(&batch, &usage, &MaterialRates::default(), &labor)
            .unwrap();
        assert!(approx(cost.labor_cost, 900.0));
        assert!(approx(cost.labor_unit_cost, 900.0 / 54.0));
    }

    #[test]
    fn test_overhead_pct() {
        let aggregator = CostAggregator::new(&PressSheetConfig::default());
        let (batch, usage) = prepare(&SignSpec::new(6.0, 6.0, 50));
        let labor = LaborRates {
            overhead_pct: 15.0,
            ..LaborRates::default()
        };
        let cost = aggregator
            .cost(&batch, &usage, &MaterialRates::default(), &labor)
            .unwrap();
        let base = cost.material_unit_cost + cost.labor_unit_cost;
        assert!(approx(cost.overhead_unit_cost, base * 0.15));
        assert!(approx(cost.total_unit_cost, base * 1.15));
    }

    #[test]
    fn test_zero_quantity_division_by_zero() {
        let aggregator = CostAggregator::new(&PressSheetConfig::default());
        let batch = BatchResult {
            quantity: 0,
            signs_per_mold: 6,
            molds_needed: 0,
            signs_produced: 0,
            surplus_stock: 0,
        };
        let usage = MaterialUsage {
            sheets_needed: 0.0,
            total_sheet_area_sqin: 0.0,
            total_sign_area_sqin: 0.0,
            waste_percent: 0.0,
            base_waste_percent: 0.0,
            window_layer: false,
            windows_per_sheet: 0,
            window_sheets_needed: 0,
            total_window_area_sqin: 0.0,
            window_waste_percent: 0.0,
        };
        let result = aggregator.cost(&batch, &usage, &MaterialRates::default(), &LaborRates::default());
        assert!(matches!(result, Err(EngineError::DivisionByZero(_))));
    }

    #[test]
    fn test_divisor_falls_back_to_quantity() {
        let aggregator = CostAggregator::new(&PressSheetConfig::default());
        let batch = BatchResult {
            quantity: 4,
            signs_per_mold: 1,
            molds_needed: 4,
            signs_produced: 0,
            surplus_stock: 0,
        };
        let usage = MaterialUsage {
            sheets_needed: 4.0 / 17.0,
            total_sheet_area_sqin: 0.0,
            total_sign_area_sqin: 0.0,
            waste_percent: 0.0,
            base_waste_percent: 0.0,
            window_layer: false,
            windows_per_sheet: 0,
            window_sheets_needed: 0,
            total_window_area_sqin: 0.0,
            window_waste_percent: 0.0,
        };
        let cost = aggregator
            .cost(&batch, &usage, &MaterialRates::default(), &LaborRates::default())
            .unwrap();
        assert!(approx(cost.labor_unit_cost, cost.labor_cost / 4.0));
    }
}
