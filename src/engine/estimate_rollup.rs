// ==========================================
// 标牌报价估算引擎 - 报价单汇总引擎
// ==========================================
// 职责: 报价行 + 安装/差旅/设备费用 → 报价单合计
// 口径: 客户总价 = 小计（不再额外加价）；车间人工只跟踪不计入
// ==========================================

use crate::domain::estimate::{EstimateFees, EstimateTotals, LineEconomics};
use crate::domain::results::FullComputation;
use crate::engine::error::EngineResult;
use tracing::{info, instrument};

// ==========================================
// EstimateRollup - 报价单汇总引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct EstimateRollup {
    // 无状态引擎
}

impl EstimateRollup {
    pub fn new() -> Self {
        Self {}
    }

    /// 汇总报价单
    ///
    /// # 参数
    /// - `lines`: 已成功计算的报价行（计算结果 + 行级指标）
    /// - `fees`: 报价单级费用
    #[instrument(skip_all, fields(line_count = lines.len()))]
    pub fn rollup(
        &self,
        lines: &[(FullComputation, LineEconomics)],
        fees: &EstimateFees,
    ) -> EngineResult<EstimateTotals> {
        fees.validate()?;

        let signage_total: f64 = lines.iter().map(|(_, econ)| econ.line_total).sum();
        let total_molds: u64 = lines.iter().map(|(r, _)| r.batch.molds_needed).sum();
        let profit_amount: f64 = lines
            .iter()
            .map(|(r, _)| r.batch.quantity as f64 * (r.price.unit_price - r.cost.total_unit_cost))
            .sum();

        let shop_labor_total =
            (total_molds as f64 * fees.mold_time_minutes / 60.0) * fees.shop_rate;
        let install_total = fees.install_hours * fees.install_rate;
        // 往返 × 趟数
        let travel_total = fees.travel_miles * fees.travel_rate * 2.0 * f64::from(fees.travel_trips);
        let equipment_total = fees
            .equipment
            .as_ref()
            .map(|eq| eq.days * eq.daily_rate + eq.delivery)
            .unwrap_or(0.0);

        let subtotal = signage_total + install_total + travel_total + equipment_total;
        let total = subtotal;
        let profit_margin_pct = if total > 0.0 {
            profit_amount / total * 100.0
        } else {
            0.0
        };

        info!(signage_total, subtotal, total, profit_amount, "报价单汇总完成");

        Ok(EstimateTotals {
            line_count: lines.len(),
            total_molds,
            signage_total,
            shop_labor_total,
            install_total,
            travel_total,
            equipment_total,
            subtotal,
            total,
            profit_amount,
            profit_margin_pct,
        })
    }
}
