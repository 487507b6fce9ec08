// ==========================================
// 标牌报价估算引擎 - 批次优化引擎
// ==========================================
// 职责: 计算每模可排块数与所需模数
// 输入: SignSpec + PressSheetConfig
// 输出: BatchResult
// 红线: 只比较两种轴对齐排布（原向/旋转 90°），不做模内混排
// ==========================================

use crate::domain::rates::PressSheetConfig;
use crate::domain::results::BatchResult;
use crate::domain::sign::SignSpec;
use crate::engine::error::EngineResult;
use tracing::{debug, instrument};

// ==========================================
// BatchOptimizer - 批次优化引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchOptimizer {
    // 无状态引擎
}

impl BatchOptimizer {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算批次排布
    ///
    /// 规则:
    /// 1) c1 = ⌊压板宽/标牌宽⌋ × ⌊压板高/标牌高⌋
    /// 2) c2 = ⌊压板宽/标牌高⌋ × ⌊压板高/标牌宽⌋（旋转 90°）
    /// 3) signs_per_mold = max(c1, c2, 1)，超出压板时按每模 1 块
    /// 4) molds_needed = ⌈quantity / signs_per_mold⌉
    ///
    /// # 错误
    /// - `InvalidDimension`: 宽/高 ≤ 0
    /// - `InvalidQuantity`: 数量 ≤ 0
    /// - `ConfigurationError`: 压板几何非法
    #[instrument(skip(self, spec, press), fields(
        width_in = spec.width_in,
        height_in = spec.height_in,
        quantity = spec.quantity
    ))]
    pub fn optimize(&self, spec: &SignSpec, press: &PressSheetConfig) -> EngineResult<BatchResult> {
        spec.validate()?;
        press.validate()?;

        let signs_per_mold = Self::signs_per_mold(
            spec.width_in,
            spec.height_in,
            press.width_in,
            press.height_in,
        );

        // validate 已保证 quantity ≥ 1
        let quantity = spec.quantity as u64;
        let molds_needed = ceil_div(quantity, signs_per_mold);
        let signs_produced = molds_needed.saturating_mul(signs_per_mold);
        let surplus_stock = signs_produced - quantity;

        debug!(
            signs_per_mold,
            molds_needed,
            signs_produced,
            surplus_stock,
            "批次排布完成"
        );

        Ok(BatchResult {
            quantity,
            signs_per_mold,
            molds_needed,
            signs_produced,
            surplus_stock,
        })
    }

    /// 单张压板可排块数（两种轴对齐排布取大，至少 1）
    pub fn signs_per_mold(sign_w: f64, sign_h: f64, press_w: f64, press_h: f64) -> u64 {
        let upright = fit_count(press_w, sign_w).saturating_mul(fit_count(press_h, sign_h));
        let rotated = fit_count(press_w, sign_h).saturating_mul(fit_count(press_h, sign_w));
        upright.max(rotated).max(1)
    }
}

// 沿一个方向可排的整块数
fn fit_count(press_len: f64, sign_len: f64) -> u64 {
    let n = (press_len / sign_len).floor();
    if n.is_finite() && n > 0.0 {
        n as u64
    } else {
        0
    }
}

pub(crate) fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    numerator / denominator + u64::from(numerator % denominator != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::EngineError;

    #[test]
    fn test_six_by_six_fifty() {
        let optimizer = BatchOptimizer::new();
        let batch = optimizer
            .optimize(&SignSpec::new(6.0, 6.0, 50), &PressSheetConfig::default())
            .unwrap();

        assert_eq!(batch.signs_per_mold, 6);
        assert_eq!(batch.molds_needed, 9);
        assert_eq!(batch.signs_produced, 54);
        assert_eq!(batch.surplus_stock, 4);
        assert_eq!(batch.quantity, 50);
    }

    #[test]
    fn test_best_orientation() {
        // 原向: ⌊13/4⌋×⌊19/9⌋ = 3×2 = 6；旋转: ⌊13/9⌋×⌊19/4⌋ = 1×4 = 4
        assert_eq!(BatchOptimizer::signs_per_mold(4.0, 9.0, 13.0, 19.0), 6);
        // 原向: ⌊13/9.5⌋×⌊19/6⌋ = 1×3 = 3；旋转: ⌊13/6⌋×⌊19/9.5⌋ = 2×2 = 4
        assert_eq!(BatchOptimizer::signs_per_mold(9.5, 6.0, 13.0, 19.0), 4);
    }

    #[test]
    fn test_oversized_sign_one_per_mold() {
        let batch = BatchOptimizer::new()
            .optimize(&SignSpec::new(24.0, 36.0, 3), &PressSheetConfig::default())
            .unwrap();
        assert_eq!(batch.signs_per_mold, 1);
        assert_eq!(batch.molds_needed, 3);
        assert_eq!(batch.surplus_stock, 0);
    }

    #[test]
    fn test_exact_fill_no_surplus() {
        let batch = BatchOptimizer::new()
            .optimize(&SignSpec::new(6.0, 6.0, 12), &PressSheetConfig::default())
            .unwrap();
        assert_eq!(batch.molds_needed, 2);
        assert_eq!(batch.surplus_stock, 0);
    }

    #[test]
    fn test_invalid_inputs() {
        let optimizer = BatchOptimizer::new();
        let press = PressSheetConfig::default();

        assert!(matches!(
            optimizer.optimize(&SignSpec::new(-1.0, 6.0, 5), &press),
            Err(EngineError::InvalidDimension { .. })
        ));
        assert_eq!(
            optimizer.optimize(&SignSpec::new(6.0, 6.0, 0), &press),
            Err(EngineError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_produced_invariants_over_grid() {
        let optimizer = BatchOptimizer::new();
        let press = PressSheetConfig::default();
        for w in [0.5, 1.0, 2.75, 6.0, 8.0, 12.5, 20.0] {
            for h in [0.75, 3.0, 6.0, 9.0, 19.5] {
                for q in [1, 2, 7, 50, 333] {
                    let b = optimizer.optimize(&SignSpec::new(w, h, q), &press).unwrap();
                    assert!(b.signs_per_mold >= 1);
                    assert!(b.signs_produced >= b.quantity);
                    assert_eq!(b.signs_produced % b.signs_per_mold, 0);
                    assert!(b.surplus_stock < b.signs_per_mold);
                }
            }
        }
    }
}
