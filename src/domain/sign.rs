// ==========================================
// 标牌报价估算引擎 - 标牌规格领域模型
// ==========================================
// 用途: 所有计算的不可变输入
// 单位: 英寸 (in) / 平方英寸 (sq in)
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ==========================================
// SignSpec - 标牌规格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignSpec {
    pub width_in: f64,                // 宽 (in)
    pub height_in: f64,               // 高 (in)
    pub quantity: i64,                // 订购数量
    #[serde(default)]
    pub diameter_in: Option<f64>,     // 圆形标牌直径 (in)
    #[serde(default)]
    pub windowed: bool,               // 是否带视窗/镜片层
    #[serde(default)]
    pub window_height_in: Option<f64>, // 视窗高 (in)，缺省为整块高度
}

impl SignSpec {
    /// 矩形标牌
    pub fn new(width_in: f64, height_in: f64, quantity: i64) -> Self {
        Self {
            width_in,
            height_in,
            quantity,
            diameter_in: None,
            windowed: false,
            window_height_in: None,
        }
    }

    /// 圆形标牌（外接正方形作为排版尺寸）
    pub fn round(diameter_in: f64, quantity: i64) -> Self {
        Self {
            width_in: diameter_in,
            height_in: diameter_in,
            quantity,
            diameter_in: Some(diameter_in),
            windowed: false,
            window_height_in: None,
        }
    }

    pub fn with_window(mut self, windowed: bool) -> Self {
        self.windowed = windowed;
        self
    }

    /// 带视窗，并指定视窗高度
    pub fn with_window_height(mut self, window_height_in: f64) -> Self {
        self.windowed = true;
        self.window_height_in = Some(window_height_in);
        self
    }

    /// 校验规格
    ///
    /// 顺序: 宽 → 高 → 直径 → 数量，返回首个失败项
    pub fn validate(&self) -> EngineResult<()> {
        check_dimension("width_in", self.width_in)?;
        check_dimension("height_in", self.height_in)?;
        if let Some(d) = self.diameter_in {
            check_dimension("diameter_in", d)?;
        }
        if let Some(wh) = self.window_height_in {
            check_dimension("window_height_in", wh)?;
            if wh > self.height_in {
                return Err(EngineError::invalid_dimension("window_height_in", wh));
            }
        }
        if self.quantity <= 0 {
            return Err(EngineError::InvalidQuantity(self.quantity));
        }
        Ok(())
    }

    pub fn is_round(&self) -> bool {
        self.diameter_in.is_some()
    }

    /// 单块标牌面积（圆形按 π·r²）
    pub fn area_sqin(&self) -> f64 {
        match self.diameter_in {
            Some(d) => PI * (d / 2.0).powi(2),
            None => self.width_in * self.height_in,
        }
    }

    /// 尺寸显示文本: `6" x 8"` 或 `Ø 12"`
    /// 视窗高度（不带视窗时为 None）
    pub fn window_height(&self) -> Option<f64> {
        if !self.windowed {
            return None;
        }
        Some(self.window_height_in.unwrap_or(self.height_in))
    }

    /// 单块视窗面积 = 宽 × 视窗高
    pub fn window_area_sqin(&self) -> f64 {
        self.window_height().map_or(0.0, |wh| self.width_in * wh)
    }

    pub fn dimensions_display(&self) -> String {
        match self.diameter_in {
            Some(d) => format!("Ø {}\"", trim_inches(d)),
            None => format!(
                "{}\" x {}\"",
                trim_inches(self.width_in),
                trim_inches(self.height_in)
            ),
        }
    }
}

fn check_dimension(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::invalid_dimension(field, value));
    }
    Ok(())
}

// 整数英寸去掉小数点
fn trim_inches(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
