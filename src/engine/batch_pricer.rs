// ==========================================
// 标牌报价估算引擎 - 批量重算引擎
// ==========================================
// 职责: 对整张报价单的所有行并发重算
// 模型: 行间无依赖，每行一个阻塞任务，join_all 保序汇总
// 红线: 单行失败只记录在该行，不中断其它行
// ==========================================

use crate::config::pricing_profile::PricingProfile;
use crate::domain::estimate::{EstimateLine, LineEconomics};
use crate::domain::results::FullComputation;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 成功计算的报价行
#[derive(Debug, Clone, Serialize)]
pub struct PricedLine {
    pub line_no: usize,
    pub sign_type: String,
    pub description: Option<String>,
    pub dimensions: String,
    pub computation: FullComputation,
    pub economics: LineEconomics,
}

/// 计算失败的报价行
#[derive(Debug, Clone, Serialize)]
pub struct LineFailure {
    pub line_no: usize,
    pub sign_type: String,
    pub error_code: String,
    pub message: String,
    #[serde(skip)]
    pub error: EngineError,
}

/// 批量重算报告
#[derive(Debug, Clone, Serialize)]
pub struct BatchPricingReport {
    pub run_id: Uuid,
    pub priced_at: DateTime<Utc>,
    pub profile_id: String,
    pub lines: Vec<PricedLine>,
    pub failures: Vec<LineFailure>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl BatchPricingReport {
    /// 供报价单汇总使用的 (计算结果, 行级指标) 列表
    pub fn rollup_input(&self) -> Vec<(FullComputation, LineEconomics)> {
        self.lines
            .iter()
            .map(|l| (l.computation, l.economics))
            .collect()
    }
}

// ==========================================
// BatchPricer - 批量重算引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchPricer {
    // 无状态引擎
}

impl BatchPricer {
    pub fn new() -> Self {
        Self {}
    }

    /// 并发重算全部报价行
    ///
    /// # 返回
    /// - Ok(report): 每行或成功或失败，行号从 1 开始，保持输入顺序
    /// - Err: 参数方案本身非法（此时任何行都无法计算）
    #[instrument(skip_all, fields(profile_id = %profile.profile_id, line_count = lines.len()))]
    pub async fn price_all(
        &self,
        lines: Vec<EstimateLine>,
        profile: Arc<PricingProfile>,
    ) -> EngineResult<BatchPricingReport> {
        profile.validate()?;

        let run_id = Uuid::new_v4();
        info!(%run_id, "开始批量重算");

        let tasks = lines.into_iter().enumerate().map(|(idx, line)| {
            let profile = Arc::clone(&profile);
            async move {
                let line_no = idx + 1;
                let spec = line.spec.clone();
                let handle = tokio::task::spawn_blocking(move || profile.compute(&spec));
                let outcome = match handle.await {
                    Ok(result) => result,
                    Err(join_err) => {
                        error!(line_no, error = %join_err, "报价行计算任务异常退出");
                        Err(EngineError::Internal(format!(
                            "行 {} 计算任务异常退出: {}",
                            line_no, join_err
                        )))
                    }
                };
                (line_no, line, outcome)
            }
        });

        let results = join_all(tasks).await;

        let mut priced = Vec::new();
        let mut failures = Vec::new();
        for (line_no, line, outcome) in results {
            match outcome {
                Ok(computation) => {
                    let economics = LineEconomics::from_computation(&computation, &profile.labor);
                    priced.push(PricedLine {
                        line_no,
                        dimensions: line.spec.dimensions_display(),
                        sign_type: line.sign_type,
                        description: line.description,
                        computation,
                        economics,
                    });
                }
                Err(err) => {
                    warn!(line_no, sign_type = %line.sign_type, error = %err, "报价行计算失败");
                    failures.push(LineFailure {
                        line_no,
                        sign_type: line.sign_type,
                        error_code: err.code().to_string(),
                        message: err.to_string(),
                        error: err,
                    });
                }
            }
        }

        info!(
            %run_id,
            success = priced.len(),
            failed = failures.len(),
            "批量重算完成"
        );

        Ok(BatchPricingReport {
            run_id,
            priced_at: Utc::now(),
            profile_id: profile.profile_id.clone(),
            success_count: priced.len(),
            failure_count: failures.len(),
            lines: priced,
            failures,
        })
    }
}
