// ==========================================
// 标牌报价估算引擎 - 报价 API
// ==========================================
// 职责: 解析参数方案 → 导入清单 → 批量计算 → 报价单汇总
// 红线: 参数方案显式传入引擎，引擎不读取配置存储
// ==========================================

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::catalog_trait::PricingCatalog;
use crate::config::pricing_profile::PricingProfile;
use crate::domain::estimate::{EstimateFees, EstimateLine, EstimateTotals, LineEconomics};
use crate::domain::results::FullComputation;
use crate::domain::sign::SignSpec;
use crate::engine::batch_pricer::{BatchPricer, BatchPricingReport};
use crate::engine::estimate_rollup::EstimateRollup;
use crate::i18n::t_with_args;
use crate::importer::schedule_importer::{ImportViolation, ScheduleImporter};

// ==========================================
// LineQuote - 单行报价
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct LineQuote {
    pub profile_id: String,
    pub dimensions: String,
    pub computation: FullComputation,
    pub economics: LineEconomics,
    pub basis_label: String,
    pub labor_basis_label: String,
}

// ==========================================
// ScheduleQuote - 整单报价
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleQuote {
    // ===== 来源 =====
    pub source: Option<String>,
    pub profile_id: String,
    pub profile_title: String,
    pub quoted_at: DateTime<Utc>,

    // ===== 结果 =====
    pub report: BatchPricingReport,
    pub totals: EstimateTotals,
    pub import_violations: Vec<ImportViolation>,

    /// 可读摘要（按当前语言）
    pub summary: String,
}

// ==========================================
// PricingApi - 报价 API
// ==========================================
pub struct PricingApi<C: PricingCatalog> {
    catalog: Arc<C>,
    importer: ScheduleImporter,
    batch_pricer: BatchPricer,
    rollup: EstimateRollup,
}

impl<C: PricingCatalog> PricingApi<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            importer: ScheduleImporter::new(),
            batch_pricer: BatchPricer::new(),
            rollup: EstimateRollup::new(),
        }
    }

    async fn resolve_profile(&self, profile_id: Option<&str>) -> ApiResult<PricingProfile> {
        let profile = self.catalog.resolve_profile(profile_id).await?;
        profile.validate()?;
        Ok(profile)
    }

    /// 单个标牌规格报价
    #[instrument(skip(self, spec))]
    pub async fn quote_line(&self, spec: SignSpec, profile_id: Option<&str>) -> ApiResult<LineQuote> {
        let profile = self.resolve_profile(profile_id).await?;
        let computation = profile.compute(&spec)?;
        let economics = LineEconomics::from_computation(&computation, &profile.labor);

        Ok(LineQuote {
            profile_id: profile.profile_id,
            dimensions: spec.dimensions_display(),
            basis_label: computation.price.basis.label(),
            labor_basis_label: profile.labor.basis.label(),
            computation,
            economics,
        })
    }

    /// 多行报价并汇总
    #[instrument(skip(self, lines, fees), fields(line_count = lines.len()))]
    pub async fn quote_lines(
        &self,
        lines: Vec<EstimateLine>,
        profile_id: Option<&str>,
        fees: &EstimateFees,
    ) -> ApiResult<ScheduleQuote> {
        self.quote(None, lines, Vec::new(), profile_id, fees).await
    }

    /// 导入标牌清单文件并报价
    #[instrument(skip(self, file_path, fees), fields(path = %file_path.as_ref().display()))]
    pub async fn quote_schedule_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        profile_id: Option<&str>,
        fees: &EstimateFees,
    ) -> ApiResult<ScheduleQuote> {
        let import = self.importer.import_file(file_path.as_ref())?;
        if import.lines.is_empty() && import.total_rows > 0 {
            return Err(ApiError::InvalidInput(format!(
                "清单 {} 共 {} 行，均无法解析",
                import.source, import.total_rows
            )));
        }

        self.quote(
            Some(import.source),
            import.lines,
            import.violations,
            profile_id,
            fees,
        )
        .await
    }

    async fn quote(
        &self,
        source: Option<String>,
        lines: Vec<EstimateLine>,
        import_violations: Vec<ImportViolation>,
        profile_id: Option<&str>,
        fees: &EstimateFees,
    ) -> ApiResult<ScheduleQuote> {
        let profile = Arc::new(self.resolve_profile(profile_id).await?);

        let report = self
            .batch_pricer
            .price_all(lines, Arc::clone(&profile))
            .await?;
        let totals = self.rollup.rollup(&report.rollup_input(), fees)?;

        let summary = t_with_args(
            "report.summary",
            &[
                ("priced", &report.success_count.to_string()),
                ("failed", &report.failure_count.to_string()),
                ("total", &format!("{:.2}", totals.total)),
            ],
        );
        info!(run_id = %report.run_id, total = totals.total, "报价单生成完成");

        Ok(ScheduleQuote {
            source,
            profile_id: profile.profile_id.clone(),
            profile_title: profile.title.clone(),
            quoted_at: Utc::now(),
            report,
            totals,
            import_violations,
            summary,
        })
    }
}
