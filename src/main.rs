// ==========================================
// 标牌报价估算引擎 - 命令行入口
// ==========================================
// 用法:
//   sign-estimating <清单.csv|xlsx> [参数目录.db] [方案ID] [费用.json]
// 输出: 整单报价（JSON，stdout）；日志输出到 stderr
// 环境变量:
//   RUST_LOG                 日志级别（默认 info）
//   LOG_FORMAT=json          JSON 日志
//   SIGN_ESTIMATING_LOCALE   摘要语言（zh-CN / en）
//   SIGN_ESTIMATING_DB_PATH  默认参数目录路径
// ==========================================

use std::sync::Arc;

use anyhow::{bail, Context};
use sign_estimating::api::PricingApi;
use sign_estimating::config::ConfigManager;
use sign_estimating::db::get_default_db_path;
use sign_estimating::domain::EstimateFees;
use sign_estimating::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        logging::init_json();
    } else {
        logging::init();
    }

    if let Ok(locale) = std::env::var("SIGN_ESTIMATING_LOCALE") {
        i18n::set_locale(locale.trim());
    }

    let mut args = std::env::args().skip(1);
    let schedule_path = match args.next() {
        Some(p) => p,
        None => bail!(i18n::t("cli.usage")),
    };
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);
    let profile_id = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let fees = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("读取费用文件失败: {}", path))?;
            serde_json::from_str::<EstimateFees>(&raw)
                .with_context(|| format!("费用文件格式错误: {}", path))?
        }
        None => EstimateFees::default(),
    };

    tracing::info!("==================================================");
    tracing::info!("{} v{}", sign_estimating::APP_NAME, sign_estimating::VERSION);
    tracing::info!("参数目录: {}", db_path);
    tracing::info!("==================================================");

    let catalog = ConfigManager::new(&db_path)
        .with_context(|| format!("无法打开参数目录: {}", db_path))?;
    let api = PricingApi::new(Arc::new(catalog));

    let quote = api
        .quote_schedule_file(&schedule_path, profile_id.as_deref(), &fees)
        .await
        .with_context(|| format!("报价失败: {}", schedule_path))?;

    tracing::info!("{}", quote.summary);
    println!("{}", serde_json::to_string_pretty(&quote)?);

    Ok(())
}
