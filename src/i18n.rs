// ==========================================
// 标牌报价估算引擎 - 国际化
// ==========================================
// 语言文件: locales/zh-CN.yml（默认）, locales/en.yml
// 用途: 定价依据/人工口径标签、报价摘要、命令行用法
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 切换语言（"zh-CN" / "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息并替换 `%{name}` 占位符
///
/// ```no_run
/// use sign_estimating::i18n::t_with_args;
/// let msg = t_with_args("report.summary", &[("priced", "3"), ("failed", "0"), ("total", "165.00")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t(key);
    for (k, v) in args {
        result = result.replace(&format!("%{{{}}}", k), v);
    }
    result
}
