// ==========================================
// 国际化 (i18n)
// ==========================================
// rust-i18n 封装; 语言包在 locales/ 下, zh-CN 为默认与回落语言
// 注意: rust_i18n::i18n! 宏在 lib.rs 中初始化
// ==========================================

/// 当前语言代码 ("zh-CN" / "en")
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换语言 (全局生效)
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 查表翻译
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).into_owned()
}

/// 查表翻译并填充 `%{name}` 占位符
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(rust_i18n::t!(key).into_owned(), |msg, (name, value)| {
        msg.replace(&format!("%{{{}}}", name), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale 是全局状态而测试默认并行, 相关测试串行化
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_locale_switch_roundtrip() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_translate_both_locales() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("report.no_conflicts"), "当月未检测到冲突");

        set_locale("en");
        assert_eq!(t("report.no_conflicts"), "No conflicts detected for this month");

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_fills_placeholders() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args(
            "import.summary",
            &[("total", "5"), ("imported", "4"), ("skipped", "1")],
        );
        assert_eq!(msg, "导入完成: 共 5 行, 写入 4 行, 跳过 1 行");

        set_locale("en");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/roster.csv")]);
        assert!(msg.contains("File not found"));
        assert!(msg.contains("/tmp/roster.csv"));

        set_locale("zh-CN");
    }
}
