// ==========================================
// 日志系统初始化 (tracing)
// ==========================================
// 约定: 引擎层纯函数不打日志; api/仓储/导入层使用结构化字段
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 安装全局日志订阅器 (进程入口调用一次)
///
/// 过滤器取自 RUST_LOG; 未设置时默认 `info`。
/// 例: `RUST_LOG=extra_duty_roster=debug` 只放大本 crate 的日志。
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 测试用初始化: 输出走测试捕获,重复调用不报错
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("extra_duty_roster=debug"))
        .with_test_writer()
        .try_init();
}
