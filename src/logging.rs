// ==========================================
// 日志系统初始化
// ==========================================
// 输出: 文本（本地调试）/ JSON（服务部署，供日志采集）
// 过滤: RUST_LOG，缺省 info
// 宿主进程已安装订阅者时初始化静默跳过
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤器
pub const DEFAULT_FILTER: &str = "info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 由过滤指令构建过滤器；缺省或非法时退回默认级别
pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// 初始化日志系统（文本格式）
///
/// # 示例
/// ```no_run
/// use customer_reconcile::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_format(LogFormat::Text);
}

/// 按指定格式初始化
///
/// # 环境变量
/// - RUST_LOG: 例如 `customer_reconcile::importer=debug`
pub fn init_with_format(format: LogFormat) {
    let directive = std::env::var("RUST_LOG").ok();
    let filter = build_filter(directive.as_deref());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// 测试环境日志（debug 级别，输出到测试捕获）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(build_filter(Some("debug")))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_defaults_to_info() {
        assert_eq!(build_filter(None).to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn test_build_filter_keeps_valid_directive() {
        assert_eq!(
            build_filter(Some("customer_reconcile=debug")).to_string(),
            "customer_reconcile=debug"
        );
    }

    #[test]
    fn test_default_format_is_text() {
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }
}
