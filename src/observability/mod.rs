//! 可观测性：tracing 订阅者初始化
//!
//! 日志写 stderr，stdout 只留给对话输出。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 安装全局订阅者；RUST_LOG 可覆盖默认的 info 级别
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
