//! Drafter 入口：初始化日志、加载配置、在终端上跑一个起草会话。

use std::path::PathBuf;

use anyhow::Context;
use drafter::{create_session_from_config, load_config, observability, ui::StdConsole, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    // 可选：第一个参数为额外的配置文件
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    std::fs::create_dir_all(&cfg.app.output_dir).with_context(|| {
        format!("Failed to create output dir {}", cfg.app.output_dir.display())
    })?;

    let mut session = create_session_from_config(&cfg);
    let mut console = StdConsole::new();
    let snapshot = session.run(&mut console).await.context("Drafter session failed")?;

    tracing::info!(
        saved = ?snapshot.saved_name,
        delivery_attempted = snapshot.delivery_attempted,
        "bye"
    );
    Ok(())
}
