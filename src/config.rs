//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `DRAFTER__*` 覆盖（双下划线表示嵌套，如 `DRAFTER__LLM__PROVIDER=openai`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::document::{DEFAULT_EXTENSION, DEFAULT_SUBJECT_SUFFIX};
use crate::session::TerminationMode;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub document: DocumentSection,
    pub delivery: DeliverySection,
    pub session: SessionSection,
}

/// [app] 段：文档输出目录
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// save 写入的目录，未设置时为当前目录
    pub output_dir: PathBuf,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// [llm] 段：后端选择
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：openai / deepseek / mock；没有对应 API Key 时退回 mock
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
        }
    }
}

/// [document] 段
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentSection {
    pub extension: String,
    pub subject_suffix: String,
}

impl Default for DocumentSection {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            subject_suffix: DEFAULT_SUBJECT_SUFFIX.to_string(),
        }
    }
}

/// [delivery] 段：SMTP 投递（STARTTLS）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliverySection {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DeliverySection {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: None,
            password: None,
        }
    }
}

impl DeliverySection {
    /// 发件账号与密码；配置缺省时读取 SMTP_USERNAME / SMTP_PASSWORD
    pub fn credentials(&self) -> Option<(String, String)> {
        let pick = |configured: &Option<String>, var: &str| {
            configured
                .clone()
                .or_else(|| std::env::var(var).ok())
                .filter(|s| !s.trim().is_empty())
        };
        let username = pick(&self.username, "SMTP_USERNAME")?;
        let password = pick(&self.password, "SMTP_PASSWORD")?;
        Some((username, password))
    }
}

/// [session] 段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub termination: TerminationMode,
}

/// 从 config 目录加载配置，环境变量 DRAFTER__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 DRAFTER__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    for name in ["config/default", "../config/default", "default"] {
        if std::path::Path::new(&format!("{}.toml", name)).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(path) = config_path.filter(|p| p.exists()) {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("DRAFTER")
            .separator("__")
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}
