//! 组件装配：按配置构建模型、持久化、投递、文档、工具与会话控制器
//!
//! 测试直接调用 build_session 传入 Mock 模型、内存持久化与记录型投递；
//! 二进制入口使用 create_session_from_config。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::delivery::{Deliverer, SmtpDeliverer, UnconfiguredDeliverer};
use crate::document::{DocumentStore, FsPersistence, TextPersistence};
use crate::llm::{create_deepseek_client, LlmClient, MockLlmClient, OpenAiClient};
use crate::session::{SessionController, TurnExecutor};
use crate::tools::{build_registry, ToolExecutor};

/// 选择推理后端：provider 指定且有对应 API Key 时使用，否则退回 Mock
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let deepseek_key = std::env::var("DEEPSEEK_API_KEY").ok();
    let openai_key = std::env::var("OPENAI_API_KEY").ok();

    match provider.as_str() {
        "mock" => {
            tracing::info!("Using Mock LLM (configured)");
            Arc::new(MockLlmClient::new())
        }
        "deepseek" if deepseek_key.is_some() => {
            let model = if cfg.llm.model.starts_with("deepseek") {
                Some(cfg.llm.model.as_str())
            } else {
                None
            };
            tracing::info!("Using DeepSeek LLM ({})", model.unwrap_or(crate::llm::DEEPSEEK_CHAT));
            Arc::new(create_deepseek_client(model))
        }
        _ if openai_key.is_some() => {
            tracing::info!("Using OpenAI LLM ({})", cfg.llm.model);
            Arc::new(OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &cfg.llm.model,
                openai_key.as_deref(),
            ))
        }
        _ => {
            tracing::warn!("No API key set for provider '{}', using Mock LLM", provider);
            Arc::new(MockLlmClient::new())
        }
    }
}

/// SMTP 凭据齐全时用 SmtpDeliverer，否则每次发送都返回「未配置」的失败文本
pub fn create_deliverer_from_config(cfg: &AppConfig) -> Arc<dyn Deliverer> {
    let Some((username, password)) = cfg.delivery.credentials() else {
        tracing::warn!("SMTP credentials missing, email delivery disabled");
        return Arc::new(UnconfiguredDeliverer);
    };
    match SmtpDeliverer::new(&cfg.delivery.smtp_host, cfg.delivery.smtp_port, &username, &password) {
        Ok(d) => {
            tracing::info!(host = %cfg.delivery.smtp_host, port = cfg.delivery.smtp_port, "SMTP delivery ready");
            Arc::new(d)
        }
        Err(e) => {
            tracing::warn!("SMTP setup failed ({}), email delivery disabled", e);
            Arc::new(UnconfiguredDeliverer)
        }
    }
}

/// 由显式协作者组装一个会话
pub fn build_session(
    cfg: &AppConfig,
    llm: Arc<dyn LlmClient>,
    persistence: Arc<dyn TextPersistence>,
    deliverer: Arc<dyn Deliverer>,
) -> SessionController {
    let document = DocumentStore::new(persistence)
        .with_extension(cfg.document.extension.clone())
        .with_subject_suffix(cfg.document.subject_suffix.clone())
        .into_shared();
    let executor = ToolExecutor::new(build_registry(document.clone(), deliverer));
    let turn = TurnExecutor::new(llm, executor.specs());
    SessionController::new(turn, executor, document).with_termination(cfg.session.termination)
}

/// 按配置组装会话：文件写入 output_dir，模型与投递按配置 / 环境变量选择
pub fn create_session_from_config(cfg: &AppConfig) -> SessionController {
    let persistence = Arc::new(FsPersistence::new(&cfg.app.output_dir));
    build_session(
        cfg,
        create_llm_from_config(cfg),
        persistence,
        create_deliverer_from_config(cfg),
    )
}
