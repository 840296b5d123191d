//! Agent 错误类型
//!
//! 会话级错误只有少数几类会真正中止会话（LLM 调用失败、控制台 I/O 失败）；
//! 持久化与邮件发送失败在工具内部被转为文本结果，不会冒泡到控制循环。

use thiserror::Error;

use crate::llm::LlmError;

/// 会话运行过程中可能出现的错误
#[derive(Error, Debug)]
pub enum AgentError {
    /// 推理后端失败（网络 / 鉴权 / 限流），会话无法继续
    #[error("LLM error: {0}")]
    LlmError(#[from] LlmError),

    #[error("Config error: {0}")]
    ConfigError(String),

    /// 读取用户输入或写出对话失败
    #[error("Console I/O error: {0}")]
    ConsoleIo(#[from] std::io::Error),

    #[error("Persistence failed: {0}")]
    PersistFailed(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Path escape attempt: {0}")]
    PathEscape(String),
}
