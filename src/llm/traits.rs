//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / DeepSeek / Mock）实现 LlmClient：给定消息窗口与工具声明，
//! 返回可选文本与零个或多个工具调用。调用失败对当前会话是致命的，这里不做重试。

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::{Message, ToolCall};
use crate::tools::ToolSpec;

/// 推理后端错误
#[derive(Error, Debug)]
pub enum LlmError {
    /// 请求构造失败（消息或工具声明无法转换为 API 格式）
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// API 返回错误（网络 / 鉴权 / 限流等）
    #[error("provider error: {0}")]
    Provider(String),

    /// 响应中没有任何 choice
    #[error("empty response from provider")]
    EmptyResponse,
}

/// 一次推理的结果：文本可为空，工具调用按模型给出的顺序排列
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// 转为可写入 Transcript 的 assistant 消息
    pub fn to_message(&self) -> Message {
        Message::assistant_with_tools(self.content.clone(), self.tool_calls.clone())
    }
}

/// LLM 客户端 trait
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成；tools 为本轮可调用的全部工具声明
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, LlmError>;

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}
