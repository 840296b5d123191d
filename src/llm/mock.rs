//! Mock LLM 客户端（用于测试与离线运行，无需 API）
//!
//! 按顺序返回预置的响应脚本；脚本耗尽后回显最后一条 User 消息。
//! 每次调用的消息窗口与工具名都会被记录，便于断言 system 指令与工具声明。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, LlmResponse};
use crate::memory::{Message, Role};
use crate::tools::ToolSpec;

/// 一次被记录的调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
}

/// Mock 客户端：脚本化响应 + 调用记录
#[derive(Debug, Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<LlmResponse, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以响应序列构造
    pub fn with_script(responses: impl IntoIterator<Item = LlmResponse>) -> Self {
        let mock = Self::default();
        for r in responses {
            mock.push_response(r);
        }
        mock
    }

    pub fn push_response(&self, response: LlmResponse) {
        if let Ok(mut s) = self.script.lock() {
            s.push_back(Ok(response));
        }
    }

    /// 让下一次调用失败（模拟网络 / 鉴权错误）
    pub fn push_failure(&self, message: impl Into<String>) {
        if let Ok(mut s) = self.script.lock() {
            s.push_back(Err(message.into()));
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, LlmError> {
        if let Ok(mut c) = self.calls.lock() {
            c.push(RecordedCall {
                messages: messages.to_vec(),
                tool_names: tools.iter().map(|t| t.name.clone()).collect(),
            });
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Provider(message)),
            None => {
                let last_user = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or("(no input)");
                Ok(LlmResponse::text(format!("Echo from Mock: {}", last_user)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_echo() {
        let mock = MockLlmClient::with_script([LlmResponse::text("scripted")]);
        let first = mock.complete(&[Message::user("a")], &[]).await.unwrap();
        assert_eq!(first.content, "scripted");

        let second = mock.complete(&[Message::user("b")], &[]).await.unwrap();
        assert_eq!(second.content, "Echo from Mock: b");
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_push_failure_surfaces_provider_error() {
        let mock = MockLlmClient::new();
        mock.push_failure("rate limited");
        let err = mock.complete(&[], &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider(ref m) if m == "rate limited"));
    }
}
