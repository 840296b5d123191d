//! 单轮执行：组装上下文窗口、调用模型、把本轮消息追加到 Transcript

use std::sync::Arc;

use crate::core::AgentError;
use crate::document::SharedDocument;
use crate::llm::{LlmClient, LlmResponse};
use crate::memory::{Message, Transcript};
use crate::session::prompt::system_directive;
use crate::tools::ToolSpec;

/// 轮次执行器：持有模型与本会话全部工具声明
pub struct TurnExecutor {
    llm: Arc<dyn LlmClient>,
    specs: Vec<ToolSpec>,
}

impl TurnExecutor {
    pub fn new(llm: Arc<dyn LlmClient>, specs: Vec<ToolSpec>) -> Self {
        Self { llm, specs }
    }

    /// 累计 token 使用：(prompt, completion, total)
    pub fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    /// 跑一轮：窗口 = [system] + transcript + [user]
    ///
    /// 推理失败直接返回错误，此时 transcript 不变。
    pub async fn run_turn(
        &self,
        transcript: &mut Transcript,
        utterance: &str,
        document: &SharedDocument,
    ) -> Result<LlmResponse, AgentError> {
        let directive = {
            let doc = document.lock().await;
            system_directive(doc.content())
        };
        let user = Message::user(utterance);

        let mut window = Vec::with_capacity(transcript.len() + 2);
        window.push(Message::system(directive));
        window.extend_from_slice(transcript.messages());
        window.push(user.clone());

        tracing::debug!(window = window.len(), "running turn");
        let response = self.llm.complete(&window, &self.specs).await?;
        tracing::debug!(
            tool_calls = response.tool_calls.len(),
            chars = response.content.chars().count(),
            "turn completed"
        );

        transcript.push(user);
        transcript.push(response.to_message());
        Ok(response)
    }
}
