//! 会话记录：消息与 Transcript
//!
//! Transcript 在一次会话内只追加不删除；assistant 消息可携带若干工具调用，
//! 每个调用在下一条 assistant 消息之前必须有且仅有一条对应的 Tool 消息。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

/// LLM 请求的一次工具调用：id 用于与 Tool 消息关联
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub args: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// 仅 assistant 消息使用
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// 仅 Tool 消息使用：对应的 ToolCall.id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// 仅 Tool 消息使用：产生该结果的工具名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            tool_name: Some(tool_name.into()),
            ..Self::plain(Role::Tool, content)
        }
    }
}

/// 会话 Transcript：按顺序保存 user / assistant / tool 消息（不含 system 指令，后者每轮重建）
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: Message) {
        if msg.role == Role::Assistant {
            let pending = self.unanswered_tool_calls();
            if !pending.is_empty() {
                tracing::warn!(?pending, "assistant message appended before all tool results");
            }
        }
        self.messages.push(msg);
    }

    pub fn extend(&mut self, msgs: impl IntoIterator<Item = Message>) {
        for m in msgs {
            self.push(m);
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 最近一条 assistant 消息中尚无对应 Tool 消息的调用 id
    pub fn unanswered_tool_calls(&self) -> Vec<String> {
        let Some(idx) = self
            .messages
            .iter()
            .rposition(|m| m.role == Role::Assistant)
        else {
            return Vec::new();
        };
        let answered: Vec<&str> = self.messages[idx + 1..]
            .iter()
            .filter(|m| m.role == Role::Tool)
            .filter_map(|m| m.tool_call_id.as_deref())
            .collect();
        self.messages[idx]
            .tool_calls
            .iter()
            .filter(|c| !answered.contains(&c.id.as_str()))
            .map(|c| c.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanswered_tool_calls_tracks_latest_assistant() {
        let mut t = Transcript::new();
        t.push(Message::user("hi"));
        t.push(Message::assistant_with_tools(
            "",
            vec![
                ToolCall::new("c1", "update", serde_json::json!({"content": "x"})),
                ToolCall::new("c2", "save", serde_json::json!({"filename": "x"})),
            ],
        ));
        assert_eq!(t.unanswered_tool_calls(), vec!["c1", "c2"]);

        t.push(Message::tool_result("c1", "update", "ok"));
        assert_eq!(t.unanswered_tool_calls(), vec!["c2"]);

        t.push(Message::tool_result("c2", "save", "ok"));
        assert!(t.unanswered_tool_calls().is_empty());
    }

    #[test]
    fn test_plain_assistant_has_no_pending_calls() {
        let mut t = Transcript::new();
        t.push(Message::user("hi"));
        t.push(Message::assistant("hello"));
        assert!(t.unanswered_tool_calls().is_empty());
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_tool_message_serializes_with_correlation() {
        let msg = Message::tool_result("call_9", "save", "done");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["role"], "tool");
        assert_eq!(v["tool_call_id"], "call_9");
        assert!(v.get("tool_calls").is_none());
    }
}
