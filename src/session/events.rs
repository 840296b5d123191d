//! 会话过程事件：控制器只产生事件，如何展示由 Console 决定

use serde::Serialize;

/// 单个可展示事件（可序列化为 JSON）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted,
    /// 回显用户输入
    UserMessage { text: String },
    AssistantMessage { text: String },
    /// 本轮模型请求的工具（按发出顺序）
    ToolsRequested { names: Vec<String> },
    ToolResult { tool: String, content: String },
    /// 检测到保存，即将询问收件人
    DocumentSaved,
    /// 保存后由控制器直接执行的 add_email / send_email 结果
    DeliveryResult { tool: String, content: String },
    SessionEnded,
}

impl SessionEvent {
    /// 终端上的文本形式；以换行开头的事件前面空一行
    pub fn render(&self) -> String {
        match self {
            SessionEvent::SessionStarted => "\n+=+=+=+ DRAFTER WITH EMAIL SUPPORT +=+=+=+".to_string(),
            SessionEvent::UserMessage { text } => format!("User: {}", text),
            SessionEvent::AssistantMessage { text } => format!("\nAI: {}", text),
            SessionEvent::ToolsRequested { names } => {
                let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
                format!("USING TOOLS: [{}]", quoted.join(", "))
            }
            SessionEvent::ToolResult { content, .. } => format!("\nTOOL RESULT: {}", content),
            SessionEvent::DocumentSaved => "\nThe document has been saved to disk.".to_string(),
            SessionEvent::DeliveryResult { content, .. } => content.clone(),
            SessionEvent::SessionEnded => "\n+=+=+=+ DRAFTER SESSION ENDED +=+=+=+".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_requested_lists_quoted_names() {
        let e = SessionEvent::ToolsRequested {
            names: vec!["update".into(), "save".into()],
        };
        assert_eq!(e.render(), "USING TOOLS: ['update', 'save']");
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let v = serde_json::to_value(SessionEvent::ToolResult {
            tool: "save".into(),
            content: "ok".into(),
        })
        .unwrap();
        assert_eq!(v["type"], "tool_result");
        assert_eq!(v["tool"], "save");
    }
}
