//! 保存检测：决定一批工具结果之后是否进入发送邮件环节

use serde::{Deserialize, Serialize};

use crate::tools::ToolResult;

/// 保存检测方式（配置项 session.termination）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationMode {
    /// 结果文本同时包含 "saved" 与 "document"（不区分大小写）
    #[default]
    TextMatch,
    /// save 工具执行成功
    SaveSucceeded,
}

/// 文本是否像一条保存成功的确认
pub fn is_save_confirmation(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("saved") && lower.contains("document")
}

impl TerminationMode {
    /// 只看本次分发产生的结果，不回溯更早的工具结果
    pub fn save_detected(self, batch: &[ToolResult]) -> bool {
        match self {
            TerminationMode::TextMatch => batch.iter().any(|r| is_save_confirmation(&r.content)),
            TerminationMode::SaveSucceeded => {
                batch.iter().any(|r| r.tool_name == "save" && r.is_ok())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolOutcome;

    fn result(tool: &str, content: &str, outcome: ToolOutcome) -> ToolResult {
        ToolResult {
            tool_call_id: "c".into(),
            tool_name: tool.into(),
            content: content.into(),
            outcome,
        }
    }

    #[test]
    fn test_text_match() {
        assert!(is_save_confirmation("Document has been saved successfully to 'x.txt'."));
        assert!(is_save_confirmation("SAVED the DOCUMENT"));
        assert!(!is_save_confirmation("Error saving document: disk full"));
        assert!(!is_save_confirmation("Document sent to a@b.com successfully."));
    }

    #[test]
    fn test_text_match_scans_whole_batch() {
        let batch = vec![
            result("update", "Document has been updated successfully! Current content:\n\nhi", ToolOutcome::Ok),
            result("save", "Document has been saved successfully to 'hi.txt'.", ToolOutcome::Ok),
        ];
        assert!(TerminationMode::TextMatch.save_detected(&batch));
        assert!(!TerminationMode::TextMatch.save_detected(&batch[..1]));
        assert!(!TerminationMode::TextMatch.save_detected(&[]));
    }

    #[test]
    fn test_update_echo_can_match_text_but_not_structured() {
        let batch = vec![result(
            "update",
            "Document has been updated successfully! Current content:\n\nI saved it.",
            ToolOutcome::Ok,
        )];
        assert!(TerminationMode::TextMatch.save_detected(&batch));
        assert!(!TerminationMode::SaveSucceeded.save_detected(&batch));
    }

    #[test]
    fn test_structured_requires_success() {
        let failed = vec![result("save", "Error saving document: disk full", ToolOutcome::Error)];
        assert!(!TerminationMode::SaveSucceeded.save_detected(&failed));
        let ok = vec![result("save", "Document has been saved successfully to 'a.txt'.", ToolOutcome::Ok)];
        assert!(TerminationMode::SaveSucceeded.save_detected(&ok));
    }

    #[test]
    fn test_mode_deserializes_snake_case() {
        let m: TerminationMode = serde_json::from_str("\"save_succeeded\"").unwrap();
        assert_eq!(m, TerminationMode::SaveSucceeded);
    }
}
