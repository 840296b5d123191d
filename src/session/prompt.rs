//! 系统提示词：每轮由当前文档内容重新生成，不缓存

/// 空会话时代替人工输入的第一条 user 消息
pub const GREETING: &str =
    "I'm ready to help you update or save a document. What would you like to do?";

/// 文档为空时在提示词中占位
pub const EMPTY_MARKER: &str = "(empty)";

const RULE: &str = "----------------------------";

/// 生成本轮的系统提示词，嵌入文档当前内容
pub fn system_directive(content: &str) -> String {
    let shown = if content.is_empty() { EMPTY_MARKER } else { content };
    format!(
        "You are Drafter, a helpful writing assistant. You help the user update and modify a document in memory.\n\
         - Use 'update' to update the document with new content.\n\
         - Use 'save' when the user wants to save the document.\n\
         - After saving, confirm and stop tool usage.\n\
         - Show current content after updates.\n\
         \n\
         Current document:\n\
         {RULE}\n\
         {shown}\n\
         {RULE}\n"
    )
}
