//! 会话记忆：消息类型与 Transcript（仅进程内，不跨重启持久化）

pub mod conversation;

pub use conversation::{Message, Role, ToolCall, Transcript};
