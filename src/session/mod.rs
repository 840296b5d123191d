//! 会话：提示词、单轮执行、保存检测、过程事件与状态机控制器

pub mod controller;
pub mod events;
pub mod prompt;
pub mod termination;
pub mod turn;

pub use controller::{SessionController, INSTRUCTION_PROMPT, RECIPIENT_PROMPT};
pub use events::SessionEvent;
pub use prompt::{system_directive, EMPTY_MARKER, GREETING};
pub use termination::{is_save_confirmation, TerminationMode};
pub use turn::TurnExecutor;
