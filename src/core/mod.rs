//! 核心层：错误类型与会话阶段

pub mod error;
pub mod state;

pub use error::AgentError;
pub use state::{SessionPhase, SessionSnapshot};
