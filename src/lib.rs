//! Drafter - 对话式文档起草助手
//!
//! 模块划分：
//! - **agent**: 组件装配（模型、持久化、投递、工具、会话）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型与会话阶段
//! - **delivery**: 邮件投递协作者（SMTP / 未配置 / 记录型）
//! - **document**: 单文档存储与文本持久化
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / DeepSeek / Mock）
//! - **memory**: 消息与 Transcript
//! - **observability**: tracing 初始化
//! - **session**: 提示词、单轮执行、保存检测、状态机控制器
//! - **tools**: 工具 trait、注册表、执行器与四个文档工具
//! - **ui**: 行式终端边界

pub mod agent;
pub mod config;
pub mod core;
pub mod delivery;
pub mod document;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod session;
pub mod tools;
pub mod ui;

pub use crate::agent::{build_session, create_session_from_config};
pub use crate::config::{load_config, AppConfig};
pub use crate::core::{AgentError, SessionPhase, SessionSnapshot};
pub use crate::session::SessionController;
