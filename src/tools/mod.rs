pub mod document;
pub mod email;
pub mod executor;
pub mod registry;
pub mod schema;

use std::sync::Arc;

use crate::delivery::Deliverer;
use crate::document::SharedDocument;

pub use document::{SaveTool, UpdateTool};
pub use email::{is_valid_email, AddEmailTool, SendEmailTool};
pub use executor::{ToolExecutor, ToolOutcome, ToolResult};
pub use registry::{Tool, ToolRegistry, ToolSpec};
pub use schema::{args_schema, parse_args};

/// 注册会话的四个工具：update、save、add_email、send_email（顺序即声明顺序）
pub fn build_registry(document: SharedDocument, deliverer: Arc<dyn Deliverer>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(UpdateTool::new(document.clone()));
    registry.register(SaveTool::new(document.clone()));
    registry.register(AddEmailTool);
    registry.register(SendEmailTool::new(document, deliverer));
    registry
}
