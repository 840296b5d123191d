//! 工具执行器（分发器）
//!
//! 持有 ToolRegistry，按模型给出的顺序逐个执行工具调用，每个调用产生一条 ToolResult。
//! 未知工具与工具失败都折叠为文本结果，分发本身从不向调用方报错；每次调用输出结构化审计日志（JSON）。

use std::time::Instant;

use serde_json::Value;

use crate::memory::{Message, ToolCall};
use crate::tools::{ToolRegistry, ToolSpec};

/// 单次工具执行的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    Ok,
    /// 工具返回 Err（持久化 / 投递失败、参数错误等）
    Error,
    UnknownTool,
}

/// 一条工具结果：与触发它的调用通过 tool_call_id 关联
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub content: String,
    pub outcome: ToolOutcome,
}

impl ToolResult {
    pub fn is_ok(&self) -> bool {
        self.outcome == ToolOutcome::Ok
    }

    pub fn to_message(&self) -> Message {
        Message::tool_result(&self.tool_call_id, &self.tool_name, &self.content)
    }
}

/// 工具执行器
pub struct ToolExecutor {
    registry: ToolRegistry,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// 执行单个调用，结果总是文本
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        let args_preview = args_preview(&call.args);

        let (content, outcome) = match self.registry.get(&call.name) {
            None => (
                format!(
                    "Error: unknown tool '{}'. Available tools: {}.",
                    call.name,
                    self.registry.tool_names().join(", ")
                ),
                ToolOutcome::UnknownTool,
            ),
            Some(tool) => match tool.execute(call.args.clone()).await {
                Ok(text) => (text, ToolOutcome::Ok),
                Err(text) => (text, ToolOutcome::Error),
            },
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": call.name,
            "ok": outcome == ToolOutcome::Ok,
            "outcome": match outcome {
                ToolOutcome::Ok => "ok",
                ToolOutcome::Error => "error",
                ToolOutcome::UnknownTool => "unknown_tool",
            },
            "duration_ms": duration_ms,
            "args_preview": args_preview,
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        ToolResult {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content,
            outcome,
        }
    }

    /// 按顺序执行全部调用；一个调用结束后才开始下一个
    pub async fn dispatch_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(call).await);
        }
        results
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.registry.specs()
    }
}

fn args_preview(args: &Value) -> String {
    let s = args.to_string();
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}
