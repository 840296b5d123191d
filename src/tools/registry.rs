//! 工具注册表
//!
//! 所有工具实现 Tool trait（name / description / parameters_schema / execute），
//! ToolRegistry 按注册顺序保存并按名查找；specs() 生成交给 LLM 的工具声明。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// 工具 trait：名称、描述（供 LLM 理解）、参数 schema、异步执行（args 为 JSON）
///
/// 执行结果总是文本：成功走 Ok，可恢复的失败走 Err，二者都会作为工具结果回到对话中。
#[async_trait]
pub trait Tool: Send + Sync {
    /// 工具名称（LLM 调用时使用的标识）
    fn name(&self) -> &str;

    /// 工具描述（原样交给 LLM）
    fn description(&self) -> &str;

    /// 参数 JSON Schema
    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, args: Value) -> Result<String, String>;
}

/// 交给推理后端的静态工具声明
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// 工具注册表：保留注册顺序，名称重复时后注册者替换前者
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        let tool: Arc<dyn Tool> = Arc::new(tool);
        match self.index.get(&name) {
            Some(&i) => self.tools[i] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<String, String> {
        let tool = self.get(name).ok_or_else(|| format!("Unknown tool: {name}"))?;
        tool.execute(args).await
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// 全部工具声明，按注册顺序
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, &'static str);

    #[async_trait]
    impl Tool for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "fixed"
        }

        async fn execute(&self, _args: Value) -> Result<String, String> {
            Ok(self.1.to_string())
        }
    }

    #[tokio::test]
    async fn test_register_keeps_order_and_replaces_duplicates() {
        let mut reg = ToolRegistry::new();
        reg.register(Fixed("b", "1"));
        reg.register(Fixed("a", "2"));
        reg.register(Fixed("b", "3"));
        assert_eq!(reg.tool_names(), vec!["b", "a"]);
        assert_eq!(reg.execute("b", Value::Null).await.unwrap(), "3");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let reg = ToolRegistry::new();
        let err = reg.execute("nope", Value::Null).await.unwrap_err();
        assert_eq!(err, "Unknown tool: nope");
    }
}
