//! 工具参数 JSON Schema 生成（schemars）
//!
//! 每个工具的参数以结构体声明并 derive JsonSchema，这里转为 function calling 需要的 schema。
//! 同一结构体也用于从 LLM 给出的 args 反序列化，保证声明与解析一致。

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 由参数结构体生成 JSON Schema（去掉 $schema / title 等元信息）
pub fn args_schema<T: JsonSchema>() -> Value {
    let schema = schema_for!(T);
    let mut value = serde_json::to_value(&schema).unwrap_or_else(|_| serde_json::json!({}));
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    value
}

/// 解析工具参数；失败时返回可直接展示给 LLM 的错误文本
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("{tool}: invalid arguments: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    /// 测试参数
    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct DemoArgs {
        /// 文件名
        filename: String,
    }

    #[test]
    fn test_schema_lists_required_field() {
        let schema = args_schema::<DemoArgs>();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["filename"].is_object());
        assert_eq!(schema["required"], serde_json::json!(["filename"]));
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn test_parse_args_reports_tool_name() {
        let err = parse_args::<DemoArgs>("save", serde_json::json!({})).err().unwrap();
        assert!(err.starts_with("save: invalid arguments"));
    }
}
