//! 文档工具：update / save
//!
//! 两个工具共享会话的 SharedDocument；save 的成功文本同时包含 "saved" 与 "document"，
//! 会话控制器据此判断文档已落盘。

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::document::SharedDocument;
use crate::tools::schema::{args_schema, parse_args};
use crate::tools::Tool;

/// update 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateArgs {
    /// The full new content of the document (replaces the previous content).
    pub content: String,
}

/// save 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaveArgs {
    /// Target file name; the .txt extension is added when missing.
    pub filename: String,
}

/// update 工具：整体替换文档内容
pub struct UpdateTool {
    document: SharedDocument,
}

impl UpdateTool {
    pub fn new(document: SharedDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl Tool for UpdateTool {
    fn name(&self) -> &str {
        "update"
    }

    fn description(&self) -> &str {
        "Update the in-memory document with the provided full content."
    }

    fn parameters_schema(&self) -> Value {
        args_schema::<UpdateArgs>()
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let args: UpdateArgs = parse_args(self.name(), args)?;
        let mut doc = self.document.lock().await;
        doc.set_content(args.content);
        tracing::info!(chars = doc.content().chars().count(), "document updated");
        Ok(format!(
            "Document has been updated successfully! Current content:\n\n{}",
            doc.content()
        ))
    }
}

/// save 工具：写入文本文件并记录文件名
pub struct SaveTool {
    document: SharedDocument,
}

impl SaveTool {
    pub fn new(document: SharedDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl Tool for SaveTool {
    fn name(&self) -> &str {
        "save"
    }

    fn description(&self) -> &str {
        "Save the in-memory document content to a text file with the specified filename."
    }

    fn parameters_schema(&self) -> Value {
        args_schema::<SaveArgs>()
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let args: SaveArgs = parse_args(self.name(), args)?;
        let mut doc = self.document.lock().await;
        match doc.save(&args.filename).await {
            Ok(name) => Ok(format!("Document has been saved successfully to '{}'.", name)),
            Err(e) => {
                tracing::warn!(filename = %args.filename, error = %e, "save failed");
                Err(format!("Error saving document: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentStore, InMemoryPersistence};
    use std::sync::Arc;

    fn shared(p: Arc<InMemoryPersistence>) -> SharedDocument {
        DocumentStore::new(p).into_shared()
    }

    #[tokio::test]
    async fn test_update_embeds_content_verbatim() {
        let doc = shared(Arc::new(InMemoryPersistence::new()));
        let tool = UpdateTool::new(doc.clone());
        let out = tool
            .execute(serde_json::json!({"content": "Roses are red"}))
            .await
            .unwrap();
        assert!(out.ends_with("Roses are red"));
        assert_eq!(doc.lock().await.content(), "Roses are red");
    }

    #[tokio::test]
    async fn test_update_sequence_keeps_last() {
        let doc = shared(Arc::new(InMemoryPersistence::new()));
        let tool = UpdateTool::new(doc.clone());
        for c in ["one", "two", ""] {
            tool.execute(serde_json::json!({"content": c})).await.unwrap();
        }
        assert_eq!(doc.lock().await.content(), "");
    }

    #[tokio::test]
    async fn test_save_success_message() {
        let p = Arc::new(InMemoryPersistence::new());
        let doc = shared(p.clone());
        doc.lock().await.set_content("body");
        let out = SaveTool::new(doc.clone())
            .execute(serde_json::json!({"filename": "x"}))
            .await
            .unwrap();
        assert_eq!(out, "Document has been saved successfully to 'x.txt'.");
        assert_eq!(p.get("x.txt").as_deref(), Some("body"));
        assert_eq!(doc.lock().await.saved_name(), Some("x.txt"));
    }

    #[tokio::test]
    async fn test_save_failure_is_text() {
        let p = Arc::new(InMemoryPersistence::failing("disk full"));
        let doc = shared(p);
        let err = SaveTool::new(doc.clone())
            .execute(serde_json::json!({"filename": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err, "Error saving document: disk full");
        assert_eq!(doc.lock().await.saved_name(), None);
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let doc = shared(Arc::new(InMemoryPersistence::new()));
        let err = SaveTool::new(doc).execute(serde_json::json!({})).await.unwrap_err();
        assert!(err.contains("filename"));
    }
}
