//! 文档存储
//!
//! 持有唯一的可变文档内容与最近一次成功保存的文件名。
//! 由会话拥有，通过 SharedDocument 句柄显式交给工具，不存在全局状态。

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::core::AgentError;
use crate::document::TextPersistence;

/// 默认扩展名与主题后缀
pub const DEFAULT_EXTENSION: &str = ".txt";
pub const DEFAULT_SUBJECT_SUFFIX: &str = "[drafted]";

/// 会话与工具共享的文档句柄
pub type SharedDocument = Arc<Mutex<DocumentStore>>;

/// 文档操作错误
#[derive(Error, Debug)]
pub enum DocumentError {
    /// 持久化失败；Display 只输出底层原因
    #[error("{}", cause_text(.source))]
    PersistFailed {
        name: String,
        #[source]
        source: AgentError,
    },
}

fn cause_text(err: &AgentError) -> String {
    match err {
        AgentError::PersistFailed(reason) => reason.clone(),
        other => other.to_string(),
    }
}

pub struct DocumentStore {
    content: String,
    saved_name: Option<String>,
    extension: String,
    subject_suffix: String,
    persistence: Arc<dyn TextPersistence>,
}

impl DocumentStore {
    pub fn new(persistence: Arc<dyn TextPersistence>) -> Self {
        Self {
            content: String::new(),
            saved_name: None,
            extension: DEFAULT_EXTENSION.to_string(),
            subject_suffix: DEFAULT_SUBJECT_SUFFIX.to_string(),
            persistence,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_subject_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.subject_suffix = suffix.into();
        self
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn saved_name(&self) -> Option<&str> {
        self.saved_name.as_deref()
    }

    /// 无条件替换内容，不保留历史
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
    }

    /// 缺少扩展名时补上；已有则原样返回
    pub fn normalize_name(&self, name: &str) -> String {
        if name.ends_with(&self.extension) {
            name.to_string()
        } else {
            format!("{}{}", name, self.extension)
        }
    }

    /// 保存当前内容；成功后记录 saved_name。失败时 content 与 saved_name 均不变
    pub async fn save(&mut self, name: &str) -> Result<String, DocumentError> {
        let normalized = self.normalize_name(name);
        self.persistence
            .persist_text(&normalized, &self.content)
            .await
            .map_err(|source| DocumentError::PersistFailed {
                name: normalized.clone(),
                source,
            })?;
        self.saved_name = Some(normalized.clone());
        Ok(normalized)
    }

    /// 由 saved_name 生成邮件主题：去扩展名、下划线换空格、追加后缀。
    /// 尚未保存时只返回后缀
    pub fn derive_subject(&self) -> String {
        let Some(name) = self.saved_name.as_deref() else {
            return self.subject_suffix.clone();
        };
        let stem = name.strip_suffix(self.extension.as_str()).unwrap_or(name);
        let stem = stem.replace('_', " ");
        if stem.is_empty() {
            self.subject_suffix.clone()
        } else {
            format!("{} {}", stem, self.subject_suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InMemoryPersistence;

    fn store() -> (DocumentStore, Arc<InMemoryPersistence>) {
        let p = Arc::new(InMemoryPersistence::new());
        (DocumentStore::new(p.clone()), p)
    }

    #[tokio::test]
    async fn test_save_persists_exact_content() {
        for content in ["", "hello", "multi\nline\n\ttext", "unicode: 春眠不觉晓"] {
            let (mut doc, p) = store();
            doc.set_content(content);
            let name = doc.save("draft").await.unwrap();
            assert_eq!(name, "draft.txt");
            assert_eq!(p.get("draft.txt").as_deref(), Some(content));
        }
    }

    #[test]
    fn test_normalize_appends_extension_once() {
        let (doc, _) = store();
        assert_eq!(doc.normalize_name("notes"), "notes.txt");
        assert_eq!(doc.normalize_name("notes.txt"), "notes.txt");
        assert_eq!(doc.normalize_name(&doc.normalize_name("notes")), "notes.txt");
        assert_eq!(doc.normalize_name("notes.md"), "notes.md.txt");
    }

    #[tokio::test]
    async fn test_derive_subject() {
        let (mut doc, _) = store();
        doc.save("quarterly_report.txt").await.unwrap();
        assert_eq!(doc.derive_subject(), "quarterly report [drafted]");
    }

    #[tokio::test]
    async fn test_derive_subject_replaces_every_underscore() {
        let (mut doc, _) = store();
        doc.save("a_b__c").await.unwrap();
        assert_eq!(doc.derive_subject(), "a b  c [drafted]");
    }

    #[test]
    fn test_derive_subject_before_save_is_suffix_only() {
        let (doc, _) = store();
        assert_eq!(doc.derive_subject(), "[drafted]");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_state() {
        let p = Arc::new(InMemoryPersistence::new());
        let mut doc = DocumentStore::new(p.clone());
        doc.set_content("first");
        doc.save("one").await.unwrap();

        p.set_failure(Some("disk full".to_string()));
        doc.set_content("second");
        let err = doc.save("two").await.unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(doc.content(), "second");
        assert_eq!(doc.saved_name(), Some("one.txt"));
    }

    #[test]
    fn test_last_set_content_wins() {
        let (mut doc, _) = store();
        for c in ["a", "", "b", "final"] {
            doc.set_content(c);
        }
        assert_eq!(doc.content(), "final");
    }

    #[tokio::test]
    async fn test_custom_extension_and_suffix() {
        let (doc, _) = store();
        let mut doc = doc.with_extension(".md").with_subject_suffix("(draft)");
        doc.save("release_notes").await.unwrap();
        assert_eq!(doc.saved_name(), Some("release_notes.md"));
        assert_eq!(doc.derive_subject(), "release notes (draft)");
    }
}
