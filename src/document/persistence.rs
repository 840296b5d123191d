//! 文本持久化协作者
//!
//! TextPersistence 只负责把文本原样写到指定名字下。FsPersistence 绑定输出目录，
//! 文件名经 resolve 校验必须落在目录内（禁止绝对路径与 ../ 逃逸）；InMemoryPersistence 供测试使用。

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::AgentError;

/// 持久化接口：PersistText(name, content)
#[async_trait]
pub trait TextPersistence: Send + Sync {
    async fn persist_text(&self, name: &str, content: &str) -> Result<(), AgentError>;
}

/// 文件系统持久化：所有文件写入 root_dir 之下
#[derive(Debug, Clone)]
pub struct FsPersistence {
    root_dir: PathBuf,
}

impl FsPersistence {
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        Self {
            root_dir: root_dir.as_ref().to_path_buf(),
        }
    }

    /// 将相对文件名解析到 root_dir 下；文件尚不存在，因此按路径组件校验而不是 canonicalize
    pub fn resolve(&self, name: &str) -> Result<PathBuf, AgentError> {
        let rel = Path::new(name.trim_start_matches("./"));
        if rel.as_os_str().is_empty() {
            return Err(AgentError::PersistFailed("empty file name".to_string()));
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(AgentError::PathEscape(name.to_string())),
            }
        }
        Ok(self.root_dir.join(rel))
    }
}

#[async_trait]
impl TextPersistence for FsPersistence {
    async fn persist_text(&self, name: &str, content: &str) -> Result<(), AgentError> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AgentError::PersistFailed(e.to_string()))?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| AgentError::PersistFailed(e.to_string()))?;
        tracing::info!(path = %path.display(), bytes = content.len(), "document written");
        Ok(())
    }
}

/// 内存持久化：记录写入内容；可设置固定失败原因
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    files: Mutex<HashMap<String, String>>,
    fail_with: Mutex<Option<String>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的每次写入都以 reason 失败
    pub fn failing(reason: impl Into<String>) -> Self {
        let p = Self::default();
        p.set_failure(Some(reason.into()));
        p
    }

    pub fn set_failure(&self, reason: Option<String>) {
        if let Ok(mut f) = self.fail_with.lock() {
            *f = reason;
        }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.files.lock().ok().and_then(|f| f.get(name).cloned())
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[async_trait]
impl TextPersistence for InMemoryPersistence {
    async fn persist_text(&self, name: &str, content: &str) -> Result<(), AgentError> {
        if let Some(reason) = self.fail_with.lock().ok().and_then(|f| f.clone()) {
            return Err(AgentError::PersistFailed(reason));
        }
        if let Ok(mut f) = self.files.lock() {
            f.insert(name.to_string(), content.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_escape() {
        let fs = FsPersistence::new("/tmp/drafter-out");
        assert!(matches!(fs.resolve("../etc/passwd"), Err(AgentError::PathEscape(_))));
        assert!(matches!(fs.resolve("/etc/passwd"), Err(AgentError::PathEscape(_))));
        assert!(matches!(fs.resolve("a/../../b.txt"), Err(AgentError::PathEscape(_))));
        assert_eq!(
            fs.resolve("./notes/plan.txt").unwrap(),
            PathBuf::from("/tmp/drafter-out/notes/plan.txt")
        );
    }

    #[tokio::test]
    async fn test_fs_persistence_writes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FsPersistence::new(dir.path());
        fs.persist_text("poem.txt", "line one\nline two\n").await.unwrap();
        let written = std::fs::read_to_string(dir.path().join("poem.txt")).unwrap();
        assert_eq!(written, "line one\nline two\n");
    }

    #[tokio::test]
    async fn test_fs_persistence_creates_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FsPersistence::new(dir.path());
        fs.persist_text("drafts/empty.txt", "").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("drafts/empty.txt")).unwrap(),
            ""
        );
    }

    #[tokio::test]
    async fn test_in_memory_failure() {
        let p = InMemoryPersistence::failing("disk full");
        let err = p.persist_text("a.txt", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Persistence failed: disk full");
        assert!(p.file_names().is_empty());
    }
}
