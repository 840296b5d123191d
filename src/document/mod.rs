//! 文档层：唯一的内存文档与其持久化协作者

pub mod persistence;
pub mod store;

pub use persistence::{FsPersistence, InMemoryPersistence, TextPersistence};
pub use store::{
    DocumentError, DocumentStore, SharedDocument, DEFAULT_EXTENSION, DEFAULT_SUBJECT_SUFFIX,
};
