pub mod analytics;
pub mod document;
pub mod engine;
pub mod export;
pub mod folders;
pub mod keys;
pub mod pipeline;
pub mod redact;

pub use crate::domain::model::{RedactedDocument, UploadReceipt};
pub use crate::domain::ports::{ConfigProvider, FolderStore, Pipeline};
pub use crate::utils::error::Result;
