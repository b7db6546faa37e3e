pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::StoreBackend;
pub use config::{AppConfig, UploadSettings};
pub use crate::core::{engine::UploadEngine, pipeline::UploadPipeline};
pub use domain::model::{AnonymousId, Platform, RedactedDocument, UploadReceipt, UploadRequest};
pub use utils::error::{Result, UploaderError};
