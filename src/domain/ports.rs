use crate::domain::model::{RedactedDocument, UploadReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A remote tree of named folders that accepts file uploads.
pub trait FolderStore: Send + Sync {
    /// Id of the first folder called `name` directly under `parent`.
    fn find_folder(
        &self,
        name: &str,
        parent: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    fn create_folder(
        &self,
        name: &str,
        parent: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Returns the id of the uploaded file.
    fn upload_file(
        &self,
        name: &str,
        parent: &str,
        data: &[u8],
        mime_type: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn root_folder_id(&self) -> &str;
    /// Keys redacted on every upload on top of the platform catalogue.
    fn default_extra_keys(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<serde_json::Value>;
    async fn transform(&self, data: serde_json::Value) -> Result<RedactedDocument>;
    async fn load(&self, document: RedactedDocument) -> Result<UploadReceipt>;
}
