// Adapters layer: concrete implementations for external systems (Drive, auth, local disk).

pub mod auth;
pub mod drive;
pub mod local;

use crate::core::FolderStore;
use crate::utils::error::Result;
use drive::DriveStore;
use local::LocalFolderStore;

/// The store selected at startup.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Drive(DriveStore),
    Local(LocalFolderStore),
}

impl StoreBackend {
    pub fn describe(&self) -> String {
        match self {
            StoreBackend::Drive(_) => "Google Drive".to_string(),
            StoreBackend::Local(local) => format!("local folder {}", local.base_path().display()),
        }
    }
}

impl FolderStore for StoreBackend {
    async fn find_folder(&self, name: &str, parent: &str) -> Result<Option<String>> {
        match self {
            StoreBackend::Drive(s) => s.find_folder(name, parent).await,
            StoreBackend::Local(s) => s.find_folder(name, parent).await,
        }
    }

    async fn create_folder(&self, name: &str, parent: &str) -> Result<String> {
        match self {
            StoreBackend::Drive(s) => s.create_folder(name, parent).await,
            StoreBackend::Local(s) => s.create_folder(name, parent).await,
        }
    }

    async fn upload_file(&self, name: &str, parent: &str, data: &[u8], mime_type: &str) -> Result<String> {
        match self {
            StoreBackend::Drive(s) => s.upload_file(name, parent, data, mime_type).await,
            StoreBackend::Local(s) => s.upload_file(name, parent, data, mime_type).await,
        }
    }
}
