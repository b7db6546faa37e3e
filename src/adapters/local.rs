use crate::core::FolderStore;
use crate::utils::error::{Result, UploaderError};
use std::path::{Path, PathBuf};

/// Folder tree on the local filesystem, for offline runs and tests.
///
/// Folder ids are `/`-separated paths relative to the base directory; the root
/// id is `"root"`.
#[derive(Debug, Clone)]
pub struct LocalFolderStore {
    base_path: PathBuf,
}

impl LocalFolderStore {
    pub const ROOT_ID: &'static str = "root";

    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, id: &str) -> Result<PathBuf> {
        let mut path = self.base_path.clone();
        if id.is_empty() || id == Self::ROOT_ID {
            return Ok(path);
        }
        for part in id.split('/') {
            check_name(part)?;
            path.push(part);
        }
        Ok(path)
    }

    fn child_id(parent: &str, name: &str) -> String {
        if parent.is_empty() || parent == Self::ROOT_ID {
            name.to_string()
        } else {
            format!("{}/{}", parent, name)
        }
    }
}

fn check_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(UploaderError::ValidationError {
            message: format!("'{}' is not a valid folder or file name", name),
        });
    }
    Ok(())
}

impl FolderStore for LocalFolderStore {
    async fn find_folder(&self, name: &str, parent: &str) -> Result<Option<String>> {
        check_name(name)?;
        let path = self.resolve(parent)?.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(Some(Self::child_id(parent, name))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_folder(&self, name: &str, parent: &str) -> Result<String> {
        check_name(name)?;
        let path = self.resolve(parent)?.join(name);
        tokio::fs::create_dir_all(&path).await?;
        Ok(Self::child_id(parent, name))
    }

    async fn upload_file(&self, name: &str, parent: &str, data: &[u8], _mime_type: &str) -> Result<String> {
        check_name(name)?;
        let dir = self.resolve(parent)?;
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(name), data).await?;
        Ok(Self::child_id(parent, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_find_and_upload() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFolderStore::new(temp_dir.path());

        assert_eq!(store.find_folder("a", "root").await.unwrap(), None);
        let a = store.create_folder("a", "root").await.unwrap();
        assert_eq!(a, "a");
        assert_eq!(store.find_folder("a", "root").await.unwrap(), Some("a".to_string()));

        let b = store.create_folder("b", &a).await.unwrap();
        assert_eq!(b, "a/b");

        let file = store.upload_file("x.json", &b, b"{}", "application/json").await.unwrap();
        assert_eq!(file, "a/b/x.json");
        assert_eq!(std::fs::read(temp_dir.path().join("a/b/x.json")).unwrap(), b"{}");
        // a file is not a folder
        assert_eq!(store.find_folder("x.json", &b).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalFolderStore::new(temp_dir.path());
        assert!(store.create_folder("..", "root").await.is_err());
        assert!(store.create_folder("x", "../etc").await.is_err());
        assert!(store.upload_file("a/b", "root", b"", "text/plain").await.is_err());
    }
}
