use crate::domain::model::{AnonymousId, DonationGroup, Platform};
use crate::domain::ports::FolderStore;
use crate::utils::error::Result;

pub const REDACTED_FOLDER: &str = "redacted";

/// Id of the folder `name` under `parent`, created when missing.
pub async fn get_or_create<S: FolderStore>(store: &S, name: &str, parent: &str) -> Result<String> {
    if let Some(id) = store.find_folder(name, parent).await? {
        tracing::debug!("📂 Reusing folder '{}' ({}) under {}", name, id, parent);
        return Ok(id);
    }

    let id = store.create_folder(name, parent).await?;
    tracing::info!("📁 Created folder '{}' ({}) under {}", name, id, parent);
    Ok(id)
}

/// Resolve `root/<group>/<user>/<platform>/redacted`, creating any missing level.
pub async fn resolve_upload_folder<S: FolderStore>(
    store: &S,
    root: &str,
    group: DonationGroup,
    user: &AnonymousId,
    platform: Platform,
) -> Result<String> {
    let group_id = get_or_create(store, group.folder_name(), root).await?;
    let user_id = get_or_create(store, user.as_str(), &group_id).await?;
    let platform_id = get_or_create(store, platform.as_str(), &user_id).await?;
    get_or_create(store, REDACTED_FOLDER, &platform_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MemoryStore {
        // (parent, name) -> id
        folders: Arc<Mutex<HashMap<(String, String), String>>>,
        created: Arc<Mutex<Vec<String>>>,
    }

    impl FolderStore for MemoryStore {
        async fn find_folder(&self, name: &str, parent: &str) -> Result<Option<String>> {
            let folders = self.folders.lock().await;
            Ok(folders
                .get(&(parent.to_string(), name.to_string()))
                .cloned())
        }

        async fn create_folder(&self, name: &str, parent: &str) -> Result<String> {
            let mut folders = self.folders.lock().await;
            let id = format!("f{}", folders.len() + 1);
            folders.insert((parent.to_string(), name.to_string()), id.clone());
            self.created.lock().await.push(name.to_string());
            Ok(id)
        }

        async fn upload_file(&self, _: &str, _: &str, _: &[u8], _: &str) -> Result<String> {
            unreachable!("folder tests never upload")
        }
    }

    #[tokio::test]
    async fn test_resolve_creates_full_path() {
        let store = MemoryStore::default();
        let user = AnonymousId::parse("abcdef01").unwrap();

        let id = resolve_upload_folder(
            &store,
            "root",
            DonationGroup::ResearchDonations,
            &user,
            Platform::Instagram,
        )
        .await
        .unwrap();

        assert_eq!(id, "f4");
        assert_eq!(
            *store.created.lock().await,
            vec!["research_donations", "abcdef01", "Instagram", "redacted"]
        );
    }

    #[tokio::test]
    async fn test_resolve_reuses_existing_folders() {
        let store = MemoryStore::default();
        let first = AnonymousId::parse("00000001").unwrap();
        let second = AnonymousId::parse("00000002").unwrap();

        let a = resolve_upload_folder(&store, "root", DonationGroup::NonDonations, &first, Platform::Reddit)
            .await
            .unwrap();
        let again = resolve_upload_folder(&store, "root", DonationGroup::NonDonations, &first, Platform::Reddit)
            .await
            .unwrap();
        resolve_upload_folder(&store, "root", DonationGroup::NonDonations, &second, Platform::Reddit)
            .await
            .unwrap();

        assert_eq!(a, again);
        let created = store.created.lock().await;
        // the group folder is shared, the second user gets its own subtree
        assert_eq!(created.iter().filter(|n| *n == "non_donations").count(), 1);
        assert_eq!(created.len(), 7);
    }
}
