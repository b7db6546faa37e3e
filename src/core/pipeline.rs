use crate::core::document::decode_upload;
use crate::core::folders::resolve_upload_folder;
use crate::core::redact::{anonymize, RedactionPolicy};
use crate::core::{ConfigProvider, FolderStore, Pipeline, RedactedDocument, UploadReceipt};
use crate::domain::model::UploadRequest;
use crate::utils::error::{Result, UploaderError};

pub const JSON_MIME: &str = "application/json";

pub struct UploadPipeline<S: FolderStore, C: ConfigProvider> {
    store: S,
    config: C,
    request: UploadRequest,
}

impl<S: FolderStore, C: ConfigProvider> UploadPipeline<S, C> {
    pub fn new(store: S, config: C, request: UploadRequest) -> Self {
        Self {
            store,
            config,
            request,
        }
    }

}

/// Redact an already decoded export for `request`.
///
/// Fails with `ConsentRequired` until the participant has acknowledged the
/// deletion terms. `default_extra_keys` are redacted on top of the request's own.
pub fn redact_decoded(
    request: &UploadRequest,
    default_extra_keys: &[String],
    data: &serde_json::Value,
) -> Result<RedactedDocument> {
    // 使用者必須先確認刪除條款
    if !request.acknowledged_deletion {
        return Err(UploaderError::ConsentRequired);
    }

    let extras = request.extra_keys.iter().chain(default_extra_keys).cloned();
    let policy = RedactionPolicy::for_platform(request.platform, extras);
    tracing::debug!("Redacting with {} keys", policy.len());

    Ok(RedactedDocument {
        platform: request.platform,
        file_name: request.output_file_name(),
        data: anonymize(data, &policy),
    })
}

/// Decode and redact without a store, for offline CLI use.
pub fn redact_request(request: &UploadRequest, default_extra_keys: &[String]) -> Result<RedactedDocument> {
    let data = decode_upload(&request.content)?;
    redact_decoded(request, default_extra_keys, &data)
}

#[async_trait::async_trait]
impl<S: FolderStore, C: ConfigProvider> Pipeline for UploadPipeline<S, C> {
    async fn extract(&self) -> Result<serde_json::Value> {
        tracing::debug!(
            "Decoding '{}' ({} bytes)",
            self.request.file_name,
            self.request.content.len()
        );
        decode_upload(&self.request.content)
    }

    async fn transform(&self, data: serde_json::Value) -> Result<RedactedDocument> {
        redact_decoded(&self.request, self.config.default_extra_keys(), &data)
    }

    async fn load(&self, document: RedactedDocument) -> Result<UploadReceipt> {
        let group = self.request.group();
        let folder_id = resolve_upload_folder(
            &self.store,
            self.config.root_folder_id(),
            group,
            &self.request.user_id,
            self.request.platform,
        )
        .await?;

        let body = document.to_pretty_json()?;
        tracing::debug!(
            "Uploading {} ({} bytes) to folder {}",
            document.file_name,
            body.len(),
            folder_id
        );
        let file_id = self
            .store
            .upload_file(&document.file_name, &folder_id, body.as_bytes(), JSON_MIME)
            .await?;

        Ok(UploadReceipt {
            file_id,
            folder_id,
            group,
            file_name: document.file_name,
            bytes: body.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AnonymousId, DonationGroup, Platform};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStore {
        folders: Arc<Mutex<Vec<(String, String, String)>>>,
        files: Arc<Mutex<HashMap<String, (String, Vec<u8>)>>>,
    }

    impl FolderStore for MockStore {
        async fn find_folder(&self, name: &str, parent: &str) -> Result<Option<String>> {
            let folders = self.folders.lock().await;
            Ok(folders
                .iter()
                .find(|(n, p, _)| n == name && p == parent)
                .map(|(_, _, id)| id.clone()))
        }

        async fn create_folder(&self, name: &str, parent: &str) -> Result<String> {
            let mut folders = self.folders.lock().await;
            let id = format!("{}/{}", parent, name);
            folders.push((name.to_string(), parent.to_string(), id.clone()));
            Ok(id)
        }

        async fn upload_file(&self, name: &str, parent: &str, data: &[u8], _mime: &str) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(name.to_string(), (parent.to_string(), data.to_vec()));
            Ok(format!("file-{}", files.len()))
        }
    }

    struct MockConfig {
        extras: Vec<String>,
    }

    impl ConfigProvider for MockConfig {
        fn root_folder_id(&self) -> &str {
            "root"
        }

        fn default_extra_keys(&self) -> &[String] {
            &self.extras
        }
    }

    fn request(content: serde_json::Value, acknowledged: bool) -> UploadRequest {
        UploadRequest {
            user_id: AnonymousId::parse("deadbeef").unwrap(),
            platform: Platform::Twitter,
            file_name: "tweets.json".to_string(),
            content: serde_json::to_vec(&content).unwrap(),
            donate: true,
            acknowledged_deletion: acknowledged,
            extra_keys: vec!["text".to_string()],
        }
    }

    fn pipeline(req: UploadRequest) -> (UploadPipeline<MockStore, MockConfig>, MockStore) {
        let store = MockStore::default();
        let config = MockConfig {
            extras: vec!["lang".to_string()],
        };
        (UploadPipeline::new(store.clone(), config, req), store)
    }

    #[tokio::test]
    async fn test_transform_requires_consent() {
        let (pipeline, _) = pipeline(request(json!({"a": 1}), false));
        let data = pipeline.extract().await.unwrap();
        let err = pipeline.transform(data).await.unwrap_err();
        assert!(matches!(err, UploaderError::ConsentRequired));
    }

    #[tokio::test]
    async fn test_transform_uses_request_and_config_extras() {
        let (pipeline, _) = pipeline(request(
            json!({"tweets": [{"text": "hi", "lang": "en", "username": "me", "retweets": 2}]}),
            true,
        ));
        let data = pipeline.extract().await.unwrap();
        let doc = pipeline.transform(data).await.unwrap();

        assert_eq!(doc.file_name, "deadbeef_Twitter_tweets.json");
        assert_eq!(
            doc.data,
            json!({"tweets": [{"text": "REDACTED", "lang": "REDACTED", "username": "REDACTED", "retweets": 2}]})
        );
    }

    #[test]
    fn test_redact_request_without_store() {
        let req = request(json!({"text": "hi", "username": "me", "n": 1}), true);
        let doc = redact_request(&req, &["n".to_string()]).unwrap();
        assert_eq!(doc.file_name, "deadbeef_Twitter_tweets.json");
        assert_eq!(
            doc.data,
            json!({"text": "REDACTED", "username": "REDACTED", "n": "REDACTED"})
        );

        let unconfirmed = request(json!({"text": "hi"}), false);
        assert!(matches!(
            redact_request(&unconfirmed, &[]),
            Err(UploaderError::ConsentRequired)
        ));
    }

    #[tokio::test]
    async fn test_load_uploads_into_group_tree() {
        let (pipeline, store) = pipeline(request(json!({"note": "ok"}), true));
        let data = pipeline.extract().await.unwrap();
        let doc = pipeline.transform(data).await.unwrap();
        let receipt = pipeline.load(doc).await.unwrap();

        assert_eq!(receipt.group, DonationGroup::ResearchDonations);
        assert_eq!(
            receipt.folder_id,
            "root/research_donations/deadbeef/Twitter/redacted"
        );
        assert_eq!(receipt.file_id, "file-1");

        let files = store.files.lock().await;
        let (parent, bytes) = files.get("deadbeef_Twitter_tweets.json").unwrap();
        assert_eq!(parent, &receipt.folder_id);
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "{\n  \"note\": \"ok\"\n}"
        );
        assert_eq!(receipt.bytes, bytes.len());
    }
}
