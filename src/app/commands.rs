use crate::config::cli::{DocumentArgs, ExportArgs, RedactArgs, UploadArgs};
use crate::config::AppConfig;
use crate::core::analytics;
use crate::core::document::decode_upload;
use crate::core::engine::{UploadEngine, UploadOutcome};
use crate::core::export::export_bundle;
use crate::core::keys::extract_keys;
use crate::core::pipeline::{redact_request, UploadPipeline};
use crate::domain::model::{AnonymousId, RedactedDocument, UploadRequest};
use crate::utils::error::{Result, UploaderError};
use std::path::{Path, PathBuf};

pub async fn list_keys(file: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read(file).await?;
    let data = decode_upload(&content)?;
    Ok(extract_keys(&data).into_iter().collect())
}

/// Read the export and turn the CLI flags into an upload request.
///
/// Without `--user-id` a fresh anonymous ID is issued and printed.
pub async fn load_request(args: &DocumentArgs, donate: bool) -> Result<UploadRequest> {
    let user_id = match &args.user_id {
        Some(id) => AnonymousId::parse(id.trim())?,
        None => {
            let id = AnonymousId::generate();
            println!("🆔 Anonymous ID: {} (save this ID to upload more files later)", id);
            id
        }
    };

    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| UploaderError::ValidationError {
            message: format!("'{}' is not a file", args.file.display()),
        })?;

    tracing::info!("📂 Reading {}", args.file.display());
    let content = tokio::fs::read(&args.file).await?;

    Ok(UploadRequest {
        user_id,
        platform: args.platform,
        file_name,
        content,
        donate,
        acknowledged_deletion: args.acknowledge_deletion,
        extra_keys: args.extra_keys.clone(),
    })
}

async fn redacted(args: &DocumentArgs, config: &AppConfig) -> Result<RedactedDocument> {
    let request = load_request(args, false).await?;
    redact_request(&request, &config.redaction.extra_keys)
}

/// Write the redacted copy into `args.out`; returns its path.
pub async fn redact(args: &RedactArgs, config: &AppConfig) -> Result<PathBuf> {
    let document = redacted(&args.document, config).await?;

    tokio::fs::create_dir_all(&args.out).await?;
    let path = args.out.join(&document.file_name);
    tokio::fs::write(&path, document.to_pretty_json()?).await?;
    tracing::info!("✅ Redacted copy written to {}", path.display());
    Ok(path)
}

/// Write the zip bundle; returns its path and size.
pub async fn export(args: &ExportArgs, config: &AppConfig) -> Result<(PathBuf, usize)> {
    let document = redacted(&args.document, config).await?;
    let report = analytics::analyze(document.platform, &document.data);
    let bundle = export_bundle(&document, &report)?;

    let path = args
        .out
        .clone()
        .unwrap_or_else(|| default_bundle_path(&document.file_name));
    tokio::fs::write(&path, &bundle).await?;
    tracing::info!("📦 Bundle written to {}", path.display());
    Ok((path, bundle.len()))
}

pub fn default_bundle_path(file_name: &str) -> PathBuf {
    let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
    PathBuf::from(format!("{}.zip", stem))
}

pub async fn upload(args: &UploadArgs, config: &AppConfig) -> Result<UploadOutcome> {
    let (store, settings) = config.build_store(args.local_store.as_deref())?;
    tracing::info!("🗄️ Uploading to {}", store.describe());

    let request = load_request(&args.document, args.donate).await?;
    let platform = request.platform;
    UploadEngine::new(UploadPipeline::new(store, settings, request), platform)
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DonationGroup, Platform};
    use serde_json::json;
    use tempfile::TempDir;

    const USER: &str = "c0ffee42";

    fn write_export(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("user_data.json");
        let data = json!({
            "Profile": {"Profile Information": {"ProfileMap": {"userName": "dancer", "bioDescription": "hi"}}},
            "Activity": {"Hashtag": {"HashtagList": [{"HashtagName": "fyp"}, {"HashtagName": "fyp"}]}}
        });
        std::fs::write(&path, data.to_string()).unwrap();
        path
    }

    fn document_args(file: PathBuf, acknowledged: bool) -> DocumentArgs {
        DocumentArgs {
            file,
            platform: Platform::TikTok,
            extra_keys: vec!["HashtagName".to_string()],
            user_id: Some(USER.to_string()),
            acknowledge_deletion: acknowledged,
        }
    }

    #[tokio::test]
    async fn test_list_keys() {
        let dir = TempDir::new().unwrap();
        let keys = list_keys(&write_export(&dir)).await.unwrap();
        assert!(keys.contains(&"userName".to_string()));
        assert!(keys.contains(&"HashtagList".to_string()));
    }

    #[tokio::test]
    async fn test_redact_writes_redacted_copy() {
        let dir = TempDir::new().unwrap();
        let args = RedactArgs {
            document: document_args(write_export(&dir), true),
            out: dir.path().join("out"),
        };

        let path = redact(&args, &AppConfig::default()).await.unwrap();
        assert_eq!(path, dir.path().join("out").join("c0ffee42_TikTok_user_data.json"));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let profile = &written["Profile"]["Profile Information"]["ProfileMap"];
        assert_eq!(profile["userName"], json!("REDACTED"));
        assert_eq!(profile["bioDescription"], json!("REDACTED"));
        assert_eq!(
            written["Activity"]["Hashtag"]["HashtagList"][0]["HashtagName"],
            json!("REDACTED")
        );
    }

    #[tokio::test]
    async fn test_redact_without_consent_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let args = RedactArgs {
            document: document_args(write_export(&dir), false),
            out: dir.path().join("out"),
        };

        let err = redact(&args, &AppConfig::default()).await.unwrap_err();
        assert!(matches!(err, UploaderError::ConsentRequired));
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_export_writes_zip() {
        let dir = TempDir::new().unwrap();
        let mut document = document_args(write_export(&dir), true);
        document.extra_keys.clear();
        let args = ExportArgs {
            document,
            out: Some(dir.path().join("bundle.zip")),
        };

        let (path, bytes) = export(&args, &AppConfig::default()).await.unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len() as usize, bytes);

        let archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"c0ffee42_TikTok_user_data.json"));
        assert!(names.contains(&"analytics.json"));
    }

    #[tokio::test]
    async fn test_upload_to_local_store() {
        let dir = TempDir::new().unwrap();
        let store_dir = dir.path().join("store");
        let args = UploadArgs {
            document: document_args(write_export(&dir), true),
            donate: false,
            local_store: Some(store_dir.clone()),
        };

        let outcome = upload(&args, &AppConfig::default()).await.unwrap();
        assert_eq!(outcome.receipt.group, DonationGroup::NonDonations);
        assert!(store_dir
            .join("non_donations/c0ffee42/TikTok/redacted/c0ffee42_TikTok_user_data.json")
            .exists());
    }

    #[tokio::test]
    async fn test_upload_without_drive_or_local_store() {
        let dir = TempDir::new().unwrap();
        let args = UploadArgs {
            document: document_args(write_export(&dir), true),
            donate: true,
            local_store: None,
        };

        let err = upload(&args, &AppConfig::default()).await.unwrap_err();
        assert!(matches!(err, UploaderError::DriveNotConfigured));
    }

    #[tokio::test]
    async fn test_bad_user_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut document = document_args(write_export(&dir), true);
        document.user_id = Some("../../x".to_string());

        let err = load_request(&document, false).await.unwrap_err();
        assert!(matches!(err, UploaderError::InvalidUserId { .. }));
    }

    #[test]
    fn test_default_bundle_path() {
        assert_eq!(
            default_bundle_path("0a1b2c3d_TikTok_export.json"),
            PathBuf::from("0a1b2c3d_TikTok_export.zip")
        );
        assert_eq!(default_bundle_path("data.txt"), PathBuf::from("data.txt.zip"));
    }
}
