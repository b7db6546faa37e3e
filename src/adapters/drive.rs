use crate::adapters::auth::TokenSource;
use crate::core::FolderStore;
use crate::utils::error::{Result, UploaderError};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Debug, Deserialize)]
struct FileRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: String,
}

/// Google Drive v3 over REST.
#[derive(Debug, Clone)]
pub struct DriveStore {
    client: Client,
    api_base: String,
    upload_base: String,
    auth: Arc<TokenSource>,
}

impl DriveStore {
    pub fn new(api_base: &str, upload_base: &str, auth: TokenSource) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
            auth: Arc::new(auth),
        }
    }

    async fn bearer(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.auth.access_token().await?))
    }
}

/// Quote a value for a Drive `q` string literal.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn folder_query(name: &str, parent: &str) -> String {
    format!(
        "mimeType='{}' and name='{}' and '{}' in parents",
        FOLDER_MIME,
        escape_query_value(name),
        escape_query_value(parent)
    )
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    tracing::warn!("Drive API error {}: {}", status.as_u16(), message);
    Err(UploaderError::DriveApiError {
        status: status.as_u16(),
        message,
    })
}

/// A `multipart/related` body: metadata JSON part, then the media part.
fn related_body(boundary: &str, metadata: &serde_json::Value, data: &[u8], mime_type: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n--{boundary}\r\nContent-Type: {mime_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

impl FolderStore for DriveStore {
    async fn find_folder(&self, name: &str, parent: &str) -> Result<Option<String>> {
        let url = format!("{}/files", self.api_base);
        let query = folder_query(name, parent);
        tracing::debug!("Drive lookup: {}", query);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.bearer().await?)
            .query(&[("q", query.as_str()), ("fields", "files(id)")])
            .send()
            .await?;

        let list: FileList = check(response).await?.json().await?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    async fn create_folder(&self, name: &str, parent: &str) -> Result<String> {
        let url = format!("{}/files", self.api_base);
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
            "parents": [parent],
        });

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.bearer().await?)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await?;

        let created: FileRef = check(response).await?.json().await?;
        Ok(created.id)
    }

    async fn upload_file(&self, name: &str, parent: &str, data: &[u8], mime_type: &str) -> Result<String> {
        let url = format!("{}/files", self.upload_base);
        let boundary = format!("social-uploader-{}", uuid::Uuid::new_v4().simple());
        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent],
        });

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.bearer().await?)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .body(related_body(&boundary, &metadata, data, mime_type))
            .send()
            .await?;

        let uploaded: FileRef = check(response).await?.json().await?;
        Ok(uploaded.id)
    }
}
