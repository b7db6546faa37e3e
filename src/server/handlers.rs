use super::SharedState;
use crate::core::document::decode_upload;
use crate::core::engine::{UploadEngine, UploadOutcome};
use crate::core::keys::extract_keys;
use crate::core::pipeline::UploadPipeline;
use crate::domain::model::{AnonymousId, Platform, UploadRequest};
use crate::utils::error::{ErrorCategory, UploaderError};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

const INDEX_HTML: &str = include_str!("index.html");
const DEFAULT_FILE_NAME: &str = "upload.json";

/// Error envelope returned by every API route.
#[derive(Debug)]
pub struct ApiError(pub UploaderError);

impl From<UploaderError> for ApiError {
    fn from(e: UploaderError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.category() {
            ErrorCategory::Input => StatusCode::BAD_REQUEST,
            ErrorCategory::Configuration => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::Network | ErrorCategory::Storage | ErrorCategory::Auth => {
                StatusCode::BAD_GATEWAY
            }
            ErrorCategory::Processing | ErrorCategory::System => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {} ({:?})", self.0, self.0.category());
        } else {
            tracing::warn!("⚠️ Rejected request: {}", self.0);
        }

        let body = json!({
            "error": {
                "category": format!("{:?}", self.0.category()).to_lowercase(),
                "message": self.0.user_friendly_message(),
                "detail": self.0.to_string(),
                "suggestion": self.0.recovery_suggestion(),
            }
        });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct KeysBody {
    pub content: String,
}

/// One submitted export, as sent by the upload page.
#[derive(Debug, Deserialize)]
pub struct UploadBody {
    pub user_id: String,
    pub platform: String,
    #[serde(default)]
    pub file_name: String,
    pub content: String,
    #[serde(default)]
    pub donate: bool,
    #[serde(default)]
    pub acknowledged_deletion: bool,
    #[serde(default)]
    pub extra_keys: Vec<String>,
}

impl UploadBody {
    fn into_request(self) -> Result<UploadRequest, UploaderError> {
        let extra_keys = self
            .extra_keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(UploadRequest {
            user_id: AnonymousId::parse(self.user_id.trim())?,
            platform: self.platform.parse()?,
            file_name: base_name(&self.file_name),
            content: self.content.into_bytes(),
            donate: self.donate,
            acknowledged_deletion: self.acknowledged_deletion,
            extra_keys,
        })
    }
}

/// Last path component of a browser-supplied file name.
fn base_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." {
        DEFAULT_FILE_NAME.to_string()
    } else {
        base.to_string()
    }
}

fn engine(
    state: &SharedState,
    request: UploadRequest,
) -> UploadEngine<UploadPipeline<crate::adapters::StoreBackend, crate::config::UploadSettings>> {
    let platform = request.platform;
    let pipeline = UploadPipeline::new(state.store.clone(), state.settings.clone(), request);
    UploadEngine::new(pipeline, platform)
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn platforms() -> Json<Vec<&'static str>> {
    Json(Platform::ALL.iter().map(|p| p.as_str()).collect())
}

pub async fn session() -> Json<Value> {
    let id = AnonymousId::generate();
    tracing::info!("🆔 Issued anonymous ID {}", id);
    Json(json!({"user_id": id}))
}

pub async fn keys(Json(body): Json<KeysBody>) -> ApiResult<Value> {
    let data = decode_upload(body.content.as_bytes())?;
    let keys: Vec<String> = extract_keys(&data).into_iter().collect();
    Ok(Json(json!({"keys": keys})))
}

pub async fn preview(State(state): State<SharedState>, Json(body): Json<UploadBody>) -> ApiResult<Value> {
    let request = body.into_request()?;
    let document = engine(&state, request).preview().await?;
    Ok(Json(json!({
        "file_name": document.file_name,
        "redacted": document.data,
    })))
}

/// The redacted copy as a file attachment.
pub async fn download(
    State(state): State<SharedState>,
    Json(body): Json<UploadBody>,
) -> Result<Response, ApiError> {
    let request = body.into_request()?;
    let document = engine(&state, request).preview().await?;
    let content = document.to_pretty_json()?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment_name(&document.file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}

/// File names are quoted in `Content-Disposition`; quotes, backslashes and controls would break it.
fn attachment_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

pub async fn finalize(
    State(state): State<SharedState>,
    Json(body): Json<UploadBody>,
) -> ApiResult<UploadOutcome> {
    let request = body.into_request()?;
    let outcome = engine(&state, request).run().await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("export.json"), "export.json");
        assert_eq!(base_name("C:\\Users\\me\\export.json"), "export.json");
        assert_eq!(base_name("../../etc/passwd"), "passwd");
        assert_eq!(base_name(""), "upload.json");
        assert_eq!(base_name("dir/.."), "upload.json");
    }

    #[test]
    fn test_attachment_name() {
        assert_eq!(attachment_name("a_TikTok_x.json"), "a_TikTok_x.json");
        assert_eq!(attachment_name("say \"hi\".json"), "say _hi_.json");
        assert_eq!(attachment_name("line\nbreak.json"), "line_break.json");
    }

    #[test]
    fn test_error_status() {
        assert_eq!(ApiError(UploaderError::ConsentRequired).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError(UploaderError::DriveNotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(UploaderError::DriveApiError {
                status: 500,
                message: "backend".to_string()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upload_body_rejects_bad_id() {
        let body = UploadBody {
            user_id: "../admin".to_string(),
            platform: "TikTok".to_string(),
            file_name: "x.json".to_string(),
            content: "{}".to_string(),
            donate: false,
            acknowledged_deletion: true,
            extra_keys: vec![],
        };
        assert!(matches!(body.into_request(), Err(UploaderError::InvalidUserId { .. })));
    }
}
