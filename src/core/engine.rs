use crate::core::analytics::{self, AnalyticsReport};
use crate::core::{Pipeline, RedactedDocument, UploadReceipt};
use crate::domain::model::Platform;
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub receipt: UploadReceipt,
    pub analytics: AnalyticsReport,
}

pub struct UploadEngine<P: Pipeline> {
    pipeline: P,
    platform: Platform,
}

impl<P: Pipeline> UploadEngine<P> {
    pub fn new(pipeline: P, platform: Platform) -> Self {
        Self { pipeline, platform }
    }

    /// Decode and redact without touching the store.
    pub async fn preview(&self) -> Result<RedactedDocument> {
        tracing::info!("🔍 Decoding {} export...", self.platform);
        let raw = self.pipeline.extract().await?;

        tracing::info!("🛡️ Redacting...");
        let document = self.pipeline.transform(raw).await?;
        tracing::info!("✅ Redacted document ready: {}", document.file_name);
        Ok(document)
    }

    pub async fn run(&self) -> Result<UploadOutcome> {
        tracing::info!("🚀 Starting upload");

        let document = self.preview().await?;
        let analytics = analytics::analyze(self.platform, &document.data);

        tracing::info!("☁️ Uploading...");
        let receipt = self.pipeline.load(document).await?;
        tracing::info!(
            "✅ Uploaded {} ({} bytes) as {}",
            receipt.file_name,
            receipt.bytes,
            receipt.file_id
        );

        Ok(UploadOutcome { receipt, analytics })
    }
}
