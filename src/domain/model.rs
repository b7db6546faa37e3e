use crate::utils::error::{Result, UploaderError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const REDACTED: &str = "REDACTED";

/// Social platforms whose data exports we know how to redact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    TikTok,
    Instagram,
    Facebook,
    Twitter,
    Reddit,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::TikTok,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Twitter,
        Platform::Reddit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
            Platform::Reddit => "Reddit",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UploaderError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UploaderError::UnknownPlatform {
                name: s.to_string(),
            })
    }
}

/// Top-level Drive folder an upload lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationGroup {
    ResearchDonations,
    NonDonations,
}

impl DonationGroup {
    pub fn from_choice(donate: bool) -> Self {
        if donate {
            DonationGroup::ResearchDonations
        } else {
            DonationGroup::NonDonations
        }
    }

    pub fn folder_name(&self) -> &'static str {
        match self {
            DonationGroup::ResearchDonations => "research_donations",
            DonationGroup::NonDonations => "non_donations",
        }
    }
}

/// Eight lowercase hex characters identifying a participant without naming them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnonymousId(String);

impl AnonymousId {
    pub fn generate() -> Self {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        Self(simple[..8].to_string())
    }

    pub fn parse(value: &str) -> Result<Self> {
        let valid = value.len() == 8
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(UploaderError::InvalidUserId {
                value: value.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnonymousId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AnonymousId {
    type Error = UploaderError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<AnonymousId> for String {
    fn from(id: AnonymousId) -> Self {
        id.0
    }
}

/// Everything a participant submits for one export.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub user_id: AnonymousId,
    pub platform: Platform,
    pub file_name: String,
    pub content: Vec<u8>,
    pub donate: bool,
    pub acknowledged_deletion: bool,
    pub extra_keys: Vec<String>,
}

impl UploadRequest {
    pub fn group(&self) -> DonationGroup {
        DonationGroup::from_choice(self.donate)
    }

    /// `{user}_{platform}_{original}` with a doubled `.json` extension collapsed.
    pub fn output_file_name(&self) -> String {
        format!("{}_{}_{}", self.user_id, self.platform, self.file_name)
            .replace(".json.json", ".json")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RedactedDocument {
    pub platform: Platform,
    pub file_name: String,
    pub data: serde_json::Value,
}

impl RedactedDocument {
    /// Two-space indented JSON, the form that is downloaded and uploaded.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadReceipt {
    pub file_id: String,
    pub folder_id: String,
    pub group: DonationGroup,
    pub file_name: String,
    pub bytes: usize,
}
