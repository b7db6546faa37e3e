use crate::utils::error::{Result, UploaderError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> UploaderError {
    UploaderError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// API base URLs: absolute http(s) with a host.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    let url = Url::parse(url_str).map_err(|e| invalid(field_name, url_str, format!("not a URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("scheme '{}' is not http or https", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field_name, url_str, "URL has no host"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Drive folder ids are URL-safe tokens; anything else is a pasted URL or a typo.
pub fn validate_folder_id(field_name: &str, folder_id: &str) -> Result<()> {
    if folder_id.is_empty() {
        return Err(invalid(field_name, folder_id, "folder ID is empty"));
    }
    if !folder_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            field_name,
            folder_id,
            "folder ID may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}
