use crate::utils::error::{ProoferError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ProoferError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ProoferError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ProoferError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ProoferError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProoferError::ValidationError {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\A\d{4}-\d{2}-\d{2}\z").expect("static pattern"))
}

/// 空字串，或嚴格以 `YYYY-MM-DD` 表示的有效日期
pub fn validate_optional_iso_date(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }

    if !iso_date_pattern().is_match(value)
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err()
    {
        return Err(ProoferError::ValidationError {
            message: format!("{} must be empty or a YYYY-MM-DD date", field_name),
        });
    }
    Ok(())
}

pub fn validate_alphanumeric(field_name: &str, value: &str) -> Result<()> {
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ProoferError::ValidationError {
            message: format!("{} may only contain letters and digits", field_name),
        });
    }
    Ok(())
}
