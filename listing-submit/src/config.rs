//! Run configuration resolved from action inputs.

use std::path::PathBuf;
use std::time::Duration;

use listing_core::{ListingError, Result};
use listing_registry::RegistryConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What the run does once the payload has been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Stop after validation.
    ValidateOnly,
    /// Log the payload that would be sent, without sending it.
    DryRun,
    /// Look up and create or update the listing.
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitConfig {
    pub marketplace_url: String,
    pub api_key: Option<String>,
    pub project_path: PathBuf,
    pub dry_run: bool,
    pub validate_only: bool,
    pub update_existing: bool,
    pub fail_on_warning: bool,
    pub timeout: Duration,
}

impl SubmitConfig {
    pub fn new(marketplace_url: impl Into<String>, project_path: impl Into<PathBuf>) -> Self {
        Self {
            marketplace_url: marketplace_url.into(),
            api_key: None,
            project_path: project_path.into(),
            dry_run: false,
            validate_only: false,
            update_existing: true,
            fail_on_warning: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// `validate-only` takes precedence over `dry-run`.
    pub fn mode(&self) -> RunMode {
        if self.validate_only {
            RunMode::ValidateOnly
        } else if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Submit
        }
    }

    /// Registry settings for a submitting run. The API key is only required
    /// here, so validation and dry runs work without credentials.
    pub fn registry_config(&self) -> Result<RegistryConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ListingError::Config("the 'api-key' input is required to submit a listing".into())
            })?;
        Ok(RegistryConfig::new(
            self.marketplace_url.trim(),
            api_key,
        ))
    }
}

/// Interprets a boolean action input. Unset and blank inputs take `default`.
pub fn parse_flag(name: &str, value: Option<&str>, default: bool) -> Result<bool> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(default);
    };

    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Ok(true),
        "false" | "no" | "n" | "0" | "off" => Ok(false),
        _ => Err(ListingError::Config(format!(
            "input '{name}' must be a boolean (true/false), got '{value}'"
        ))),
    }
}

/// Interprets the `timeout-secs` input.
pub fn parse_timeout(value: Option<&str>) -> Result<Duration> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    };

    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ListingError::Config(format!(
            "input 'timeout-secs' must be a positive number of seconds, got '{value}'"
        ))),
    }
}
