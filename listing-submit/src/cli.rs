//! Command-line interface.
//!
//! Every option can also be supplied through the CI input environment
//! variable `INPUT_<NAME>` (e.g. `INPUT_API-KEY`), which is how action
//! inputs reach the process.

use std::path::PathBuf;

use clap::Parser;

use listing_core::{ListingError, PayloadOverrides, Result};
use listing_registry::DEFAULT_BASE_URL;

use crate::config::{parse_flag, parse_timeout, SubmitConfig};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "listing-submit")]
#[command(about = "Validate project metadata and sync it with the listing catalog")]
#[command(version)]
pub struct Cli {
    /// Catalog API base URL
    #[arg(long, env = "INPUT_MARKETPLACE-URL")]
    pub marketplace_url: Option<String>,

    /// Bearer token for the catalog API
    #[arg(long, env = "INPUT_API-KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory containing the project manifest
    #[arg(long, env = "INPUT_PROJECT-PATH")]
    pub project_path: Option<PathBuf>,

    /// Validate and build the payload but do not send it
    #[arg(long, env = "INPUT_DRY-RUN", num_args = 0..=1, default_missing_value = "true")]
    pub dry_run: Option<String>,

    /// Stop after validation
    #[arg(long, env = "INPUT_VALIDATE-ONLY", num_args = 0..=1, default_missing_value = "true")]
    pub validate_only: Option<String>,

    /// Update the listing with the same name instead of creating a new one (default: true)
    #[arg(long, env = "INPUT_UPDATE-EXISTING", num_args = 0..=1, default_missing_value = "true")]
    pub update_existing: Option<String>,

    /// Treat validation warnings as failures
    #[arg(long, env = "INPUT_FAIL-ON-WARNING", num_args = 0..=1, default_missing_value = "true")]
    pub fail_on_warning: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[arg(long, env = "INPUT_TIMEOUT-SECS")]
    pub timeout_secs: Option<String>,

    // Payload overrides
    /// Listing name
    #[arg(long, env = "INPUT_NAME")]
    pub name: Option<String>,

    /// Listing version (defaults to the release tag)
    #[arg(long, env = "INPUT_VERSION")]
    pub version: Option<String>,

    /// Short description
    #[arg(long, env = "INPUT_DESCRIPTION")]
    pub description: Option<String>,

    /// Long description
    #[arg(long, env = "INPUT_LONG-DESCRIPTION")]
    pub long_description: Option<String>,

    /// Catalog category
    #[arg(long, env = "INPUT_CATEGORY")]
    pub category: Option<String>,

    /// Project homepage
    #[arg(long, env = "INPUT_HOMEPAGE")]
    pub homepage: Option<String>,

    /// Source repository URL
    #[arg(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// License identifier
    #[arg(long, env = "INPUT_LICENSE")]
    pub license: Option<String>,

    /// Release notes
    #[arg(long, env = "INPUT_CHANGELOG")]
    pub changelog: Option<String>,

    /// Comma-separated tags
    #[arg(long, env = "INPUT_TAGS")]
    pub tags: Option<String>,

    /// Pricing model
    #[arg(long, env = "INPUT_PRICING")]
    pub pricing: Option<String>,

    /// Minimum supported NEAR version
    #[arg(long, env = "INPUT_MIN-NEAR-VERSION")]
    pub min_near_version: Option<String>,
}

impl Cli {
    /// Splits the inputs into run configuration and payload overrides.
    pub fn into_settings(self) -> Result<(SubmitConfig, PayloadOverrides)> {
        let marketplace_url = non_blank(self.marketplace_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let project_path = self
            .project_path
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));

        let config = SubmitConfig {
            marketplace_url,
            api_key: non_blank(self.api_key),
            project_path,
            dry_run: parse_flag("dry-run", self.dry_run.as_deref(), false)?,
            validate_only: parse_flag("validate-only", self.validate_only.as_deref(), false)?,
            update_existing: parse_flag("update-existing", self.update_existing.as_deref(), true)?,
            fail_on_warning: parse_flag("fail-on-warning", self.fail_on_warning.as_deref(), false)?,
            timeout: parse_timeout(self.timeout_secs.as_deref())?,
        };

        let overrides = PayloadOverrides {
            name: self.name,
            version: self.version,
            description: self.description,
            long_description: self.long_description,
            category: self.category,
            homepage: self.homepage,
            repository: self.repository,
            license: self.license,
            changelog: self.changelog,
            tags: self.tags,
            pricing: self.pricing,
            min_near_version: self.min_near_version,
        };

        Ok((config, overrides))
    }
}

/// Converts an argument error into the error the failure handler reports.
pub fn usage_error(err: &clap::Error) -> ListingError {
    let rendered = err.render().to_string();
    let first_line = rendered.lines().next().unwrap_or_default();
    let message = first_line.strip_prefix("error: ").unwrap_or(first_line);
    ListingError::Config(format!("invalid arguments: {message}"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let (config, overrides) = Cli::default().into_settings().unwrap();

        assert_eq!(config.marketplace_url, DEFAULT_BASE_URL);
        assert_eq!(config.project_path, PathBuf::from("."));
        assert!(!config.dry_run);
        assert!(!config.validate_only);
        assert!(config.update_existing);
        assert!(!config.fail_on_warning);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key, None);
        assert_eq!(overrides, PayloadOverrides::default());
    }

    #[test]
    fn test_flags_parse_from_arguments() {
        let cli = Cli::try_parse_from([
            "listing-submit",
            "--dry-run",
            "--update-existing",
            "false",
            "--project-path",
            "app",
            "--tags",
            "a, b",
            "--min-near-version",
            "2.0.0",
        ])
        .unwrap();
        let (config, overrides) = cli.into_settings().unwrap();

        assert!(config.dry_run);
        assert!(!config.update_existing);
        assert_eq!(config.project_path, PathBuf::from("app"));
        assert_eq!(overrides.tags.as_deref(), Some("a, b"));
        assert_eq!(overrides.min_near_version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_blank_inputs_fall_back_to_defaults() {
        let cli = Cli {
            marketplace_url: Some(String::new()),
            api_key: Some(" ".to_string()),
            project_path: Some(PathBuf::new()),
            update_existing: Some(String::new()),
            ..Default::default()
        };
        let (config, _) = cli.into_settings().unwrap();

        assert_eq!(config.marketplace_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.project_path, PathBuf::from("."));
        assert!(config.update_existing);
    }

    #[test]
    fn test_unknown_argument_becomes_config_error() {
        let err = Cli::try_parse_from(["listing-submit", "--bogus"]).unwrap_err();
        assert!(err.use_stderr());

        match usage_error(&err) {
            ListingError::Config(message) => {
                assert!(message.starts_with("invalid arguments: "), "{message}");
                assert!(message.contains("--bogus"), "{message}");
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_boolean_input_is_rejected() {
        let cli = Cli {
            fail_on_warning: Some("sometimes".to_string()),
            ..Default::default()
        };
        assert!(cli.into_settings().is_err());
    }
}
