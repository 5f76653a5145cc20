//! End-to-end run: resolve, build, validate, then submit according to the
//! run mode.

use std::fmt;

use tracing::{info, warn};

use listing_core::{
    validate, ListingError, PayloadBuilder, PayloadOverrides, Result, SubmissionPayload,
    TriggerContext, ValidationResult,
};
use listing_manifest::{ManifestKind, MetadataResolver};
use listing_registry::{
    listing_url, HttpTransport, ListingId, RegistryClient, ReqwestTransport, SubmissionStatus,
};

use crate::config::{RunMode, SubmitConfig};

/// Final state of a run, reported through the `status` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Validated,
    DryRun,
    Created,
    Updated,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Validated => "validated",
            RunStatus::DryRun => "dry-run",
            RunStatus::Created => "created",
            RunStatus::Updated => "updated",
            RunStatus::Error => "error",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SubmissionStatus> for RunStatus {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Created => RunStatus::Created,
            SubmissionStatus::Updated => RunStatus::Updated,
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub manifest: ManifestKind,
    pub payload: SubmissionPayload,
    pub validation: ValidationResult,
    pub listing_id: Option<ListingId>,
    pub listing_url: Option<String>,
}

pub struct Pipeline<'a> {
    config: &'a SubmitConfig,
    overrides: &'a PayloadOverrides,
    context: &'a TriggerContext,
    resolver: MetadataResolver,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a SubmitConfig,
        overrides: &'a PayloadOverrides,
        context: &'a TriggerContext,
    ) -> Self {
        Self {
            config,
            overrides,
            context,
            resolver: MetadataResolver::new(),
        }
    }

    /// Runs against the live registry over HTTPS.
    pub fn run(&self) -> Result<RunOutcome> {
        let timeout = self.config.timeout;
        self.run_with(|| ReqwestTransport::new(timeout))
    }

    /// Runs with a caller-supplied transport. `connect` is only called when
    /// the run actually submits.
    pub fn run_with<T, F>(&self, connect: F) -> Result<RunOutcome>
    where
        T: HttpTransport,
        F: FnOnce() -> Result<T>,
    {
        let resolved = self.resolver.resolve(&self.config.project_path)?;
        let payload = PayloadBuilder::new(&resolved.metadata, self.overrides, self.context).build();

        let validation = validate(&payload);
        for warning in &validation.warnings {
            warn!("{warning}");
        }
        if !validation.is_valid() {
            return Err(ListingError::Validation {
                errors: validation.errors,
            });
        }
        if self.config.fail_on_warning && validation.has_warnings() {
            return Err(ListingError::Warnings {
                count: validation.warnings.len(),
            });
        }
        info!(
            name = payload.name.as_deref().unwrap_or_default(),
            version = payload.version.as_deref().unwrap_or_default(),
            warnings = validation.warnings.len(),
            "Validation passed"
        );

        let mut outcome = RunOutcome {
            status: RunStatus::Validated,
            manifest: resolved.kind,
            payload,
            validation,
            listing_id: None,
            listing_url: None,
        };

        match self.config.mode() {
            RunMode::ValidateOnly => {
                info!("Validate-only mode, skipping submission");
            }
            RunMode::DryRun => {
                let rendered = serde_json::to_string_pretty(&outcome.payload)?;
                info!("Dry run, payload that would be submitted:\n{rendered}");
                outcome.status = RunStatus::DryRun;
            }
            RunMode::Submit => {
                let registry = self.config.registry_config()?;
                let base_url = registry.base_url.clone();
                let client = RegistryClient::new(registry, connect()?);

                let result = client.upsert(&outcome.payload, self.config.update_existing)?;
                outcome.status = result.status.into();
                outcome.listing_url = Some(listing_url(&base_url, &result.id));
                outcome.listing_id = Some(result.id);
            }
        }

        Ok(outcome)
    }
}
