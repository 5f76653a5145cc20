//! # Submission Payload
//!
//! Assembles the record sent to the catalog from three sources, strictly in
//! this order of precedence:
//!
//! 1. explicit overrides supplied as action inputs
//! 2. values read from the project manifest
//! 3. computed defaults (release tag, repository URL, fixed literals)
//!
//! Assembly is a pure merge. It performs no I/O and no validation; see
//! [`crate::validation`] for the rules applied afterwards.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::context::TriggerContext;
use crate::metadata::ManifestMetadata;

pub const DEFAULT_LICENSE: &str = "MIT";
pub const DEFAULT_CATEGORY: &str = "other";
pub const DEFAULT_PRICING: &str = "free";
pub const DEFAULT_MIN_NEAR_VERSION: &str = "1.0.0";

/// Listing record synchronized with the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    pub tags: Vec<String>,
    pub pricing: String,
    pub min_near_version: String,
    pub metadata: PayloadMetadata,
}

/// Provenance block attached to every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_tag: Option<String>,
    pub submitted_at: String,
    pub submitted_via_action: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

/// Caller-supplied field values that win over anything in the manifest.
///
/// Blank values are ignored, since CI input channels report unset inputs as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadOverrides {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub license: Option<String>,
    pub changelog: Option<String>,
    /// Comma-separated tag list.
    pub tags: Option<String>,
    pub pricing: Option<String>,
    pub min_near_version: Option<String>,
}

/// Merges manifest metadata, overrides and run context into a payload.
pub struct PayloadBuilder<'a> {
    manifest: &'a ManifestMetadata,
    overrides: &'a PayloadOverrides,
    context: &'a TriggerContext,
    submitted_at: Option<DateTime<Utc>>,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(
        manifest: &'a ManifestMetadata,
        overrides: &'a PayloadOverrides,
        context: &'a TriggerContext,
    ) -> Self {
        Self {
            manifest,
            overrides,
            context,
            submitted_at: None,
        }
    }

    /// Pins the construction timestamp instead of reading the clock.
    pub fn with_timestamp(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = Some(submitted_at);
        self
    }

    pub fn build(self) -> SubmissionPayload {
        let manifest = self.manifest;
        let overrides = self.overrides;
        let context = self.context;
        let submitted_at = self.submitted_at.unwrap_or_else(Utc::now);

        let tags = match explicit(&overrides.tags) {
            Some(raw) => split_tags(&raw),
            None => manifest.keywords.clone().unwrap_or_default(),
        };

        SubmissionPayload {
            name: merge(&overrides.name, &manifest.name),
            version: merge(&overrides.version, &manifest.version)
                .or_else(|| context.release_tag()),
            description: merge(&overrides.description, &manifest.description),
            long_description: explicit(&overrides.long_description),
            category: explicit(&overrides.category).or_else(|| Some(DEFAULT_CATEGORY.to_string())),
            homepage: merge(&overrides.homepage, &manifest.homepage),
            repository: merge(&overrides.repository, &manifest.repository)
                .or_else(|| context.repository_url()),
            license: merge(&overrides.license, &manifest.license)
                .or_else(|| Some(DEFAULT_LICENSE.to_string())),
            changelog: explicit(&overrides.changelog),
            tags,
            pricing: explicit(&overrides.pricing).unwrap_or_else(|| DEFAULT_PRICING.to_string()),
            min_near_version: explicit(&overrides.min_near_version)
                .unwrap_or_else(|| DEFAULT_MIN_NEAR_VERSION.to_string()),
            metadata: PayloadMetadata {
                // A blank manifest author falls back to the actor.
                author: explicit(&manifest.author).or_else(|| context.actor.clone()),
                release_tag: context.release_tag(),
                submitted_at: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                submitted_via_action: true,
                run_id: context.run_id.clone(),
                commit_sha: context.sha.clone(),
            },
        }
    }
}

/// Builds a payload stamped with the current time.
pub fn build_payload(
    manifest: &ManifestMetadata,
    overrides: &PayloadOverrides,
    context: &TriggerContext,
) -> SubmissionPayload {
    PayloadBuilder::new(manifest, overrides, context).build()
}

/// Splits a comma-separated tag list, trimming entries and dropping empty ones.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn explicit(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

// A manifest value that is present but empty still beats the computed default.
fn merge(override_value: &Option<String>, manifest_value: &Option<String>) -> Option<String> {
    explicit(override_value).or_else(|| manifest_value.clone())
}
