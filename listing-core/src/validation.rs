use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::payload::SubmissionPayload;

/// Leading `MAJOR.MINOR` of a semantic version.
static SEMVER_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\d+").expect("Semver prefix regex should compile - this is a static pattern")
});

/// Outcome of checking a payload. Errors block submission, warnings do not.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn add_error(&mut self, msg: String) {
        self.errors.push(msg);
    }

    pub fn add_warning(&mut self, msg: String) {
        self.warnings.push(msg);
    }

    /// Returns `true` if the payload may be submitted.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "❌ {}", error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "⚠️  {}", warning)?;
        }
        Ok(())
    }
}

/// A required field together with the input that overrides it and the
/// manifest key that supplies it.
struct RequiredField {
    field: &'static str,
    input: &'static str,
    manifest_hint: &'static str,
}

const REQUIRED_FIELDS: [RequiredField; 5] = [
    RequiredField {
        field: "name",
        input: "name",
        manifest_hint: "`name` in package.json, pyproject.toml or Cargo.toml",
    },
    RequiredField {
        field: "version",
        input: "version",
        manifest_hint: "`version` in your manifest, or trigger the run from a release tag",
    },
    RequiredField {
        field: "description",
        input: "description",
        manifest_hint: "`description` in package.json, pyproject.toml or Cargo.toml",
    },
    RequiredField {
        field: "category",
        input: "category",
        manifest_hint: "a category in your workflow configuration",
    },
    RequiredField {
        field: "repository",
        input: "repository",
        manifest_hint: "`repository` in your manifest",
    },
];

const OPTIONAL_FIELDS: [&str; 4] = ["homepage", "long_description", "changelog", "license"];

fn required_value<'p>(payload: &'p SubmissionPayload, field: &str) -> Option<&'p str> {
    match field {
        "name" => payload.name.as_deref(),
        "version" => payload.version.as_deref(),
        "description" => payload.description.as_deref(),
        "category" => payload.category.as_deref(),
        "repository" => payload.repository.as_deref(),
        _ => None,
    }
}

fn optional_value<'p>(payload: &'p SubmissionPayload, field: &str) -> Option<&'p str> {
    match field {
        "homepage" => payload.homepage.as_deref(),
        "long_description" => payload.long_description.as_deref(),
        "changelog" => payload.changelog.as_deref(),
        "license" => payload.license.as_deref(),
        _ => None,
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Returns `true` if the version starts with `<digits>.<digits>`.
pub fn looks_like_semver(version: &str) -> bool {
    SEMVER_PREFIX_REGEX.is_match(version)
}

/// Checks a payload against the required and optional field rules.
///
/// Pure and deterministic: the same payload always yields the same lists.
pub fn validate(payload: &SubmissionPayload) -> ValidationResult {
    let mut result = ValidationResult::default();

    for required in &REQUIRED_FIELDS {
        if is_blank(required_value(payload, required.field)) {
            result.add_error(format!(
                "Missing required field '{}'. Set the '{}' input or provide {}.",
                required.field, required.input, required.manifest_hint
            ));
        }
    }

    for field in OPTIONAL_FIELDS {
        if is_blank(optional_value(payload, field)) {
            result.add_warning(format!("Optional field '{}' is not set.", field));
        }
    }

    if let Some(version) = payload.version.as_deref() {
        if !version.trim().is_empty() && !looks_like_semver(version) {
            result.add_warning(format!(
                "Version '{}' does not look like a semantic version (expected MAJOR.MINOR[.PATCH]).",
                version
            ));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PayloadMetadata;
    use pretty_assertions::assert_eq;

    fn complete_payload() -> SubmissionPayload {
        SubmissionPayload {
            name: Some("widget".to_string()),
            version: Some("1.2.3".to_string()),
            description: Some("Widgets".to_string()),
            long_description: Some("Widgets, at length".to_string()),
            category: Some("tools".to_string()),
            homepage: Some("https://widget.dev".to_string()),
            repository: Some("https://github.com/acme/widget".to_string()),
            license: Some("MIT".to_string()),
            changelog: Some("Initial release".to_string()),
            tags: vec!["tools".to_string()],
            pricing: "free".to_string(),
            min_near_version: "1.0.0".to_string(),
            metadata: PayloadMetadata {
                author: Some("Ada".to_string()),
                release_tag: Some("1.2.3".to_string()),
                submitted_at: "2026-01-01T00:00:00.000Z".to_string(),
                submitted_via_action: true,
                run_id: None,
                commit_sha: None,
            },
        }
    }

    fn clear_required(payload: &mut SubmissionPayload, field: &str) {
        match field {
            "name" => payload.name = None,
            "version" => payload.version = Some("  ".to_string()),
            "description" => payload.description = Some(String::new()),
            "category" => payload.category = None,
            "repository" => payload.repository = None,
            other => panic!("unknown field {other}"),
        }
    }

    #[test]
    fn test_complete_payload_is_clean() {
        let result = validate(&complete_payload());
        assert!(result.is_valid());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_each_missing_required_field_reports_exactly_one_error() {
        for required in &REQUIRED_FIELDS {
            let mut payload = complete_payload();
            clear_required(&mut payload, required.field);

            let result = validate(&payload);
            assert_eq!(result.errors.len(), 1, "field {}", required.field);
            assert!(result.errors[0].contains(&format!("'{}'", required.field)));
            assert!(result.errors[0].contains("input"));
            assert!(result.warnings.is_empty(), "field {}", required.field);
        }
    }

    #[test]
    fn test_missing_optional_fields_warn_but_do_not_block() {
        let mut payload = complete_payload();
        payload.homepage = None;
        payload.changelog = Some(" ".to_string());

        let result = validate(&payload);
        assert!(result.is_valid());
        assert_eq!(
            result.warnings,
            vec![
                "Optional field 'homepage' is not set.".to_string(),
                "Optional field 'changelog' is not set.".to_string(),
            ]
        );
    }

    #[test]
    fn test_semver_heuristic() {
        for version in ["1.2", "2.1.0-beta.1", "10.0.0", "0.1.0+build"] {
            assert!(looks_like_semver(version), "{version}");
        }
        for version in ["latest", "v1.2.0", "1", ".1.2"] {
            assert!(!looks_like_semver(version), "{version}");
        }

        let mut payload = complete_payload();
        payload.version = Some("latest".to_string());
        let result = validate(&payload);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("'latest'"));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut payload = complete_payload();
        payload.name = None;
        payload.version = Some("nightly".to_string());
        payload.license = None;

        assert_eq!(validate(&payload), validate(&payload));
    }

    #[test]
    fn test_display_marks_errors_and_warnings() {
        let result = ValidationResult {
            errors: vec!["bad".to_string()],
            warnings: vec!["meh".to_string()],
        };
        assert_eq!(result.to_string(), "❌ bad\n⚠️  meh\n");
    }
}
