//! Markdown job summary appended to `GITHUB_STEP_SUMMARY`.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use listing_core::ListingError;

use crate::pipeline::RunOutcome;

pub fn render_success(outcome: &RunOutcome) -> String {
    let payload = &outcome.payload;
    let mut out = String::from("## Listing submission\n\n");

    out.push_str("| Field | Value |\n|---|---|\n");
    out.push_str(&format!("| Status | `{}` |\n", outcome.status));
    out.push_str(&format!("| Manifest | `{}` |\n", outcome.manifest));
    out.push_str(&format!("| Name | {} |\n", cell(payload.name.as_deref())));
    out.push_str(&format!("| Version | {} |\n", cell(payload.version.as_deref())));
    out.push_str(&format!("| Category | {} |\n", cell(payload.category.as_deref())));
    if let Some(url) = &outcome.listing_url {
        out.push_str(&format!("| Listing | [{url}]({url}) |\n"));
    }

    if !outcome.validation.warnings.is_empty() {
        out.push_str("\n### Warnings\n\n");
        for warning in &outcome.validation.warnings {
            out.push_str(&format!("- {warning}\n"));
        }
    }

    out
}

pub fn render_failure(error: &ListingError) -> String {
    let mut out = String::from("## Listing submission\n\nStatus: `error`\n\n");
    match error {
        ListingError::Validation { errors } => {
            out.push_str("### Errors\n\n");
            for error in errors {
                out.push_str(&format!("- {error}\n"));
            }
        }
        other => out.push_str(&format!("```\n{other}\n```\n")),
    }
    out
}

fn cell(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.replace('|', "\\|"),
        _ => "_unset_".to_string(),
    }
}

/// Appends `markdown` to the job summary. Does nothing outside CI.
pub fn append(markdown: &str) -> io::Result<()> {
    match env::var_os("GITHUB_STEP_SUMMARY").filter(|path| !path.is_empty()) {
        Some(path) => append_to(Path::new(&path), markdown),
        None => Ok(()),
    }
}

fn append_to(path: &Path, markdown: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{markdown}")
}
