use std::path::Path;

use tracing::debug;

use listing_core::{ManifestMetadata, Result};

use crate::reader::{ManifestKind, ManifestReader};
use crate::scanner::SectionScanner;

/// Sections holding project identity, in lookup order. Poetry projects that
/// predate PEP 621 keep the same fields under `[tool.poetry]`.
const PROJECT_SECTIONS: [&str; 2] = ["project", "tool.poetry"];
const URL_SECTIONS: [&str; 2] = ["project.urls", "tool.poetry.urls"];

/// Reads `pyproject.toml`.
///
/// Never fails on content: every field is looked up on its own and left
/// out when it cannot be read.
#[derive(Debug, Default, Clone, Copy)]
pub struct PyprojectReader;

impl ManifestReader for PyprojectReader {
    fn kind(&self) -> ManifestKind {
        ManifestKind::Pyproject
    }

    fn parse(&self, content: &[u8], path: &Path) -> Result<ManifestMetadata> {
        let text = String::from_utf8_lossy(content);
        let scanner = SectionScanner::new(&text);

        let metadata = ManifestMetadata {
            name: first_string(&scanner, "name"),
            version: first_string(&scanner, "version"),
            description: first_string(&scanner, "description"),
            homepage: url(&scanner, "homepage"),
            repository: url(&scanner, "repository"),
            keywords: PROJECT_SECTIONS
                .iter()
                .find_map(|section| scanner.string_array(section, "keywords")),
            author: PROJECT_SECTIONS
                .iter()
                .find_map(|section| author(&scanner, section)),
            license: PROJECT_SECTIONS.iter().find_map(|section| {
                scanner
                    .string(section, "license")
                    .or_else(|| scanner.inline_field(section, "license", "text"))
            }),
        };

        debug!(path = %path.display(), fields = ?metadata.declared_fields(), "Scanned pyproject.toml");
        Ok(metadata)
    }
}

fn first_string(scanner: &SectionScanner<'_>, key: &str) -> Option<String> {
    PROJECT_SECTIONS
        .iter()
        .find_map(|section| scanner.string(section, key))
}

// `[project.urls]` keys are free-form; the common spelling is capitalized.
fn url(scanner: &SectionScanner<'_>, key: &str) -> Option<String> {
    URL_SECTIONS
        .iter()
        .find_map(|section| scanner.string_or_capitalized(section, key))
        .or_else(|| scanner.string("tool.poetry", key))
}

// PEP 621 authors are inline tables, Poetry authors are plain strings.
fn author(scanner: &SectionScanner<'_>, section: &str) -> Option<String> {
    scanner.inline_field(section, "authors", "name").or_else(|| {
        scanner
            .string_array(section, "authors")
            .and_then(|authors| authors.into_iter().next())
    })
}
