use std::path::Path;

use tracing::debug;

use listing_core::{ManifestMetadata, Result};

use crate::reader::{ManifestKind, ManifestReader};
use crate::scanner::SectionScanner;

/// `[workspace.package]` supplies inherited fields for workspace roots and
/// for members using `field.workspace = true`.
const PACKAGE_SECTIONS: [&str; 2] = ["package", "workspace.package"];

/// Reads `Cargo.toml`.
///
/// Never fails on content; fields that are missing, inherited through
/// `field.workspace = true` without a `[workspace.package]` value, or not
/// plain strings are left out.
#[derive(Debug, Default, Clone, Copy)]
pub struct CargoTomlReader;

impl ManifestReader for CargoTomlReader {
    fn kind(&self) -> ManifestKind {
        ManifestKind::CargoToml
    }

    fn parse(&self, content: &[u8], path: &Path) -> Result<ManifestMetadata> {
        let text = String::from_utf8_lossy(content);
        let scanner = SectionScanner::new(&text);
        let string = |key: &str| {
            PACKAGE_SECTIONS
                .iter()
                .find_map(|section| scanner.string(section, key))
        };
        let array = |key: &str| {
            PACKAGE_SECTIONS
                .iter()
                .find_map(|section| scanner.string_array(section, key))
        };

        let metadata = ManifestMetadata {
            name: scanner.string("package", "name"),
            version: string("version"),
            description: string("description"),
            homepage: string("homepage"),
            repository: string("repository"),
            keywords: array("keywords"),
            author: array("authors").and_then(|authors| authors.into_iter().next()),
            license: string("license"),
        };

        debug!(path = %path.display(), fields = ?metadata.declared_fields(), "Scanned Cargo.toml");
        Ok(metadata)
    }
}
