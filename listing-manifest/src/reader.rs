use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use listing_core::{ListingError, ManifestMetadata, Result};

/// Supported manifest formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    PackageJson,
    Pyproject,
    CargoToml,
}

impl ManifestKind {
    /// File name the format lives in at the project root.
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::PackageJson => "package.json",
            ManifestKind::Pyproject => "pyproject.toml",
            ManifestKind::CargoToml => "Cargo.toml",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A format-specific metadata extractor.
///
/// `read` distinguishes three outcomes: `Ok(None)` when the manifest is not
/// there, `Ok(Some(_))` when it is, and `Err(_)` only when the file exists
/// but cannot be used at all.
pub trait ManifestReader {
    fn kind(&self) -> ManifestKind;

    /// Returns `true` if the project directory contains this manifest.
    fn detect(&self, dir: &Path) -> bool {
        dir.join(self.kind().file_name()).is_file()
    }

    /// Extracts metadata from the raw manifest bytes.
    fn parse(&self, content: &[u8], path: &Path) -> Result<ManifestMetadata>;

    fn read(&self, dir: &Path) -> Result<Option<ManifestMetadata>> {
        if !self.detect(dir) {
            return Ok(None);
        }

        let path = dir.join(self.kind().file_name());
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ListingError::Io { path, source }),
        };

        self.parse(&content, &path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_file_names() {
        assert_eq!(ManifestKind::PackageJson.file_name(), "package.json");
        assert_eq!(ManifestKind::Pyproject.to_string(), "pyproject.toml");
        assert_eq!(ManifestKind::CargoToml.to_string(), "Cargo.toml");
    }
}
