use std::path::{Path, PathBuf};

use tracing::{debug, info};

use listing_core::{ListingError, ManifestMetadata, Result};

use crate::cargo_toml::CargoTomlReader;
use crate::package_json::PackageJsonReader;
use crate::pyproject::PyprojectReader;
use crate::reader::{ManifestKind, ManifestReader};

/// Metadata together with the manifest it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub kind: ManifestKind,
    pub path: PathBuf,
    pub metadata: ManifestMetadata,
}

/// Tries manifest readers in a fixed priority order.
///
/// The first reader whose manifest is present wins; later readers are not
/// consulted, even if their manifest exists too.
pub struct MetadataResolver {
    readers: Vec<Box<dyn ManifestReader>>,
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataResolver {
    /// Resolver with the standard order: `package.json`, `pyproject.toml`,
    /// `Cargo.toml`.
    pub fn new() -> Self {
        Self::with_readers(vec![
            Box::new(PackageJsonReader),
            Box::new(PyprojectReader),
            Box::new(CargoTomlReader),
        ])
    }

    pub fn with_readers(readers: Vec<Box<dyn ManifestReader>>) -> Self {
        Self { readers }
    }

    /// Kinds in the order they are tried.
    pub fn order(&self) -> Vec<ManifestKind> {
        self.readers.iter().map(|reader| reader.kind()).collect()
    }

    pub fn resolve(&self, dir: &Path) -> Result<ResolvedManifest> {
        for reader in &self.readers {
            let kind = reader.kind();
            match reader.read(dir)? {
                Some(metadata) => {
                    info!(manifest = %kind, dir = %dir.display(), "Using project manifest");
                    return Ok(ResolvedManifest {
                        kind,
                        path: dir.join(kind.file_name()),
                        metadata,
                    });
                }
                None => debug!(manifest = %kind, "Manifest not present"),
            }
        }

        Err(ListingError::ManifestNotFound {
            dir: dir.to_path_buf(),
        })
    }
}

/// Resolves project metadata with the standard reader order.
pub fn resolve(dir: &Path) -> Result<ResolvedManifest> {
    MetadataResolver::new().resolve(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    /// Test fixture for creating temporary project directories
    struct ProjectTestFixture {
        _temp_dir: TempDir,
        project_dir: PathBuf,
    }

    impl ProjectTestFixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let project_dir = temp_dir.path().to_path_buf();
            Self {
                _temp_dir: temp_dir,
                project_dir,
            }
        }

        fn create_file(&self, name: &str, content: &str) {
            fs::write(self.project_dir.join(name), content).unwrap();
        }

        fn path(&self) -> &Path {
            &self.project_dir
        }
    }

    const PACKAGE_JSON: &str = r#"{ "name": "from-npm", "version": "1.0.0" }"#;
    const PYPROJECT: &str = "[project]\nname = \"from-python\"\nversion = \"2.0.0\"\n";
    const CARGO_TOML: &str = "[package]\nname = \"from-cargo\"\nversion = \"3.0.0\"\n";

    #[test]
    fn test_empty_directory_is_not_found() {
        let fixture = ProjectTestFixture::new();
        let err = resolve(fixture.path()).unwrap_err();
        assert!(matches!(err, ListingError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let fixture = ProjectTestFixture::new();
        let err = resolve(&fixture.path().join("nope")).unwrap_err();
        assert!(matches!(err, ListingError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_package_json_wins_over_everything() {
        let fixture = ProjectTestFixture::new();
        fixture.create_file("Cargo.toml", CARGO_TOML);
        fixture.create_file("pyproject.toml", PYPROJECT);
        fixture.create_file("package.json", PACKAGE_JSON);

        let resolved = resolve(fixture.path()).unwrap();
        assert_eq!(resolved.kind, ManifestKind::PackageJson);
        assert_eq!(resolved.metadata.name.as_deref(), Some("from-npm"));
        assert_eq!(resolved.path, fixture.path().join("package.json"));
    }

    #[test]
    fn test_priority_ignores_modification_times() {
        let fixture = ProjectTestFixture::new();
        fixture.create_file("package.json", PACKAGE_JSON);
        fixture.create_file("Cargo.toml", CARGO_TOML);

        let older = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(fixture.path().join("package.json"))
            .unwrap()
            .set_modified(older)
            .unwrap();

        let resolved = resolve(fixture.path()).unwrap();
        assert_eq!(resolved.kind, ManifestKind::PackageJson);
    }

    #[test]
    fn test_pyproject_wins_over_cargo() {
        let fixture = ProjectTestFixture::new();
        fixture.create_file("Cargo.toml", CARGO_TOML);
        fixture.create_file("pyproject.toml", PYPROJECT);

        let resolved = resolve(fixture.path()).unwrap();
        assert_eq!(resolved.kind, ManifestKind::Pyproject);
        assert_eq!(resolved.metadata.version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_cargo_is_the_last_resort() {
        let fixture = ProjectTestFixture::new();
        fixture.create_file("Cargo.toml", CARGO_TOML);

        let resolved = resolve(fixture.path()).unwrap();
        assert_eq!(resolved.kind, ManifestKind::CargoToml);
        assert_eq!(resolved.metadata.name.as_deref(), Some("from-cargo"));
    }

    #[test]
    fn test_broken_package_json_does_not_fall_through() {
        let fixture = ProjectTestFixture::new();
        fixture.create_file("package.json", "{ not json");
        fixture.create_file("Cargo.toml", CARGO_TOML);

        let err = resolve(fixture.path()).unwrap_err();
        assert!(matches!(err, ListingError::ManifestParse { .. }));
    }

    #[test]
    fn test_directory_named_like_manifest_is_ignored() {
        let fixture = ProjectTestFixture::new();
        fs::create_dir(fixture.path().join("package.json")).unwrap();
        fixture.create_file("Cargo.toml", CARGO_TOML);

        let resolved = resolve(fixture.path()).unwrap();
        assert_eq!(resolved.kind, ManifestKind::CargoToml);
    }

    #[test]
    fn test_standard_order() {
        assert_eq!(
            MetadataResolver::new().order(),
            vec![
                ManifestKind::PackageJson,
                ManifestKind::Pyproject,
                ManifestKind::CargoToml
            ]
        );
    }
}
