use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use listing_core::{ListingError, ManifestMetadata, Result};

use crate::field::StringOrObject;
use crate::reader::{ManifestKind, ManifestReader};

/// Reads `package.json`.
///
/// Unlike the TOML-style readers, a file that is not well-formed JSON (or
/// whose top level is not an object) is reported as
/// [`ListingError::ManifestParse`] rather than skipped. Individual fields
/// with an unexpected shape are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageJsonReader;

impl ManifestReader for PackageJsonReader {
    fn kind(&self) -> ManifestKind {
        ManifestKind::PackageJson
    }

    fn parse(&self, content: &[u8], path: &Path) -> Result<ManifestMetadata> {
        let parsed: Value =
            serde_json::from_slice(content).map_err(|e| ListingError::ManifestParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let Value::Object(object) = parsed else {
            return Err(ListingError::ManifestParse {
                path: path.to_path_buf(),
                reason: "expected a JSON object at the top level".to_string(),
            });
        };

        let metadata = ManifestMetadata {
            name: string_field(&object, "name"),
            version: string_field(&object, "version"),
            description: string_field(&object, "description"),
            homepage: string_field(&object, "homepage"),
            repository: shaped_field(&object, "repository").and_then(StringOrObject::into_url),
            keywords: object.get("keywords").and_then(Value::as_array).map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            }),
            author: shaped_field(&object, "author").and_then(StringOrObject::into_name),
            license: shaped_field(&object, "license").and_then(StringOrObject::into_kind),
        };

        debug!(path = %path.display(), fields = ?metadata.declared_fields(), "Parsed package.json");
        Ok(metadata)
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn shaped_field(object: &Map<String, Value>, key: &str) -> Option<StringOrObject> {
    object.get(key).and_then(StringOrObject::from_value)
}
