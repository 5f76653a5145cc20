//! listing-manifest
//!
//! Detects which package manifest a project ships and extracts listing
//! metadata from it. Three formats are understood, tried in this order:
//!
//! 1. `package.json`: parsed as JSON, a malformed file is an error
//! 2. `pyproject.toml`: best-effort line scanning of `[project]`
//! 3. `Cargo.toml`: best-effort line scanning of `[package]`
//!
//! The TOML-style formats are not run through a full parser:
//! each field is extracted on its own and a field that cannot be read is
//! simply left out.

pub mod cargo_toml;
pub mod field;
pub mod package_json;
pub mod pyproject;
pub mod reader;
pub mod resolver;
pub mod scanner;

pub use cargo_toml::CargoTomlReader;
pub use field::StringOrObject;
pub use package_json::PackageJsonReader;
pub use pyproject::PyprojectReader;
pub use reader::{ManifestKind, ManifestReader};
pub use resolver::{resolve, MetadataResolver, ResolvedManifest};
pub use scanner::SectionScanner;
