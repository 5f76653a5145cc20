//! listing-core
//!
//! Shared domain types for the listing submission pipeline: the metadata a
//! manifest reader produces, the payload sent to the catalog, the validation
//! rules applied to it and the error taxonomy every other crate reports in.

pub mod context;
pub mod error;
pub mod metadata;
pub mod payload;
pub mod validation;

pub use context::TriggerContext;
pub use error::{ListingError, Result};
pub use metadata::ManifestMetadata;
pub use payload::{
    build_payload, split_tags, PayloadBuilder, PayloadMetadata, PayloadOverrides,
    SubmissionPayload,
};
pub use validation::{validate, ValidationResult};
