//! listing-registry
//!
//! Client for the remote listing catalog. A run performs at most two
//! requests: a lookup of an existing listing by name, then a create (`POST`)
//! or update (`PUT`) carrying the full payload.
//!
//! The two requests fail differently. A failed lookup is absorbed and
//! treated as "no existing listing" ([`FailureMode::FailOpen`]); a failed
//! submission is always surfaced, after at most one bounded retry for
//! transient failures ([`RetryPolicy`]).

pub mod client;
pub mod policy;
pub mod transport;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use client::{
    extract_error_detail, listing_url, ListingId, RegistryClient, RegistryConfig, RemoteResult,
    SubmissionStatus, DEFAULT_BASE_URL, USER_AGENT,
};
pub use policy::{FailureMode, RetryPolicy};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};
