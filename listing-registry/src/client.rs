use std::fmt;
use std::thread;

use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use listing_core::{ListingError, Result, SubmissionPayload};

use crate::policy::{FailureMode, RetryPolicy};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

pub const DEFAULT_BASE_URL: &str = "https://market.near.ai/v1";
pub const USER_AGENT: &str = concat!("listing-submit/", env!("CARGO_PKG_VERSION"));

const ERROR_SNIPPET_CHARS: usize = 200;

/// Connection settings and per-operation failure policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Catalog API base, conventionally ending in `/v1`.
    pub base_url: String,
    pub api_key: String,
    pub lookup_failure: FailureMode,
    pub submit_retry: RetryPolicy,
}

impl RegistryConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            lookup_failure: FailureMode::FailOpen,
            submit_retry: RetryPolicy::default(),
        }
    }
}

/// Opaque registry identifier of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Created,
    Updated,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Created => "created",
            SubmissionStatus::Updated => "updated",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResult {
    pub id: ListingId,
    pub status: SubmissionStatus,
    pub body: Value,
}

/// Upsert-oriented client for the listing catalog.
pub struct RegistryClient<T: HttpTransport> {
    config: RegistryConfig,
    transport: T,
}

impl<T: HttpTransport> RegistryClient<T> {
    pub fn new(config: RegistryConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Looks up an existing listing by exact name.
    ///
    /// Failures are handled by [`RegistryConfig::lookup_failure`]; with the
    /// default fail-open policy any error yields `Ok(None)`.
    pub fn find_by_name(&self, name: &str) -> Result<Option<ListingId>> {
        let result = self.query_by_name(name);
        self.config.lookup_failure.absorb("lookup", result)
    }

    fn query_by_name(&self, name: &str) -> Result<Option<ListingId>> {
        let mut url = self.endpoint(&["listings"])?;
        url.query_pairs_mut().append_pair("name", name);

        let request = self.request(HttpMethod::Get, url.as_str());
        let response = self.transport.send(&request)?;
        if !response.is_success() {
            return Err(remote_error(&response));
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|e| {
            ListingError::UnexpectedResponse(format!("listing query returned invalid JSON: {e}"))
        })?;
        let data = body.get("data").and_then(Value::as_array).ok_or_else(|| {
            ListingError::UnexpectedResponse("listing query response has no `data` array".into())
        })?;

        match data.first() {
            None => {
                debug!(name, "No existing listing");
                Ok(None)
            }
            Some(first) => {
                let id = id_of(first).ok_or_else(|| {
                    ListingError::UnexpectedResponse("matching listing has no `id`".into())
                })?;
                info!(name, id = %id, "Found existing listing");
                Ok(Some(id))
            }
        }
    }

    /// Sends the full payload as an update of `existing`, or as a create
    /// when there is no existing listing. Always fails closed.
    pub fn submit(
        &self,
        payload: &SubmissionPayload,
        existing: Option<&ListingId>,
    ) -> Result<RemoteResult> {
        let (method, url, status) = match existing {
            Some(id) => (
                HttpMethod::Put,
                self.endpoint(&["listings", id.as_str()])?,
                SubmissionStatus::Updated,
            ),
            None => (
                HttpMethod::Post,
                self.endpoint(&["listings"])?,
                SubmissionStatus::Created,
            ),
        };

        let body = serde_json::to_string(payload)?;
        let request = self.request(method, url.as_str()).json_body(body);
        let response = self.send_with_retry(&request, status)?;

        let body: Value = if response.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response.body).map_err(|e| {
                ListingError::UnexpectedResponse(format!("submission returned invalid JSON: {e}"))
            })?
        };

        let id = id_of(&body)
            .or_else(|| body.get("data").and_then(id_of))
            .or_else(|| existing.cloned())
            .ok_or_else(|| {
                ListingError::UnexpectedResponse("submission response has no listing `id`".into())
            })?;

        info!(id = %id, status = %status, "Listing submitted");
        Ok(RemoteResult { id, status, body })
    }

    /// Lookup (when enabled) followed by create or update.
    pub fn upsert(&self, payload: &SubmissionPayload, update_existing: bool) -> Result<RemoteResult> {
        let existing = match (update_existing, payload.name.as_deref()) {
            (true, Some(name)) => self.find_by_name(name)?,
            (true, None) => None,
            (false, _) => {
                debug!("Updating existing listings is disabled, skipping lookup");
                None
            }
        };
        self.submit(payload, existing.as_ref())
    }

    fn send_with_retry(
        &self,
        request: &HttpRequest,
        status: SubmissionStatus,
    ) -> Result<HttpResponse> {
        let policy = self.config.submit_retry;
        let mut attempt = 0;

        loop {
            let outcome = self
                .transport
                .send(request)
                .map_err(ListingError::from)
                .and_then(|response| {
                    if response.is_success() {
                        Ok(response)
                    } else {
                        Err(remote_error(&response))
                    }
                });

            match outcome {
                Ok(response) => return Ok(response),
                Err(e) if attempt < policy.max_retries && RetryPolicy::is_retryable(&e) => {
                    attempt += 1;
                    let delay = policy.delay_for(attempt);
                    let delay_ms = delay.as_millis() as u64;
                    warn!(attempt, error = %e, delay_ms, "Submission failed, retrying");
                    if status == SubmissionStatus::Created {
                        warn!("Retrying a create; a duplicate listing is possible if the first attempt reached the registry");
                    }
                    thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            ListingError::Config(format!(
                "Invalid marketplace URL '{}': {e}",
                self.config.base_url
            ))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ListingError::Config(format!(
                    "Marketplace URL '{}' cannot have a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: HttpMethod, url: &str) -> HttpRequest {
        HttpRequest::new(method, url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
    }
}

/// Public page of a listing: the API base without its `/v1` suffix, plus
/// `/listing/{id}`.
pub fn listing_url(base_url: &str, id: &ListingId) -> String {
    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{base}/listing/{id}")
}

/// Human-readable reason from an error response body.
///
/// Structured bodies yield their `message` or `error` field; anything else
/// is reduced to a short snippet of the raw text.
pub fn extract_error_detail(body: &str) -> String {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| object.get("error").and_then(Value::as_str))
            .or_else(|| {
                object
                    .get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(Value::as_str)
            });
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    let snippet: String = trimmed.chars().take(ERROR_SNIPPET_CHARS).collect();
    if snippet.len() < trimmed.len() {
        format!("{snippet}…")
    } else {
        snippet
    }
}

fn remote_error(response: &HttpResponse) -> ListingError {
    ListingError::Remote {
        status: response.status,
        detail: extract_error_detail(&response.body),
    }
}

fn id_of(value: &Value) -> Option<ListingId> {
    match value.get("id")? {
        Value::String(id) if !id.is_empty() => Some(ListingId::new(id.clone())),
        Value::Number(id) => Some(ListingId::new(id.to_string())),
        _ => None,
    }
}
