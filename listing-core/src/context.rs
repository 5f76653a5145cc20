//! Facts about the CI run that triggered the submission.

const TAG_REF_PREFIX: &str = "refs/tags/";
const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Environment of the triggering release event.
///
/// Every value is optional; unset and empty variables are both treated as
/// absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    /// Full git ref, e.g. `refs/tags/v1.2.0`.
    pub git_ref: Option<String>,
    /// `owner/name` of the repository.
    pub repository: Option<String>,
    pub actor: Option<String>,
    pub run_id: Option<String>,
    pub sha: Option<String>,
    pub server_url: String,
}

impl Default for TriggerContext {
    fn default() -> Self {
        Self {
            git_ref: None,
            repository: None,
            actor: None,
            run_id: None,
            sha: None,
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl TriggerContext {
    /// Reads the context from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the context through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            git_ref: get("GITHUB_REF"),
            repository: get("GITHUB_REPOSITORY"),
            actor: get("GITHUB_ACTOR"),
            run_id: get("GITHUB_RUN_ID"),
            sha: get("GITHUB_SHA"),
            server_url: get("GITHUB_SERVER_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
        }
    }

    /// The triggering ref with any `refs/tags/` prefix removed.
    pub fn release_tag(&self) -> Option<String> {
        self.git_ref.as_deref().map(|git_ref| {
            git_ref
                .strip_prefix(TAG_REF_PREFIX)
                .unwrap_or(git_ref)
                .to_string()
        })
    }

    /// Web URL of the triggering repository.
    pub fn repository_url(&self) -> Option<String> {
        self.repository
            .as_deref()
            .map(|repository| format!("{}/{}", self.server_url, repository))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn context_from(vars: &[(&str, &str)]) -> TriggerContext {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TriggerContext::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_release_tag_strips_tag_prefix() {
        let context = context_from(&[("GITHUB_REF", "refs/tags/1.4.0")]);
        assert_eq!(context.release_tag().as_deref(), Some("1.4.0"));
    }

    #[test]
    fn test_release_tag_keeps_non_tag_refs() {
        let context = context_from(&[("GITHUB_REF", "refs/heads/main")]);
        assert_eq!(context.release_tag().as_deref(), Some("refs/heads/main"));
    }

    #[test]
    fn test_repository_url_uses_server_url() {
        let context = context_from(&[
            ("GITHUB_REPOSITORY", "acme/widget"),
            ("GITHUB_SERVER_URL", "https://git.example.com/"),
        ]);
        assert_eq!(
            context.repository_url().as_deref(),
            Some("https://git.example.com/acme/widget")
        );
    }

    #[test]
    fn test_empty_variables_are_absent() {
        let context = context_from(&[("GITHUB_ACTOR", ""), ("GITHUB_REF", "  ")]);
        assert_eq!(context.actor, None);
        assert_eq!(context.release_tag(), None);
        assert_eq!(context.server_url, "https://github.com");
        assert_eq!(context.repository_url(), None);
    }
}
