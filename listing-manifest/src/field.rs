use serde::Deserialize;
use serde_json::Value;

/// A manifest field that may be written either as a bare string or as an
/// object carrying the value in a sub-field.
///
/// ```json
/// "repository": "https://github.com/acme/widget"
/// "repository": { "type": "git", "url": "https://github.com/acme/widget" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringOrObject {
    Bare(String),
    Structured(StructuredField),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StructuredField {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl StringOrObject {
    /// Interprets a JSON value, returning `None` for any other shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Repository-style unwrap: bare string or `url` sub-field.
    pub fn into_url(self) -> Option<String> {
        match self {
            StringOrObject::Bare(value) => Some(value),
            StringOrObject::Structured(field) => field.url,
        }
    }

    /// Person-style unwrap: bare string or `name` sub-field.
    pub fn into_name(self) -> Option<String> {
        match self {
            StringOrObject::Bare(value) => Some(value),
            StringOrObject::Structured(field) => field.name,
        }
    }

    /// Legacy license-object unwrap: bare string or `type` sub-field.
    pub fn into_kind(self) -> Option<String> {
        match self {
            StringOrObject::Bare(value) => Some(value),
            StringOrObject::Structured(field) => field.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_string_unwraps_as_is() {
        let field = StringOrObject::from_value(&json!("https://x")).unwrap();
        assert_eq!(field.clone().into_url().as_deref(), Some("https://x"));
        assert_eq!(field.into_name().as_deref(), Some("https://x"));
    }

    #[test]
    fn test_structured_forms_unwrap_sub_fields() {
        let repository =
            StringOrObject::from_value(&json!({"type": "git", "url": "https://x"})).unwrap();
        assert_eq!(repository.into_url().as_deref(), Some("https://x"));

        let author =
            StringOrObject::from_value(&json!({"name": "Ada", "email": "ada@example.com"}))
                .unwrap();
        assert_eq!(author.into_name().as_deref(), Some("Ada"));

        let license = StringOrObject::from_value(&json!({"type": "ISC"})).unwrap();
        assert_eq!(license.into_kind().as_deref(), Some("ISC"));
    }

    #[test]
    fn test_other_shapes_are_rejected() {
        assert_eq!(StringOrObject::from_value(&json!(42)), None);
        assert_eq!(StringOrObject::from_value(&json!(["a"])), None);
        assert_eq!(StringOrObject::from_value(&json!(null)), None);
    }
}
