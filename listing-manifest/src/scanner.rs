//! Line-oriented extraction of `key = "value"` pairs from TOML-style files.
//!
//! Only the subset needed for listing metadata is understood: section
//! headers, quoted string values, string arrays (single or multi-line) and
//! string sub-fields of inline tables. Anything else yields `None` for that
//! key and never fails the whole file.

use once_cell::sync::Lazy;
use regex::Regex;

static SECTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\[\[?\s*([A-Za-z0-9_.\-"' ]+?)\s*\]\]?\s*(?:#.*)?$"#)
        .expect("Section header regex should compile - this is a static pattern")
});

static KEY_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*("[^"]+"|'[^']+'|[A-Za-z0-9_.\-]+)\s*=\s*(.*)$"#)
        .expect("Key line regex should compile - this is a static pattern")
});

static QUOTED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"|'([^']*)'"#)
        .expect("Quoted string regex should compile - this is a static pattern")
});

const TRIPLE_QUOTES: [&str; 2] = ["\"\"\"", "'''"];

/// Section-aware scanner over the text of a TOML-style manifest.
pub struct SectionScanner<'a> {
    content: &'a str,
}

impl<'a> SectionScanner<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }

    /// Raw right-hand side of `key` inside `[section]`, with continuation
    /// lines of a multi-line array or string joined by newlines.
    pub fn raw_value(&self, section: &str, key: &str) -> Option<String> {
        let mut current_section: Option<String> = None;
        let mut lines = self.content.lines();

        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(caps) = SECTION_REGEX.captures(trimmed) {
                current_section = Some(normalize_section(&caps[1]));
                continue;
            }

            let Some(caps) = KEY_LINE_REGEX.captures(line) else {
                continue;
            };
            let wanted =
                current_section.as_deref() == Some(section) && unquote_key(&caps[1]) == key;

            let mut value = caps[2].trim().to_string();
            if !wanted {
                // Body lines of a multi-line string are not keys or headers.
                if let Some(delimiter) = triple_quote(&value) {
                    if !value[delimiter.len()..].contains(delimiter) {
                        lines.by_ref().find(|next| next.contains(delimiter));
                    }
                }
                continue;
            }

            if value.starts_with('[') {
                while bracket_depth(&value) > 0 {
                    match lines.next() {
                        Some(next) => {
                            value.push('\n');
                            value.push_str(next);
                        }
                        None => break,
                    }
                }
            } else if let Some(delimiter) = triple_quote(&value) {
                while !value[delimiter.len()..].contains(delimiter) {
                    match lines.next() {
                        Some(next) => {
                            value.push('\n');
                            value.push_str(next);
                        }
                        None => break,
                    }
                }
            }
            return Some(value);
        }

        None
    }

    /// Quoted string value of `key`. Non-string values yield `None`.
    pub fn string(&self, section: &str, key: &str) -> Option<String> {
        let raw = self.raw_value(section, key)?;
        if let Some(delimiter) = triple_quote(&raw) {
            return multi_line_text(&raw, delimiter);
        }
        if !(raw.starts_with('"') || raw.starts_with('\'')) {
            return None;
        }
        first_quoted(&raw)
    }

    /// Like [`SectionScanner::string`], retrying with the first letter of
    /// the key upper-cased (`homepage` → `Homepage`).
    pub fn string_or_capitalized(&self, section: &str, key: &str) -> Option<String> {
        self.string(section, key)
            .or_else(|| self.string(section, &capitalize(key)))
    }

    /// Every quoted string inside an array value, in order.
    pub fn string_array(&self, section: &str, key: &str) -> Option<Vec<String>> {
        let raw = self.raw_value(section, key)?;
        if !raw.starts_with('[') {
            return None;
        }
        Some(all_quoted(&raw))
    }

    /// First `field = "..."` found inside the value of `key`, which is
    /// expected to be an inline table or an array of inline tables.
    pub fn inline_field(&self, section: &str, key: &str, field: &str) -> Option<String> {
        let raw = self.raw_value(section, key)?;
        if !raw.contains('{') {
            return None;
        }
        let pattern = format!(r#"\b{}\s*=\s*("(?:[^"\\]|\\.)*"|'[^']*')"#, regex::escape(field));
        let regex = Regex::new(&pattern).ok()?;
        let caps = regex.captures(&raw)?;
        first_quoted(&caps[1])
    }
}

fn normalize_section(header: &str) -> String {
    header
        .split('.')
        .map(|part| unquote_key(part.trim()))
        .collect::<Vec<_>>()
        .join(".")
}

fn unquote_key(key: &str) -> String {
    key.trim_matches(|c| c == '"' || c == '\'').to_string()
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capture_text(caps: &regex::Captures<'_>) -> String {
    if let Some(double) = caps.get(1) {
        double.as_str().replace("\\\"", "\"").replace("\\\\", "\\")
    } else {
        caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default()
    }
}

fn triple_quote(value: &str) -> Option<&'static str> {
    TRIPLE_QUOTES
        .into_iter()
        .find(|delimiter| value.starts_with(delimiter))
}

/// Body of a `"""` or `'''` string, trimmed. Unterminated strings yield `None`.
fn multi_line_text(raw: &str, delimiter: &str) -> Option<String> {
    let body = &raw[delimiter.len()..];
    let end = body.find(delimiter)?;
    let text = body[..end].trim();
    if delimiter == "'''" {
        Some(text.to_string())
    } else {
        Some(text.replace("\\\"", "\"").replace("\\\\", "\\"))
    }
}

fn first_quoted(raw: &str) -> Option<String> {
    QUOTED_REGEX.captures(raw).map(|caps| capture_text(&caps))
}

fn all_quoted(raw: &str) -> Vec<String> {
    QUOTED_REGEX
        .captures_iter(raw)
        .map(|caps| capture_text(&caps))
        .collect()
}

/// Net count of open brackets outside quoted strings.
fn bracket_depth(value: &str) -> i32 {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in value.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && q == '"' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' => depth += 1,
            ']' => depth -= 1,
            '#' => break,
            _ => {}
        }
    }

    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
# top-level comment
[package]
name = "widget" # trailing comment
version = '0.4.1'
edition = 2021
keywords = ["cli", "tools"]
categories = [
    "command-line-utilities",  # primary
    "development-tools",
]
authors = [{ name = "Ada", email = "ada@example.com" }]
license = { text = "MIT" }

[dependencies]
serde = { version = "1", features = ["derive"] }
version = "9.9.9"

[package.urls]
Homepage = "https://widget.dev"
"Bug Tracker" = "https://widget.dev/issues"
"#;

    #[test]
    fn test_string_values_are_section_scoped() {
        let scanner = SectionScanner::new(SAMPLE);
        assert_eq!(scanner.string("package", "name").as_deref(), Some("widget"));
        assert_eq!(scanner.string("package", "version").as_deref(), Some("0.4.1"));
        assert_eq!(scanner.string("dependencies", "version").as_deref(), Some("9.9.9"));
        assert_eq!(scanner.string("package", "missing"), None);
    }

    #[test]
    fn test_non_string_values_yield_none() {
        let scanner = SectionScanner::new(SAMPLE);
        assert_eq!(scanner.string("package", "edition"), None);
        assert_eq!(scanner.string("package", "keywords"), None);
        assert_eq!(scanner.string_array("package", "name"), None);
    }

    #[test]
    fn test_single_and_multi_line_arrays() {
        let scanner = SectionScanner::new(SAMPLE);
        assert_eq!(
            scanner.string_array("package", "keywords"),
            Some(vec!["cli".to_string(), "tools".to_string()])
        );
        assert_eq!(
            scanner.string_array("package", "categories"),
            Some(vec![
                "command-line-utilities".to_string(),
                "development-tools".to_string()
            ])
        );
    }

    #[test]
    fn test_inline_table_fields() {
        let scanner = SectionScanner::new(SAMPLE);
        assert_eq!(
            scanner.inline_field("package", "authors", "name").as_deref(),
            Some("Ada")
        );
        assert_eq!(
            scanner.inline_field("package", "license", "text").as_deref(),
            Some("MIT")
        );
        assert_eq!(scanner.inline_field("package", "name", "text"), None);
    }

    #[test]
    fn test_capitalized_fallback_and_quoted_keys() {
        let scanner = SectionScanner::new(SAMPLE);
        assert_eq!(
            scanner
                .string_or_capitalized("package.urls", "homepage")
                .as_deref(),
            Some("https://widget.dev")
        );
        assert_eq!(
            scanner.string("package.urls", "Bug Tracker").as_deref(),
            Some("https://widget.dev/issues")
        );
    }

    #[test]
    fn test_escaped_quotes_are_unescaped() {
        let scanner = SectionScanner::new("[project]\ndescription = \"A \\\"quoted\\\" tool\"\n");
        assert_eq!(
            scanner.string("project", "description").as_deref(),
            Some("A \"quoted\" tool")
        );
    }

    #[test]
    fn test_multi_line_strings() {
        let scanner = SectionScanner::new(
            "[package]\ndescription = \"\"\"\nA widget toolkit.\n\"\"\"\nrepository = '''https://github.com/acme/widget'''\nname = \"widget\"\n",
        );
        assert_eq!(
            scanner.string("package", "description").as_deref(),
            Some("A widget toolkit.")
        );
        assert_eq!(
            scanner.string("package", "repository").as_deref(),
            Some("https://github.com/acme/widget")
        );
        assert_eq!(scanner.string("package", "name").as_deref(), Some("widget"));
    }

    #[test]
    fn test_multi_line_string_body_is_not_scanned() {
        let scanner = SectionScanner::new(
            "[package]\ndescription = '''\n[dependencies]\nname = \"inner\"\n'''\nname = \"widget\"\n",
        );
        assert_eq!(scanner.string("package", "name").as_deref(), Some("widget"));
        assert_eq!(scanner.string("dependencies", "name"), None);
    }

    #[test]
    fn test_unterminated_multi_line_string_is_absent() {
        let scanner = SectionScanner::new("[package]\ndescription = '''\nnever closed\n");
        assert_eq!(scanner.string("package", "description"), None);
    }

    #[test]
    fn test_unterminated_array_reads_to_end_of_file() {
        let scanner = SectionScanner::new("[package]\nkeywords = [\"a\",\n\"b\"");
        assert_eq!(
            scanner.string_array("package", "keywords"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_bracket_depth_ignores_quoted_brackets() {
        assert_eq!(bracket_depth(r#"["a[1]", "b"]"#), 0);
        assert_eq!(bracket_depth(r#"["a", # ]"#), 1);
        assert_eq!(bracket_depth("["), 1);
    }
}
