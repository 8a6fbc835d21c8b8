//! Shared helpers for form normalization and secret handling

use std::fmt;

/// A string wrapper that masks its contents in Debug/Display output.
/// Keeps API keys out of logs and error messages.
#[derive(Clone, Default)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Access the raw secret value (for request headers).
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when there is no usable key: empty, or the literal "none".
    pub fn is_unset(&self) -> bool {
        self.0.is_empty() || self.0.eq_ignore_ascii_case("none")
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<&str> for SecretString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Trim a free-text field, mapping blank input to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Append `item` unless an identical entry is already present.
/// Matching is exact and case-sensitive; insertion order is kept.
pub fn push_unique(items: &mut Vec<String>, item: String) -> bool {
    if items.iter().any(|existing| *existing == item) {
        return false;
    }
    items.push(item);
    true
}

/// Build an insertion-ordered, deduplicated list from raw form values.
/// Blank entries are dropped.
pub fn dedup_ordered<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    for value in values {
        let value = value.trim().to_string();
        if !value.is_empty() {
            push_unique(&mut out, value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_hides_in_debug() {
        let secret = SecretString::new("sk-live-123".to_string());
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "***");
        assert!(!debug_output.contains("sk-live"));
    }

    #[test]
    fn test_secret_string_hides_in_display() {
        let secret = SecretString::new("sk-live-123".to_string());
        assert_eq!(format!("{}", secret), "***");
    }

    #[test]
    fn test_secret_string_expose_and_eq() {
        let secret: SecretString = "test-key".to_string().into();
        assert_eq!(secret.expose(), "test-key");
        assert!(secret == "test-key");
    }

    #[test]
    fn test_secret_string_unset() {
        assert!(SecretString::default().is_unset());
        assert!(SecretString::new("None".to_string()).is_unset());
        assert!(!SecretString::new("sk-1".to_string()).is_unset());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(
            non_blank(Some("  data analyst ".to_string())),
            Some("data analyst".to_string())
        );
    }

    #[test]
    fn test_push_unique_is_case_sensitive() {
        let mut items = vec!["Python".to_string()];
        assert!(!push_unique(&mut items, "Python".to_string()));
        assert!(push_unique(&mut items, "python".to_string()));
        assert_eq!(items, vec!["Python", "python"]);
    }

    #[test]
    fn test_dedup_ordered_keeps_first_occurrence() {
        let out = dedup_ordered(
            ["SQL", "Python", "", "SQL", " Excel "]
                .iter()
                .map(|s| s.to_string()),
        );
        assert_eq!(out, vec!["SQL", "Python", "Excel"]);
    }
}
