use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Email pattern: organizer addresses end up in DB error text
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

/// Provider API keys (`sk-...`) and long opaque tokens
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\bsk-[A-Za-z0-9_-]{8,}|\b[A-Za-z0-9+/]{24,}={0,2}").unwrap()
});

/// Masks emails (first character of the local part kept) and API-key-like tokens.
pub fn redact(input: &str) -> String {
    let masked = EMAIL_REGEX.replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => full.to_string(),
        }
    });

    TOKEN_REGEX
        .replace_all(&masked, "[REDACTED_TOKEN]")
        .to_string()
}

/// Display wrapper that redacts on format, for use in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
