//! Title template compilation.
//!
//! A title template is literal text with `{name}` placeholders, e.g.
//! `SWA access invite for @{login} ({swaName}) - {date}`. Compiling it yields
//! a whole-string matcher in which every literal character matches itself and
//! every placeholder matches any (possibly empty) run of characters.
//!
//! Callers depend only on [`TitleMatcher`], so the regex-backed
//! [`TemplateMatcher`] can be swapped for another strategy.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::{Error, Result};

/// Default template used when `discussion-title-template` is not supplied.
pub const DEFAULT_TITLE_TEMPLATE: &str = "SWA access invite for @{login} ({swaName}) - {date}";

/// An escaped placeholder, as it appears after `regex::escape`: `\{word\}`.
static ESCAPED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\\{([A-Za-z0-9_]+)\\\}").unwrap_or_else(|_| unreachable!())
});

/// A placeholder in the raw template: `{word}`.
static RAW_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap_or_else(|_| unreachable!()));

/// Wildcard substituted for each placeholder.
const PLACEHOLDER_WILDCARD: &str = ".*?";

/// Predicate over discussion titles.
pub trait TitleMatcher: Send + Sync {
    /// Returns `true` if the whole title matches.
    fn matches(&self, title: &str) -> bool;
}

/// Regex-backed matcher compiled from a title template.
#[derive(Clone)]
pub struct TemplateMatcher {
    template: String,
    pattern: Regex,
    placeholders: Vec<String>,
}

impl TemplateMatcher {
    /// Compiles a title template.
    ///
    /// Literal text is escaped first, so characters such as `(`, `[`, `.`,
    /// `$` or a lone `{` never act as pattern syntax. Placeholder names are
    /// not validated; any `{word}` becomes a wildcard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the generated pattern is
    /// rejected by the regex engine (only possible for pathological sizes).
    pub fn compile(template: &str) -> Result<Self> {
        let escaped = regex::escape(template);
        let body = ESCAPED_PLACEHOLDER.replace_all(&escaped, PLACEHOLDER_WILDCARD);
        let pattern =
            Regex::new(&format!("^{body}$")).map_err(|e| Error::InvalidConfiguration {
                input: "discussion-title-template".to_string(),
                reason: e.to_string(),
            })?;

        let placeholders = RAW_PLACEHOLDER
            .captures_iter(template)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        Ok(Self {
            template: template.to_string(),
            pattern,
            placeholders,
        })
    }

    /// Returns the template this matcher was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the placeholder names in template order, duplicates included.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Returns the generated regular expression.
    #[must_use]
    pub fn as_regex_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl TitleMatcher for TemplateMatcher {
    fn matches(&self, title: &str) -> bool {
        self.pattern.is_match(title)
    }
}

impl fmt::Debug for TemplateMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateMatcher")
            .field("template", &self.template)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn compile(template: &str) -> TemplateMatcher {
        TemplateMatcher::compile(template).expect("template compiles")
    }

    #[test]
    fn test_default_template_matches_invite_title() {
        let matcher = compile(DEFAULT_TITLE_TEMPLATE);
        assert!(matcher.matches("SWA access invite for @alice (my-swa) - 2024-01-02"));
        assert!(!matcher.matches("Random discussion title"));
    }

    #[test]
    fn test_default_template_placeholders() {
        let matcher = compile(DEFAULT_TITLE_TEMPLATE);
        assert_eq!(matcher.placeholders(), ["login", "swaName", "date"]);
    }

    #[test]
    fn test_literal_template_is_exact() {
        let matcher = compile("Weekly sync");
        assert!(matcher.matches("Weekly sync"));
        assert!(!matcher.matches("Weekly syn"));
        assert!(!matcher.matches("Weekly sync!"));
        assert!(!matcher.matches(" Weekly sync"));
        assert!(!matcher.matches("weekly sync"));
    }

    #[test]
    fn test_match_is_anchored() {
        let matcher = compile("invite for {login}");
        assert!(!matcher.matches("Re: invite for bob"));
        assert!(matcher.matches("invite for bob"));
    }

    #[test]
    fn test_placeholder_matches_empty_run() {
        let matcher = compile("@{login} joined");
        assert!(matcher.matches("@ joined"));
    }

    #[test]
    fn test_adjacent_placeholders() {
        let matcher = compile("{a}{b}-end");
        assert!(matcher.matches("-end"));
        assert!(matcher.matches("xyz-end"));
        assert!(!matcher.matches("xyz-en"));
    }

    #[test_case("Price (USD) [draft]", "Price (USD) [draft]", "Price USD draft" ; "parens and brackets")]
    #[test_case("a.b*c+d?", "a.b*c+d?", "aXbbbcddd" ; "quantifiers")]
    #[test_case("^start$|end", "^start$|end", "start" ; "anchors and alternation")]
    #[test_case(r"path\to\file", r"path\to\file", "path/to/file" ; "backslashes")]
    #[test_case("set {} here", "set {} here", "set x here" ; "empty braces")]
    #[test_case("range {1,3}", "range {1,3}", "range 1" ; "repetition syntax")]
    #[test_case("{a-b} x", "{a-b} x", "q x" ; "non word placeholder")]
    fn test_metacharacters_are_literal(template: &str, accepted: &str, rejected: &str) {
        let matcher = compile(template);
        assert!(matcher.matches(accepted), "{template} should accept {accepted}");
        assert!(!matcher.matches(rejected), "{template} should reject {rejected}");
    }

    #[test]
    fn test_placeholder_next_to_literal_braces() {
        let matcher = compile("{{login}}");
        assert!(matcher.matches("{alice}"));
        assert!(!matcher.matches("alice"));
    }

    #[test]
    fn test_wildcard_does_not_cross_newlines() {
        let matcher = compile("title {rest}");
        assert!(!matcher.matches("title one\ntwo"));
    }

    #[test]
    fn test_any_word_becomes_placeholder() {
        let matcher = compile("{x} {Y_2} {3}");
        assert_eq!(matcher.placeholders(), ["x", "Y_2", "3"]);
        assert!(matcher.matches("a b c"));
    }

    #[test]
    fn test_empty_template_matches_only_empty_title() {
        let matcher = compile("");
        assert!(matcher.matches(""));
        assert!(!matcher.matches(" "));
    }

    #[test]
    fn test_generated_pattern() {
        let matcher = compile("for @{login} ({swaName})");
        assert_eq!(matcher.as_regex_str(), r"^for @.*? \(.*?\)$");
        assert_eq!(matcher.template(), "for @{login} ({swaName})");
    }
}
