//! Text signals in raw job-location strings: remote / hybrid keywords,
//! timezone abbreviations and country mentions.

use std::sync::OnceLock;

use regex::Regex;

use crate::reference::{normalize_key, CountryProfile, ReferenceDataset, TimezoneHint};

fn remote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:remote|work\s+from\s+home|wfh|anywhere|telecommute|telework|home[- ]based|worldwide|distributed\s+team)\b",
        )
        .expect("valid regex")
    })
}

fn hybrid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:hybrid|partially\s+remote|partly\s+remote|flexible(?:\s+working)?|\d+\s*days?\s*(?:a\s+week\s+|per\s+week\s+|/\s*week\s+)?(?:in[- ](?:the\s+)?office|on[- ]?site))\b",
        )
        .expect("valid regex")
    })
}

fn upper_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b[A-Z]{2,4}\b").expect("valid regex"))
}

/// Words left over after stripping hybrid keywords that carry no location.
const FILLER_WORDS: &[&str] = &["in", "at", "from", "based", "near", "office", "role"];

const SEPARATORS: &[char] = &['-', '–', '—', '|', '/', ':', ',', '(', ')', '[', ']', '·', ' '];

pub fn has_remote_keyword(text: &str) -> bool {
    remote_pattern().is_match(text)
}

pub fn has_hybrid_keyword(text: &str) -> bool {
    hybrid_pattern().is_match(text)
}

/// Removes hybrid keywords and the filler around them:
/// "Hybrid - London, UK" → "London, UK", "Hybrid (3 days in office) in Berlin" → "Berlin".
pub fn strip_hybrid_keywords(text: &str) -> String {
    let stripped = hybrid_pattern().replace_all(text, " ");
    clean_remainder(&stripped)
}

/// Removes remote keywords the same way, for "Remote - Lisbon" style text.
pub fn strip_remote_keywords(text: &str) -> String {
    let stripped = remote_pattern().replace_all(text, " ");
    clean_remainder(&stripped)
}

fn clean_remainder(text: &str) -> String {
    let without_empty_brackets = text.replace("()", " ").replace("[]", " ");
    let mut remainder = without_empty_brackets.trim_matches(SEPARATORS).to_string();

    loop {
        let lower = remainder.to_lowercase();
        let leading = FILLER_WORDS.iter().find(|w| {
            lower
                .strip_prefix(*w)
                .is_some_and(|rest| rest.starts_with(SEPARATORS) || rest.is_empty())
        });
        match leading {
            Some(word) => {
                remainder = remainder
                    .get(word.len()..)
                    .unwrap_or_default()
                    .trim_matches(SEPARATORS)
                    .to_string();
            }
            None => break,
        }
    }

    remainder.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First upper-case token in `text` that names a known timezone.
pub fn find_timezone_hint<'a>(
    text: &str,
    dataset: &'a ReferenceDataset,
) -> Option<(String, &'a TimezoneHint)> {
    upper_token_pattern()
        .find_iter(text)
        .find_map(|m| dataset.find_timezone(m.as_str()).map(|tz| (m.as_str().to_string(), tz)))
}

/// First country (in dataset order) named anywhere in `text`.
///
/// Names and long aliases match case-insensitively as whole phrases; aliases of
/// three letters or fewer ("UK", "USA") must appear upper-case so that words
/// such as "us" in "join us" are not taken as a country.
pub fn find_country_mention<'a>(
    text: &str,
    dataset: &'a ReferenceDataset,
) -> Option<&'a CountryProfile> {
    let normalized = normalize_key(text);
    let upper_tokens: Vec<&str> = upper_token_pattern()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect();

    dataset.countries().iter().find(|country| {
        std::iter::once(&country.name)
            .chain(country.aliases.iter())
            .any(|key| {
                let key = normalize_key(key);
                if key.len() <= 3 {
                    upper_tokens.iter().any(|t| t.eq_ignore_ascii_case(&key))
                } else {
                    contains_phrase(&normalized, &key)
                }
            })
    })
}

/// Whole-phrase containment on normalized text: `needle` must be bounded by
/// non-alphanumeric characters (or the ends of `haystack`).
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
