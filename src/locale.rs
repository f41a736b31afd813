//! Localized text and language fallback resolution.
//!
//! Every textual content field in the configuration tree is a
//! [`LocalizedText`]: either a plain string (same text for all languages) or
//! a map from language code to string. There is deliberately no third form —
//! the renderer never has to distinguish "a string" from "a localizable
//! string".
//!
//! ## Resolution priority
//!
//! Resolution is a priority-ordered merge: the first non-empty candidate
//! wins, exactly like sidecar-vs-embedded metadata resolution in a photo
//! pipeline:
//!
//! 1. the current language
//! 2. the site's default language
//! 3. the first configured language that has an entry
//! 4. the lexicographically first entry in the map
//!
//! All language state is carried in an explicit [`LocaleContext`] value
//! threaded through resolution calls. There are no process-wide language
//! globals: resolution is a pure function of `(text, context)`, which keeps
//! it trivially testable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A string value available in one or more languages.
///
/// Serialized forms:
/// - `"Welcome"` — plain, used for every language
/// - `{"en": "Welcome", "fr": "Bienvenue"}` — per-language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    PerLanguage(BTreeMap<String, String>),
}

/// Immutable language context for one resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleContext {
    /// Language being rendered right now.
    pub current: String,
    /// Site default language (always set; validated against `available`).
    pub default: String,
    /// All configured language codes, in configuration order.
    pub available: Vec<String>,
}

impl LocaleContext {
    pub fn new(current: &str, default: &str, available: &[&str]) -> Self {
        Self {
            current: current.to_string(),
            default: default.to_string(),
            available: available.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Same context with a different current language.
    pub fn for_language(&self, lang: &str) -> Self {
        Self {
            current: lang.to_string(),
            ..self.clone()
        }
    }
}

impl LocalizedText {
    /// Resolve to a concrete string following the fallback chain.
    ///
    /// Returns `None` only for degenerate values (empty map, all entries
    /// blank) — which validation rejects before resolution ever runs.
    pub fn resolve(&self, ctx: &LocaleContext) -> Option<&str> {
        match self {
            LocalizedText::Plain(s) => non_blank(s),
            LocalizedText::PerLanguage(map) => {
                let by_lang = |lang: &str| map.get(lang).map(String::as_str).and_then(non_blank);

                by_lang(&ctx.current)
                    .or_else(|| by_lang(&ctx.default))
                    .or_else(|| ctx.available.iter().find_map(|lang| by_lang(lang)))
                    .or_else(|| map.values().map(String::as_str).find_map(non_blank))
            }
        }
    }

    /// All concrete string values, regardless of language. Used by the
    /// locale lint pass, which scans every variant of every text.
    pub fn values(&self) -> Vec<&str> {
        match self {
            LocalizedText::Plain(s) => vec![s.as_str()],
            LocalizedText::PerLanguage(map) => map.values().map(String::as_str).collect(),
        }
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}
