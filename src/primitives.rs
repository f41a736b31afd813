//! Reusable value-level validation rules.
//!
//! Every rule has the same contract: inspect a `serde_json::Value`, and on
//! failure push an [`Issue`] addressed by the field path — never panic, never
//! return early through an error type. Section schemas compose these rules;
//! the orchestrator composes section schemas.
//!
//! ## The url-or-path grammar
//!
//! Authors mix relative asset paths and remote URLs in the same fields
//! (`logo: assets/logo.svg` next to `logo: https://cdn.example.com/logo.svg`),
//! so [`is_url_or_path`] is deliberately permissive:
//!
//! - absolute URLs (anything `url::Url` parses)
//! - paths starting with `/`, `./`, `../`, `assets/`, `public/`
//! - data URIs
//! - any `/`-containing string without whitespace that isn't a broken
//!   `http…` prefix
//!
//! Everything else must parse as an absolute URL or it is rejected.

use crate::issue::{FieldPath, Issue};
use serde_json::{Map, Value};
use url::Url;

/// Allowed values for `CtaButton.icon_position`.
const ICON_POSITIONS: &[&str] = &["left", "right"];

/// Allowed values for `CtaButton.variant`.
const CTA_VARIANTS: &[&str] = &["primary", "secondary", "outline", "ghost"];

/// True when a string is acceptable wherever a URL or asset path is expected.
pub fn is_url_or_path(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    if s.starts_with('/')
        || s.starts_with("./")
        || s.starts_with("../")
        || s.starts_with("assets/")
        || s.starts_with("public/")
        || s.starts_with("data:")
    {
        return true;
    }
    // A malformed "http…" string is a typo'd URL, not a relative path, and
    // the WHATWG parser would happily normalize "http:/x" into a valid URL.
    // Reject it before parsing gets a chance to repair it.
    if s.starts_with("http") && !s.starts_with("http://") && !s.starts_with("https://") {
        return false;
    }
    if Url::parse(s).is_ok() {
        return true;
    }
    // Relative paths like "img/hero.jpg".
    s.contains('/') && !s.contains(char::is_whitespace)
}

/// Non-empty string after trimming.
pub fn check_non_empty_string(value: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => {}
        Some(_) => issues.push(Issue::new(path, "must not be empty")),
        None => issues.push(Issue::new(path, "must be a string")),
    }
}

/// String that satisfies the url-or-path grammar.
pub fn check_url_string(value: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
    match value.as_str() {
        Some(s) if is_url_or_path(s) => {}
        Some(_) => issues.push(Issue::new(path, "must be a URL or a path")),
        None => issues.push(Issue::new(path, "must be a string")),
    }
}

/// LocalizedText: non-empty string, or a map of 1+ entries, each non-empty.
pub fn check_localized_text(value: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
    match value {
        Value::String(s) => {
            if s.trim().is_empty() {
                issues.push(Issue::new(path, "must not be empty"));
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                issues.push(Issue::new(path, "must have at least one language entry"));
                return;
            }
            for (lang, entry) in map {
                let entry_path = path.key(lang);
                match entry.as_str() {
                    Some(s) if !s.trim().is_empty() => {}
                    Some(_) => issues.push(Issue::new(&entry_path, "must not be empty")),
                    None => issues.push(Issue::new(&entry_path, "must be a string")),
                }
            }
        }
        _ => issues.push(Issue::new(
            path,
            "must be a string or a map of language codes to strings",
        )),
    }
}

/// Membership in a fixed set of allowed string values.
fn check_enum(value: &Value, allowed: &[&str], path: &FieldPath, issues: &mut Vec<Issue>) {
    match value.as_str() {
        Some(s) if allowed.contains(&s) => {}
        _ => issues.push(Issue::new(
            path,
            format!("must be one of: {}", allowed.join(", ")),
        )),
    }
}

/// Call-to-action button.
///
/// The anchor/href rule is cross-field: a button with no destination is
/// invalid, and that cannot be expressed per-key.
pub fn check_cta_button(value: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
    let Some(obj) = value.as_object() else {
        issues.push(Issue::new(path, "must be an object"));
        return;
    };

    match obj.get("label") {
        Some(label) => check_localized_text(label, &path.key("label"), issues),
        None => issues.push(Issue::new(&path.key("label"), "required field is missing")),
    }

    let has_anchor = obj.get("anchor").and_then(Value::as_str).is_some();
    let has_href = obj.get("href").and_then(Value::as_str).is_some();
    if !has_anchor && !has_href {
        issues.push(Issue::new(path, "either anchor or href is required"));
    }

    if let Some(href) = obj.get("href") {
        check_url_string(href, &path.key("href"), issues);
    }
    if let Some(icon) = obj.get("icon") {
        check_non_empty_string(icon, &path.key("icon"), issues);
    }
    if let Some(pos) = obj.get("iconPosition") {
        check_enum(pos, ICON_POSITIONS, &path.key("iconPosition"), issues);
    }
    if let Some(variant) = obj.get("variant") {
        check_enum(variant, CTA_VARIANTS, &path.key("variant"), issues);
    }
}

/// Social link: platform + URL, optional display label.
pub fn check_social_link(value: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
    let Some(obj) = value.as_object() else {
        issues.push(Issue::new(path, "must be an object"));
        return;
    };

    match obj.get("platform") {
        Some(platform) => check_non_empty_string(platform, &path.key("platform"), issues),
        None => issues.push(Issue::new(
            &path.key("platform"),
            "required field is missing",
        )),
    }
    match obj.get("url") {
        Some(u) => check_url_string(u, &path.key("url"), issues),
        None => issues.push(Issue::new(&path.key("url"), "required field is missing")),
    }
    if let Some(label) = obj.get("label") {
        check_non_empty_string(label, &path.key("label"), issues);
    }
}

/// Fetch a required field, recording an issue when absent.
pub fn require<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &FieldPath,
    issues: &mut Vec<Issue>,
) -> Option<&'a Value> {
    let value = obj.get(key);
    if value.is_none() {
        issues.push(Issue::new(&path.key(key), "required field is missing"));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(f: impl Fn(&Value, &FieldPath, &mut Vec<Issue>), value: Value) -> Vec<Issue> {
        let mut issues = Vec::new();
        f(&value, &FieldPath::root().key("field"), &mut issues);
        issues
    }

    // =========================================================================
    // is_url_or_path grammar
    // =========================================================================

    #[test]
    fn grammar_accepts_absolute_urls() {
        assert!(is_url_or_path("https://example.com/logo.png"));
        assert!(is_url_or_path("http://example.com"));
        assert!(is_url_or_path("mailto:hi@example.com"));
    }

    #[test]
    fn grammar_accepts_rooted_and_relative_paths() {
        assert!(is_url_or_path("/img/logo.png"));
        assert!(is_url_or_path("./logo.png"));
        assert!(is_url_or_path("../shared/logo.png"));
        assert!(is_url_or_path("assets/logo.png"));
        assert!(is_url_or_path("public/favicon.ico"));
    }

    #[test]
    fn grammar_accepts_data_uris() {
        assert!(is_url_or_path("data:image/png;base64,iVBOR"));
    }

    #[test]
    fn grammar_accepts_bare_relative_paths_with_slash() {
        assert!(is_url_or_path("img/hero.jpg"));
    }

    #[test]
    fn grammar_rejects_plain_words_and_spaced_strings() {
        assert!(!is_url_or_path("logo.png"));
        assert!(!is_url_or_path("not a url"));
        assert!(!is_url_or_path("img/with space.jpg"));
        assert!(!is_url_or_path(""));
        assert!(!is_url_or_path("   "));
    }

    #[test]
    fn grammar_rejects_broken_http_prefix() {
        // The WHATWG parser normalizes a missing slash into a valid URL, so
        // the typo guard must win before parsing ever runs.
        assert!(Url::parse("http:/broken").is_ok());
        assert!(!is_url_or_path("http:/broken"));
        assert!(!is_url_or_path("https:/x.test/img.jpg"));
        assert!(!is_url_or_path("httpx/relative.jpg"));
        // Well-formed schemes still pass.
        assert!(is_url_or_path("http://x.test/img.jpg"));
        assert!(is_url_or_path("https://x.test/img.jpg"));
    }

    // =========================================================================
    // Non-empty string / url string
    // =========================================================================

    #[test]
    fn non_empty_string_happy_path() {
        assert!(run(check_non_empty_string, json!("hello")).is_empty());
    }

    #[test]
    fn non_empty_string_rejects_blank_and_non_string() {
        assert_eq!(run(check_non_empty_string, json!("  ")).len(), 1);
        assert_eq!(run(check_non_empty_string, json!(42)).len(), 1);
    }

    #[test]
    fn url_string_issue_carries_path() {
        let issues = run(check_url_string, json!("not a url"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "field");
    }

    // =========================================================================
    // LocalizedText
    // =========================================================================

    #[test]
    fn localized_text_accepts_both_forms() {
        assert!(run(check_localized_text, json!("Welcome")).is_empty());
        assert!(run(check_localized_text, json!({"en": "Welcome", "fr": "Bienvenue"})).is_empty());
    }

    #[test]
    fn localized_text_rejects_empty_map() {
        let issues = run(check_localized_text, json!({}));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("at least one language"));
    }

    #[test]
    fn localized_text_rejects_blank_entry_with_language_path() {
        let issues = run(check_localized_text, json!({"en": "Welcome", "fr": "  "}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "field.fr");
    }

    #[test]
    fn localized_text_rejects_other_types() {
        assert_eq!(run(check_localized_text, json!([1, 2])).len(), 1);
        assert_eq!(run(check_localized_text, json!(7)).len(), 1);
    }

    // =========================================================================
    // CtaButton
    // =========================================================================

    #[test]
    fn cta_with_anchor_is_valid() {
        let issues = run(check_cta_button, json!({"label": "Book now", "anchor": "contact"}));
        assert!(issues.is_empty());
    }

    #[test]
    fn cta_with_href_is_valid() {
        let issues = run(
            check_cta_button,
            json!({"label": {"en": "Call"}, "href": "https://example.com/book"}),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn cta_without_destination_fails_with_specific_message() {
        let issues = run(check_cta_button, json!({"label": "Book now"}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "field");
        assert_eq!(issues[0].message, "either anchor or href is required");
    }

    #[test]
    fn cta_missing_label_is_reported() {
        let issues = run(check_cta_button, json!({"anchor": "top"}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "field.label");
    }

    #[test]
    fn cta_rejects_unknown_variant_and_icon_position() {
        let issues = run(
            check_cta_button,
            json!({
                "label": "Go",
                "anchor": "top",
                "iconPosition": "center",
                "variant": "rainbow"
            }),
        );
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.path == "field.iconPosition"));
        assert!(issues.iter().any(|i| i.path == "field.variant"));
    }

    // =========================================================================
    // SocialLink
    // =========================================================================

    #[test]
    fn social_link_happy_path() {
        let issues = run(
            check_social_link,
            json!({"platform": "instagram", "url": "https://instagram.com/x", "label": "IG"}),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn social_link_requires_platform_and_url() {
        let issues = run(check_social_link, json!({}));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.path == "field.platform"));
        assert!(issues.iter().any(|i| i.path == "field.url"));
    }
}
