//! Validation orchestrator.
//!
//! Runs the top-level configuration schema, dispatches every content block to
//! its section schema, and computes whole-tree warnings. The result is a
//! [`ValidationReport`] — never a panic, never a partial success: `valid` is
//! true iff the error list is empty, and warnings never affect validity.
//!
//! ## Ordering
//!
//! 1. **Root shape** (name, languages, theme, navigation, footer, sections).
//!    If the root is malformed, section-level validation is meaningless, so
//!    the orchestrator returns immediately with the root errors only.
//! 2. **Section dispatch**: each block's `props` goes to the schema selected
//!    by its `type` tag. One bad section does not stop validation of the
//!    others; every issue path is prefixed with the section index
//!    (`sections[2].props.title`).
//! 3. **Warnings**: missing seo block, duplicate section ids (one warning per
//!    duplicate occurrence after the first).
//! 4. **Locale lint** ([`crate::lint`]): advisory diacritic heuristics.

use crate::issue::{FieldPath, Issue, ValidationReport};
use crate::lint::lint_localized_strings;
use crate::primitives::{
    check_cta_button, check_localized_text, check_non_empty_string, check_social_link,
    check_url_string, require,
};
use crate::sections::SectionType;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Validate a raw configuration document.
pub fn validate(root: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(obj) = root.as_object() else {
        report
            .errors
            .push(Issue::new(&FieldPath::root(), "configuration must be an object"));
        return report;
    };

    validate_root_shape(obj, &mut report.errors);
    if !report.errors.is_empty() {
        // Fail fast: section-level checks on a malformed root produce noise,
        // not signal.
        return report;
    }

    if let Some(sections) = obj.get("sections").and_then(Value::as_array) {
        validate_sections(sections, &mut report.errors);
        collect_section_warnings(sections, &mut report.warnings);
    }

    if obj.get("seo").is_none() {
        report.warnings.push(Issue::new(
            &FieldPath::root().key("seo"),
            "no seo block configured — search engines will fall back to generic metadata",
        ));
    }

    report
        .warnings
        .extend(lint_localized_strings(root, &configured_languages(obj)));

    report
}

/// The language codes the document declares, falling back to the default
/// language when no explicit list is given.
fn configured_languages(obj: &Map<String, Value>) -> Vec<String> {
    if let Some(list) = obj.get("languages").and_then(Value::as_array) {
        return list
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect();
    }
    obj.get("defaultLanguage")
        .and_then(Value::as_str)
        .map(|s| vec![s.to_string()])
        .unwrap_or_default()
}

// ============================================================================
// Root shape
// ============================================================================

fn validate_root_shape(obj: &Map<String, Value>, errors: &mut Vec<Issue>) {
    let root = FieldPath::root();

    if let Some(name) = require(obj, "name", &root, errors) {
        check_localized_text(name, &root.key("name"), errors);
    }
    if let Some(url) = obj.get("url") {
        check_url_string(url, &root.key("url"), errors);
    }

    let languages_path = root.key("languages");
    if let Some(languages) = obj.get("languages") {
        match languages.as_array() {
            Some(list) => {
                for (i, lang) in list.iter().enumerate() {
                    check_non_empty_string(lang, &languages_path.index(i), errors);
                }
            }
            None => errors.push(Issue::new(&languages_path, "must be a list")),
        }
    }

    let default_path = root.key("defaultLanguage");
    match require(obj, "defaultLanguage", &root, errors).and_then(Value::as_str) {
        Some(default_lang) => {
            if default_lang.trim().is_empty() {
                errors.push(Issue::new(&default_path, "must not be empty"));
            } else if let Some(list) = obj.get("languages").and_then(Value::as_array)
                && !list.is_empty()
                && !list.iter().any(|l| l.as_str() == Some(default_lang))
            {
                errors.push(Issue::new(
                    &default_path,
                    "must be one of the configured languages",
                ));
            }
        }
        None => {
            if obj.contains_key("defaultLanguage") {
                errors.push(Issue::new(&default_path, "must be a string"));
            }
        }
    }

    validate_theme(obj, &root, errors);
    validate_navigation(obj, &root, errors);

    match require(obj, "sections", &root, errors) {
        Some(sections) if !sections.is_array() => {
            errors.push(Issue::new(&root.key("sections"), "must be a list"));
        }
        _ => {}
    }

    validate_footer(obj, &root, errors);
    if let Some(disclaimer) = obj.get("disclaimer") {
        check_localized_text(disclaimer, &root.key("disclaimer"), errors);
    }
    if let Some(steps) = obj.get("steps") {
        let steps_path = root.key("steps");
        match steps.as_array() {
            Some(list) => {
                for (i, step) in list.iter().enumerate() {
                    check_non_empty_string(step, &steps_path.index(i), errors);
                }
            }
            None => errors.push(Issue::new(&steps_path, "must be a list")),
        }
    }
}

fn validate_theme(obj: &Map<String, Value>, root: &FieldPath, errors: &mut Vec<Issue>) {
    let theme_path = root.key("theme");
    let Some(theme) = require(obj, "theme", root, errors) else {
        return;
    };
    let Some(theme_obj) = theme.as_object() else {
        errors.push(Issue::new(&theme_path, "must be an object"));
        return;
    };

    match require(theme_obj, "colors", &theme_path, errors) {
        Some(colors) => match colors.as_object() {
            Some(colors_obj) => {
                let colors_path = theme_path.key("colors");
                if colors_obj.is_empty() {
                    errors.push(Issue::new(&colors_path, "must define at least one color"));
                }
                for (name, color) in colors_obj {
                    check_non_empty_string(color, &colors_path.key(name), errors);
                }
            }
            None => errors.push(Issue::new(&theme_path.key("colors"), "must be an object")),
        },
        None => {}
    }

    if let Some(fonts) = theme_obj.get("fonts") {
        let fonts_path = theme_path.key("fonts");
        match fonts.as_object() {
            Some(fonts_obj) => {
                for (name, font) in fonts_obj {
                    check_non_empty_string(font, &fonts_path.key(name), errors);
                }
            }
            None => errors.push(Issue::new(&fonts_path, "must be an object")),
        }
    }
}

fn validate_nav_link(value: &Value, path: &FieldPath, errors: &mut Vec<Issue>) {
    let Some(obj) = value.as_object() else {
        errors.push(Issue::new(path, "must be an object"));
        return;
    };
    match obj.get("label") {
        Some(label) => check_localized_text(label, &path.key("label"), errors),
        None => errors.push(Issue::new(&path.key("label"), "required field is missing")),
    }
    let has_anchor = obj.get("anchor").and_then(Value::as_str).is_some();
    let has_href = obj.get("href").and_then(Value::as_str).is_some();
    if !has_anchor && !has_href {
        errors.push(Issue::new(path, "either anchor or href is required"));
    }
    if let Some(href) = obj.get("href") {
        check_url_string(href, &path.key("href"), errors);
    }
}

fn validate_navigation(obj: &Map<String, Value>, root: &FieldPath, errors: &mut Vec<Issue>) {
    let nav_path = root.key("navigation");
    let Some(nav) = require(obj, "navigation", root, errors) else {
        return;
    };
    let Some(nav_obj) = nav.as_object() else {
        errors.push(Issue::new(&nav_path, "must be an object"));
        return;
    };

    match require(nav_obj, "links", &nav_path, errors) {
        Some(links) => match links.as_array() {
            Some(list) => {
                let links_path = nav_path.key("links");
                for (i, link) in list.iter().enumerate() {
                    validate_nav_link(link, &links_path.index(i), errors);
                }
            }
            None => errors.push(Issue::new(&nav_path.key("links"), "must be a list")),
        },
        None => {}
    }

    if let Some(logo) = nav_obj.get("logo") {
        check_url_string(logo, &nav_path.key("logo"), errors);
    }
    if let Some(cta) = nav_obj.get("cta") {
        check_cta_button(cta, &nav_path.key("cta"), errors);
    }
    if let Some(style) = nav_obj.get("style") {
        check_non_empty_string(style, &nav_path.key("style"), errors);
    }
}

fn validate_footer(obj: &Map<String, Value>, root: &FieldPath, errors: &mut Vec<Issue>) {
    let footer_path = root.key("footer");
    let Some(footer) = require(obj, "footer", root, errors) else {
        return;
    };
    let Some(footer_obj) = footer.as_object() else {
        errors.push(Issue::new(&footer_path, "must be an object"));
        return;
    };

    if let Some(text) = footer_obj.get("text") {
        check_localized_text(text, &footer_path.key("text"), errors);
    }
    if let Some(social) = footer_obj.get("social") {
        let social_path = footer_path.key("social");
        match social.as_array() {
            Some(list) => {
                for (i, link) in list.iter().enumerate() {
                    check_social_link(link, &social_path.index(i), errors);
                }
            }
            None => errors.push(Issue::new(&social_path, "must be a list")),
        }
    }
    if let Some(links) = footer_obj.get("links") {
        let links_path = footer_path.key("links");
        match links.as_array() {
            Some(list) => {
                for (i, link) in list.iter().enumerate() {
                    validate_nav_link(link, &links_path.index(i), errors);
                }
            }
            None => errors.push(Issue::new(&links_path, "must be a list")),
        }
    }
}

// ============================================================================
// Section dispatch + warnings
// ============================================================================

fn validate_sections(sections: &[Value], errors: &mut Vec<Issue>) {
    let sections_path = FieldPath::root().key("sections");
    for (i, section) in sections.iter().enumerate() {
        let section_path = sections_path.index(i);
        let Some(obj) = section.as_object() else {
            errors.push(Issue::new(&section_path, "must be an object"));
            continue;
        };

        let section_type = match require(obj, "type", &section_path, errors) {
            Some(type_value) => match type_value.as_str() {
                Some(tag) => match SectionType::from_tag(tag) {
                    Some(ty) => Some(ty),
                    None => {
                        errors.push(Issue::new(
                            &section_path.key("type"),
                            format!(
                                "Unknown section type \"{tag}\" (known types: {})",
                                SectionType::all_tags().join(", ")
                            ),
                        ));
                        None
                    }
                },
                None => {
                    errors.push(Issue::new(&section_path.key("type"), "must be a string"));
                    None
                }
            },
            None => None,
        };

        if let Some(id) = require(obj, "id", &section_path, errors) {
            check_non_empty_string(id, &section_path.key("id"), errors);
        }

        if let Some(ty) = section_type {
            match require(obj, "props", &section_path, errors) {
                Some(props) => ty.validate_props(props, &section_path.key("props"), errors),
                None => {}
            }
        }
    }
}

/// Duplicate section ids degrade anchor navigation but do not break
/// rendering: one warning per duplicate occurrence after the first.
fn collect_section_warnings(sections: &[Value], warnings: &mut Vec<Issue>) {
    let sections_path = FieldPath::root().key("sections");
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (i, section) in sections.iter().enumerate() {
        let Some(id) = section.get("id").and_then(Value::as_str) else {
            continue;
        };
        match first_seen.get(id) {
            Some(first) => warnings.push(Issue::new(
                &sections_path.index(i).key("id"),
                format!("duplicate section id \"{id}\" (first used by sections[{first}])"),
            )),
            None => {
                first_seen.insert(id, i);
            }
        }
    }
}
