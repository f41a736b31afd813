//! Section schema registry.
//!
//! A page is an ordered list of content blocks, each tagged with one of a
//! closed set of eleven section types. The tag selects which schema applies
//! to the block's `props` payload — polymorphic dispatch over a closed enum,
//! with an exhaustive match from tag to schema function. An unrecognized tag
//! is a hard validation error at the section level, never a silent skip:
//! the section-type set is a contract between content files and the
//! render layer.
//!
//! Each schema is a pure function over the untyped `props` value. Schemas
//! encode required-vs-optional fields, list-length bounds (hero stats must
//! have 2–4 entries, testimonials must be non-empty), and cross-field rules
//! (a services section needs a flat `services` list or a `groups` list).

use crate::issue::{FieldPath, Issue};
use crate::primitives::{
    check_cta_button, check_localized_text, check_non_empty_string, check_url_string, require,
};
use serde_json::{Map, Value};

/// The closed set of section type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionType {
    Hero,
    Services,
    Gallery,
    About,
    Contact,
    Hours,
    Featured,
    Testimonials,
    CtaBanner,
    TextBlock,
    Map,
}

impl SectionType {
    /// Look up a schema by its tag. `None` means "Unknown section type".
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hero" => Some(Self::Hero),
            "services" => Some(Self::Services),
            "gallery" => Some(Self::Gallery),
            "about" => Some(Self::About),
            "contact" => Some(Self::Contact),
            "hours" => Some(Self::Hours),
            "featured" => Some(Self::Featured),
            "testimonials" => Some(Self::Testimonials),
            "cta-banner" => Some(Self::CtaBanner),
            "text-block" => Some(Self::TextBlock),
            "map" => Some(Self::Map),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Services => "services",
            Self::Gallery => "gallery",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Hours => "hours",
            Self::Featured => "featured",
            Self::Testimonials => "testimonials",
            Self::CtaBanner => "cta-banner",
            Self::TextBlock => "text-block",
            Self::Map => "map",
        }
    }

    /// All known tags, for error messages and documentation.
    pub fn all_tags() -> &'static [&'static str] {
        &[
            "hero",
            "services",
            "gallery",
            "about",
            "contact",
            "hours",
            "featured",
            "testimonials",
            "cta-banner",
            "text-block",
            "map",
        ]
    }

    /// Validate a section's `props` payload against this type's schema.
    pub fn validate_props(self, props: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
        let Some(obj) = props.as_object() else {
            issues.push(Issue::new(path, "props must be an object"));
            return;
        };
        match self {
            Self::Hero => validate_hero(obj, path, issues),
            Self::Services => validate_services(obj, path, issues),
            Self::Gallery => validate_gallery(obj, path, issues),
            Self::About => validate_about(obj, path, issues),
            Self::Contact => validate_contact(obj, path, issues),
            Self::Hours => validate_hours(obj, path, issues),
            Self::Featured => validate_featured(obj, path, issues),
            Self::Testimonials => validate_testimonials(obj, path, issues),
            Self::CtaBanner => validate_cta_banner(obj, path, issues),
            Self::TextBlock => validate_text_block(obj, path, issues),
            Self::Map => validate_map(obj, path, issues),
        }
    }
}

// ============================================================================
// Field helpers shared by the per-section schemas
// ============================================================================

fn optional_localized(obj: &Map<String, Value>, key: &str, path: &FieldPath, issues: &mut Vec<Issue>) {
    if let Some(v) = obj.get(key) {
        check_localized_text(v, &path.key(key), issues);
    }
}

fn required_localized(obj: &Map<String, Value>, key: &str, path: &FieldPath, issues: &mut Vec<Issue>) {
    if let Some(v) = require(obj, key, path, issues) {
        check_localized_text(v, &path.key(key), issues);
    }
}

fn optional_url(obj: &Map<String, Value>, key: &str, path: &FieldPath, issues: &mut Vec<Issue>) {
    if let Some(v) = obj.get(key) {
        check_url_string(v, &path.key(key), issues);
    }
}

fn optional_string(obj: &Map<String, Value>, key: &str, path: &FieldPath, issues: &mut Vec<Issue>) {
    if let Some(v) = obj.get(key) {
        check_non_empty_string(v, &path.key(key), issues);
    }
}

/// Fetch a required list field, rejecting empty lists.
fn required_non_empty_list<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &FieldPath,
    issues: &mut Vec<Issue>,
) -> Option<&'a Vec<Value>> {
    let value = require(obj, key, path, issues)?;
    let Some(list) = value.as_array() else {
        issues.push(Issue::new(&path.key(key), "must be a list"));
        return None;
    };
    if list.is_empty() {
        issues.push(Issue::new(&path.key(key), "must not be empty"));
        return None;
    }
    Some(list)
}

fn as_object_or_issue<'a>(
    value: &'a Value,
    path: &FieldPath,
    issues: &mut Vec<Issue>,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(obj) => Some(obj),
        None => {
            issues.push(Issue::new(path, "must be an object"));
            None
        }
    }
}

// ============================================================================
// Per-section schemas
// ============================================================================

fn validate_hero(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    required_localized(obj, "title", path, issues);
    optional_localized(obj, "subtitle", path, issues);
    optional_url(obj, "image", path, issues);
    if let Some(cta) = obj.get("cta") {
        check_cta_button(cta, &path.key("cta"), issues);
    }
    if let Some(stats) = obj.get("stats") {
        let stats_path = path.key("stats");
        let Some(list) = stats.as_array() else {
            issues.push(Issue::new(&stats_path, "must be a list"));
            return;
        };
        if !(2..=4).contains(&list.len()) {
            issues.push(Issue::new(&stats_path, "must have between 2 and 4 entries"));
        }
        for (i, stat) in list.iter().enumerate() {
            let stat_path = stats_path.index(i);
            if let Some(stat_obj) = as_object_or_issue(stat, &stat_path, issues) {
                if let Some(v) = require(stat_obj, "value", &stat_path, issues) {
                    check_non_empty_string(v, &stat_path.key("value"), issues);
                }
                required_localized(stat_obj, "label", &stat_path, issues);
            }
        }
    }
}

fn validate_service_entry(value: &Value, path: &FieldPath, issues: &mut Vec<Issue>) {
    if let Some(obj) = as_object_or_issue(value, path, issues) {
        required_localized(obj, "title", path, issues);
        optional_localized(obj, "description", path, issues);
        optional_string(obj, "icon", path, issues);
        optional_url(obj, "image", path, issues);
        optional_string(obj, "price", path, issues);
    }
}

fn validate_services(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    optional_localized(obj, "title", path, issues);
    optional_localized(obj, "intro", path, issues);

    let has_flat = obj.get("services").is_some();
    let has_groups = obj.get("groups").is_some();
    // One-of rule: a services section with nothing to list is invalid.
    // Both at once is accepted (flat list renders first).
    if !has_flat && !has_groups {
        issues.push(Issue::new(path, "either services or groups is required"));
        return;
    }

    if has_flat
        && let Some(list) = required_non_empty_list(obj, "services", path, issues)
    {
        for (i, service) in list.iter().enumerate() {
            validate_service_entry(service, &path.key("services").index(i), issues);
        }
    }
    if has_groups
        && let Some(groups) = required_non_empty_list(obj, "groups", path, issues)
    {
        for (i, group) in groups.iter().enumerate() {
            let group_path = path.key("groups").index(i);
            if let Some(group_obj) = as_object_or_issue(group, &group_path, issues) {
                required_localized(group_obj, "title", &group_path, issues);
                if let Some(list) = required_non_empty_list(group_obj, "services", &group_path, issues) {
                    for (j, service) in list.iter().enumerate() {
                        validate_service_entry(service, &group_path.key("services").index(j), issues);
                    }
                }
            }
        }
    }
}

fn validate_gallery(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    optional_localized(obj, "title", path, issues);
    if let Some(list) = required_non_empty_list(obj, "images", path, issues) {
        for (i, image) in list.iter().enumerate() {
            let image_path = path.key("images").index(i);
            match image {
                // Bare string form: just the image source.
                Value::String(_) => check_url_string(image, &image_path, issues),
                Value::Object(image_obj) => {
                    if let Some(src) = require(image_obj, "src", &image_path, issues) {
                        check_url_string(src, &image_path.key("src"), issues);
                    }
                    optional_localized(image_obj, "alt", &image_path, issues);
                    optional_localized(image_obj, "caption", &image_path, issues);
                }
                _ => issues.push(Issue::new(&image_path, "must be a URL or an image object")),
            }
        }
    }
}

fn validate_about(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    optional_localized(obj, "title", path, issues);
    required_localized(obj, "text", path, issues);
    optional_url(obj, "image", path, issues);
    if let Some(highlights) = obj.get("highlights") {
        let highlights_path = path.key("highlights");
        let Some(list) = highlights.as_array() else {
            issues.push(Issue::new(&highlights_path, "must be a list"));
            return;
        };
        for (i, item) in list.iter().enumerate() {
            check_localized_text(item, &highlights_path.index(i), issues);
        }
    }
}

fn validate_contact(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    optional_localized(obj, "title", path, issues);
    optional_localized(obj, "text", path, issues);
    optional_string(obj, "phone", path, issues);
    optional_string(obj, "email", path, issues);
    optional_localized(obj, "address", path, issues);
    if let Some(cta) = obj.get("cta") {
        check_cta_button(cta, &path.key("cta"), issues);
    }
}

fn validate_hours(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    optional_localized(obj, "title", path, issues);
    optional_localized(obj, "note", path, issues);
    if let Some(list) = required_non_empty_list(obj, "entries", path, issues) {
        for (i, entry) in list.iter().enumerate() {
            let entry_path = path.key("entries").index(i);
            if let Some(entry_obj) = as_object_or_issue(entry, &entry_path, issues) {
                required_localized(entry_obj, "days", &entry_path, issues);
                if let Some(hours) = require(entry_obj, "hours", &entry_path, issues) {
                    check_non_empty_string(hours, &entry_path.key("hours"), issues);
                }
            }
        }
    }
}

fn validate_featured(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    required_localized(obj, "title", path, issues);
    if let Some(list) = required_non_empty_list(obj, "items", path, issues) {
        for (i, item) in list.iter().enumerate() {
            let item_path = path.key("items").index(i);
            if let Some(item_obj) = as_object_or_issue(item, &item_path, issues) {
                required_localized(item_obj, "title", &item_path, issues);
                optional_localized(item_obj, "description", &item_path, issues);
                optional_url(item_obj, "image", &item_path, issues);
                optional_url(item_obj, "href", &item_path, issues);
            }
        }
    }
}

fn validate_testimonials(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    optional_localized(obj, "title", path, issues);
    if let Some(list) = required_non_empty_list(obj, "testimonials", path, issues) {
        for (i, entry) in list.iter().enumerate() {
            let entry_path = path.key("testimonials").index(i);
            if let Some(entry_obj) = as_object_or_issue(entry, &entry_path, issues) {
                required_localized(entry_obj, "quote", &entry_path, issues);
                optional_string(entry_obj, "author", &entry_path, issues);
                if let Some(rating) = entry_obj.get("rating") {
                    match rating.as_u64() {
                        Some(1..=5) => {}
                        _ => issues.push(Issue::new(
                            &entry_path.key("rating"),
                            "must be an integer between 1 and 5",
                        )),
                    }
                }
            }
        }
    }
}

fn validate_cta_banner(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    required_localized(obj, "title", path, issues);
    optional_localized(obj, "text", path, issues);
    match obj.get("cta") {
        Some(cta) => check_cta_button(cta, &path.key("cta"), issues),
        None => issues.push(Issue::new(&path.key("cta"), "required field is missing")),
    }
}

fn validate_text_block(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    optional_localized(obj, "title", path, issues);
    required_localized(obj, "text", path, issues);
}

fn validate_map(obj: &Map<String, Value>, path: &FieldPath, issues: &mut Vec<Issue>) {
    optional_localized(obj, "title", path, issues);
    optional_localized(obj, "address", path, issues);

    let has_embed = obj.get("embedUrl").is_some();
    let has_coords = obj.get("coordinates").is_some();
    if !has_embed && !has_coords {
        issues.push(Issue::new(path, "either embedUrl or coordinates is required"));
        return;
    }
    optional_url(obj, "embedUrl", path, issues);
    if let Some(coords) = obj.get("coordinates") {
        let coords_path = path.key("coordinates");
        if let Some(coords_obj) = as_object_or_issue(coords, &coords_path, issues) {
            for axis in ["lat", "lng"] {
                match coords_obj.get(axis) {
                    Some(v) if v.as_f64().is_some() => {}
                    Some(_) => issues.push(Issue::new(&coords_path.key(axis), "must be a number")),
                    None => issues.push(Issue::new(
                        &coords_path.key(axis),
                        "required field is missing",
                    )),
                }
            }
        }
    }
}
