//! Locale-character lint: best-effort detection of missing diacritics.
//!
//! Content for languages that use diacritics is often typed on an ASCII
//! keyboard or pasted through a pipeline that strips combining characters,
//! leaving "Uber uns" where "Über uns" was meant. This pass scans every
//! localized string in the tree for known-suspicious ASCII-only substrings
//! and emits warnings — never errors. It is advisory linting: false positives
//! and negatives are acceptable, and a warning never blocks a build.
//!
//! The rule set is a data table (language code → suspicious patterns with
//! suggested replacements), so new languages or patterns are added here
//! without touching the validation orchestrator.

use crate::issue::{FieldPath, Issue};
use serde_json::Value;

/// One suspicious pattern: the ASCII spelling and the likely intended form.
struct LintRule {
    pattern: &'static str,
    suggestion: &'static str,
}

const fn rule(pattern: &'static str, suggestion: &'static str) -> LintRule {
    LintRule {
        pattern,
        suggestion,
    }
}

/// Languages known to use diacritics, with their suspicious ASCII spellings.
const LANG_RULES: &[(&str, &[LintRule])] = &[
    (
        "de",
        &[
            rule("Uber", "Über"),
            rule("Munchen", "München"),
            rule("Strasse", "Straße"),
            rule("Grosse", "Größe"),
            rule("Offnungszeiten", "Öffnungszeiten"),
            rule("fur Sie", "für Sie"),
        ],
    ),
    (
        "fr",
        &[
            rule("A propos", "À propos"),
            rule("Telephone", "Téléphone"),
            rule("Equipe", "Équipe"),
            rule("Realisations", "Réalisations"),
        ],
    ),
    (
        "es",
        &[
            rule("Espanol", "Español"),
            rule("Atencion", "Atención"),
            rule("Informacion", "Información"),
            rule("anos", "años"),
        ],
    ),
    (
        "pt",
        &[
            rule("Informacao", "Informação"),
            rule("Servicos", "Serviços"),
            rule("Preco", "Preço"),
        ],
    ),
];

fn rules_for(lang: &str) -> &'static [LintRule] {
    LANG_RULES
        .iter()
        .find(|(code, _)| *code == lang)
        .map(|(_, rules)| *rules)
        .unwrap_or(&[])
}

/// Scan the tree for suspicious ASCII spellings in localized strings.
///
/// `languages` is the site's configured language list (or just the default
/// language when no list is given). Per-language map entries are checked
/// against that language's rules only; plain strings serve every language,
/// so they are checked against the union of rules for all configured
/// languages.
pub fn lint_localized_strings(root: &Value, languages: &[String]) -> Vec<Issue> {
    let target_langs: Vec<&str> = languages
        .iter()
        .map(String::as_str)
        .filter(|lang| !rules_for(lang).is_empty())
        .collect();
    if target_langs.is_empty() {
        return Vec::new();
    }

    let mut warnings = Vec::new();
    walk(root, &FieldPath::root(), languages, &target_langs, &mut warnings);
    warnings
}

fn walk(
    value: &Value,
    path: &FieldPath,
    languages: &[String],
    target_langs: &[&str],
    warnings: &mut Vec<Issue>,
) {
    match value {
        Value::String(s) => {
            for lang in target_langs {
                check_string(s, rules_for(lang), path, warnings);
            }
        }
        Value::Object(map) => {
            // A map whose keys are all configured languages and whose values
            // are all strings is a LocalizedText: check each entry against
            // its own language's rules.
            let is_lang_map = !map.is_empty()
                && map
                    .iter()
                    .all(|(k, v)| languages.iter().any(|l| l == k) && v.is_string());
            if is_lang_map {
                for (lang, entry) in map {
                    if let Some(s) = entry.as_str() {
                        check_string(s, rules_for(lang), &path.key(lang), warnings);
                    }
                }
            } else {
                for (key, entry) in map {
                    walk(entry, &path.key(key), languages, target_langs, warnings);
                }
            }
        }
        Value::Array(list) => {
            for (i, entry) in list.iter().enumerate() {
                walk(entry, &path.index(i), languages, target_langs, warnings);
            }
        }
        _ => {}
    }
}

fn check_string(s: &str, rules: &[LintRule], path: &FieldPath, warnings: &mut Vec<Issue>) {
    for rule in rules {
        if s.contains(rule.pattern) {
            warnings.push(Issue::new(
                path,
                format!(
                    "suspicious spelling \"{}\" — did you mean \"{}\"?",
                    rule.pattern, rule.suggestion
                ),
            ));
        }
    }
}
