//! # Sitesmith
//!
//! Pre-render pipeline for config-driven small-business sites. One
//! configuration file is the data source: it declares the site identity,
//! theme, navigation, and an ordered list of typed sections, with every
//! textual field available per language.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! The pipeline runs two independent stages over the same document tree:
//!
//! ```text
//! 1. Check     site.yaml  →  ValidationReport   (schema + cross-field rules)
//! 2. Fetch     site.yaml  →  assets/ + rewrite  (remote URLs → local files)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **No partial effects**: fetch only runs against a document that already
//!   passed check, so a typo can never leave half the assets downloaded.
//! - **Idempotency**: fetch rewrites remote URLs to local paths in the
//!   document itself, so the next run finds nothing left to download.
//! - **Testability**: check is a pure function from tree to report; fetch is
//!   exercised against a local HTTP server in the integration suite.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`issue`] | Validation defects as data: field paths, issues, reports |
//! | [`locale`] | `LocalizedText` (plain or per-language) and fallback resolution |
//! | [`primitives`] | Field-level checks shared by every schema: strings, URLs, buttons |
//! | [`sections`] | The closed set of section types and their per-type prop schemas |
//! | [`validate`] | Orchestrator — root schema, section dispatch, warnings |
//! | [`lint`] | Advisory diacritic heuristics for localized strings |
//! | [`content`] | YAML/JSON document loading and same-format write-back |
//! | [`walker`] | Remote-URL discovery with rewritable slot addresses |
//! | [`assets`] | Parallel downloader: dedup, filename cache, collision suffixes |
//! | [`annotate`] | Image tagging contract and content-addressed annotation cache |
//! | [`config`] | Typed `SiteConfig` view of an already-validated tree |
//! | [`output`] | CLI output formatting — path-first display of pipeline results |
//!
//! # Design Decisions
//!
//! ## Validation Over Raw Trees
//!
//! Validation runs on `serde_json::Value`, not on typed structs. Serde's
//! derive would stop at the first shape mismatch with a parser-voice error;
//! the validator instead walks the whole tree and reports *every* problem,
//! each addressed by a field path (`sections[2].props.title`) the author can
//! navigate to directly. The typed [`config::SiteConfig`] view is built only
//! after validation passes, so it never has to be defensive.
//!
//! ## Errors Block, Warnings Advise
//!
//! A missing required field is an error and fails the build. A duplicate
//! section id, a missing seo block, or a suspicious ASCII spelling in German
//! text degrade the result without breaking it — those are warnings, printed
//! but never fatal. The split is fixed per rule, not configurable: a rule
//! that can be demoted will be.
//!
//! ## Filename-Addressed Asset Cache
//!
//! The downloader's idempotency key is the filename derived from the URL,
//! checked against the destination directory — not a manifest, not an mtime.
//! The document rewrite makes this mostly moot (resolved fields no longer
//! hold URLs), but it also means a re-run after a partial failure skips
//! everything that already landed on disk. Within one run, a mutex-guarded
//! reservation set keeps two URLs from ever claiming the same name.

pub mod annotate;
pub mod assets;
pub mod config;
pub mod content;
pub mod issue;
pub mod lint;
pub mod locale;
pub mod output;
pub mod primitives;
pub mod sections;
pub mod validate;
pub mod walker;

#[cfg(test)]
pub(crate) mod test_helpers;
