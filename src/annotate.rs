//! Image annotation: descriptive tags for downloaded assets.
//!
//! Downloaded images can be enriched with structured descriptions — what the
//! picture shows, its mood, dominant colors, a ready-to-use alt text. The
//! actual description comes from an [`ImageAnnotator`] implementation
//! supplied by the caller (typically a vision-model client); this module owns
//! the contract and the cache around it.
//!
//! # Caching
//!
//! Annotation is the slowest and most expensive step of the pipeline, so
//! results are cached **content-addressed**: the cache key is the SHA-256 of
//! the image file's bytes. Renaming or re-downloading an identical file never
//! re-annotates; only genuinely new image content does.
//!
//! The manifest is a JSON file at `<asset_dir>/.annotations.json`, living
//! beside the assets so it travels with the directory. A missing, corrupt,
//! or version-mismatched manifest degrades to an empty cache — annotation is
//! repeatable, never lossy.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the annotation manifest file within the asset directory.
const MANIFEST_FILENAME: &str = ".annotations.json";

/// Version of the manifest format. Bump to invalidate existing caches when
/// the tag schema changes.
const MANIFEST_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("annotator error: {0}")]
    Annotator(String),
}

/// Structured description of one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTags {
    /// Broad kind of image: "photo", "illustration", "logo", "icon".
    pub kind: String,
    /// One-sentence description of the image content.
    pub description: String,
    /// Primary subject ("storefront", "team portrait", "dish").
    pub subject: String,
    /// Subjective quality judgement ("sharp", "low-resolution", "noisy").
    pub quality: String,
    /// Overall mood ("warm", "professional", "playful").
    pub mood: String,
    /// Dominant colors, most prominent first.
    pub colors: Vec<String>,
    /// Accessibility text suitable for an `alt` attribute.
    pub alt_text: String,
}

/// Produces [`ImageTags`] for raw image bytes.
///
/// Implementations are expected to be expensive (network calls to a vision
/// model); callers should always go through [`annotate_file`] so the
/// content-addressed cache can absorb repeat work.
pub trait ImageAnnotator {
    fn annotate(&self, image: &[u8], filename: &str) -> Result<ImageTags, AnnotateError>;
}

/// On-disk manifest mapping content hashes to their tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationCache {
    pub version: u32,
    /// SHA-256 of the image bytes → tags.
    pub entries: HashMap<String, ImageTags>,
}

impl AnnotationCache {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the asset directory. Returns an empty cache if the manifest
    /// is missing, unparseable, or from a different format version.
    pub fn load(asset_dir: &Path) -> Self {
        let path = asset_dir.join(MANIFEST_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let cache: Self = match serde_json::from_str(&content) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        if cache.version != MANIFEST_VERSION {
            return Self::empty();
        }
        cache
    }

    pub fn save(&self, asset_dir: &Path) -> io::Result<()> {
        let path = asset_dir.join(MANIFEST_FILENAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    pub fn get(&self, content_hash: &str) -> Option<&ImageTags> {
        self.entries.get(content_hash)
    }

    pub fn insert(&mut self, content_hash: String, tags: ImageTags) {
        self.entries.insert(content_hash, tags);
    }
}

/// Annotate one file, consulting the cache first.
///
/// Returns the tags and whether they came from the cache.
pub fn annotate_file(
    annotator: &dyn ImageAnnotator,
    cache: &mut AnnotationCache,
    path: &Path,
) -> Result<(ImageTags, bool), AnnotateError> {
    let bytes = fs::read(path)?;
    let hash = hash_bytes(&bytes);
    if let Some(tags) = cache.get(&hash) {
        return Ok((tags.clone(), true));
    }
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tags = annotator.annotate(&bytes, &filename)?;
    cache.insert(hash, tags.clone());
    Ok((tags, false))
}

/// SHA-256 of a byte slice as a hex string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

/// Resolve the manifest path for an asset directory.
pub fn manifest_path(asset_dir: &Path) -> PathBuf {
    asset_dir.join(MANIFEST_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn sample_tags(description: &str) -> ImageTags {
        ImageTags {
            kind: "photo".into(),
            description: description.into(),
            subject: "storefront".into(),
            quality: "sharp".into(),
            mood: "warm".into(),
            colors: vec!["red".into(), "cream".into()],
            alt_text: description.into(),
        }
    }

    /// Counts invocations so tests can assert the cache absorbed the call.
    struct CountingAnnotator {
        calls: Cell<u32>,
    }

    impl CountingAnnotator {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl ImageAnnotator for CountingAnnotator {
        fn annotate(&self, _image: &[u8], filename: &str) -> Result<ImageTags, AnnotateError> {
            self.calls.set(self.calls.get() + 1);
            Ok(sample_tags(&format!("described {filename}")))
        }
    }

    #[test]
    fn first_annotation_calls_the_annotator() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hero.jpg");
        fs::write(&path, b"image bytes").unwrap();

        let annotator = CountingAnnotator::new();
        let mut cache = AnnotationCache::empty();
        let (tags, cached) = annotate_file(&annotator, &mut cache, &path).unwrap();

        assert!(!cached);
        assert_eq!(tags.description, "described hero.jpg");
        assert_eq!(annotator.calls.get(), 1);
    }

    #[test]
    fn identical_content_is_served_from_cache() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hero.jpg");
        fs::write(&path, b"image bytes").unwrap();
        // Same bytes under a different name: still a cache hit.
        let renamed = tmp.path().join("banner.jpg");
        fs::write(&renamed, b"image bytes").unwrap();

        let annotator = CountingAnnotator::new();
        let mut cache = AnnotationCache::empty();
        annotate_file(&annotator, &mut cache, &path).unwrap();
        let (_, cached) = annotate_file(&annotator, &mut cache, &renamed).unwrap();

        assert!(cached);
        assert_eq!(annotator.calls.get(), 1);
    }

    #[test]
    fn changed_content_is_re_annotated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hero.jpg");
        fs::write(&path, b"version 1").unwrap();

        let annotator = CountingAnnotator::new();
        let mut cache = AnnotationCache::empty();
        annotate_file(&annotator, &mut cache, &path).unwrap();

        fs::write(&path, b"version 2").unwrap();
        let (_, cached) = annotate_file(&annotator, &mut cache, &path).unwrap();

        assert!(!cached);
        assert_eq!(annotator.calls.get(), 2);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut cache = AnnotationCache::empty();
        cache.insert("abc123".into(), sample_tags("a red storefront"));
        cache.save(tmp.path()).unwrap();

        let loaded = AnnotationCache::load(tmp.path());
        assert_eq!(loaded.version, MANIFEST_VERSION);
        assert_eq!(
            loaded.get("abc123").map(|t| t.description.as_str()),
            Some("a red storefront")
        );
    }

    #[test]
    fn load_missing_manifest_returns_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(AnnotationCache::load(tmp.path()).entries.is_empty());
    }

    #[test]
    fn load_corrupt_manifest_returns_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(manifest_path(tmp.path()), "not json").unwrap();
        assert!(AnnotationCache::load(tmp.path()).entries.is_empty());
    }

    #[test]
    fn load_wrong_version_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let json = format!(r#"{{"version": {}, "entries": {{}}}}"#, MANIFEST_VERSION + 1);
        fs::write(manifest_path(tmp.path()), json).unwrap();
        assert!(AnnotationCache::load(tmp.path()).entries.is_empty());
    }

    #[test]
    fn hash_bytes_is_deterministic_hex() {
        let h = hash_bytes(b"hello");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_bytes(b"hello"));
        assert_ne!(h, hash_bytes(b"hello!"));
    }
}
