//! Remote asset resolution: download, deduplicate, rewrite.
//!
//! Takes a validated configuration tree, finds every remote reference (via
//! [`crate::walker`]), downloads each unique URL into a destination
//! directory, and rewrites every occurrence to the local path. The mutated
//! tree is then written back to the content file, which is what makes repeat
//! runs idempotent: resolved fields hold local paths the walker ignores.
//!
//! ## Filename derivation and caching
//!
//! A URL's filename is derived deterministically: last path segment,
//! percent-decoded, stripped of characters unsafe for a filename, leading
//! dots removed; an empty result falls back to a short hash of the full URL.
//! Determinism is load-bearing — the idempotency check is a content-location
//! cache keyed by *filename-from-URL*, not by content hash: if the derived
//! name already exists in the destination directory (and was not claimed by
//! a different URL this run), the network call is skipped entirely and the
//! file is reused.
//!
//! ## Collisions and concurrency
//!
//! Two different URLs can derive the same base filename; the loser gets a
//! numeric suffix (`image_2.jpg`, `image_3.jpg`, …). Downloads for distinct
//! URLs run in parallel on the rayon pool; the filename reservation set is
//! the only shared mutable state, and its check-and-insert is atomic behind
//! a mutex so two URLs can never claim the same name.
//!
//! ## Failure policy
//!
//! One URL's failure never aborts the pass: the stage completes best-effort
//! over all unique URLs and reports an aggregate error list. The caller
//! decides whether any error is fatal to the build. Redirects are followed
//! manually (relative `Location` values resolved against the current URL)
//! up to [`MAX_REDIRECTS`] hops; each request carries its own timeout, so
//! one hung URL cannot stall the others.

use crate::walker::{self, SlotPath};
use percent_encoding::percent_decode_str;
use rayon::prelude::*;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use std::time::Duration;
use thiserror::Error;
use ureq::Agent;
use url::Url;

/// Maximum redirect hops for a single URL.
pub const MAX_REDIRECTS: u32 = 5;

/// Per-request timeout. Timing out one URL must not affect others in flight.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolution failure for one URL.
#[derive(Error, Debug)]
#[error("{url}: {kind}")]
pub struct AssetError {
    pub url: String,
    pub kind: AssetErrorKind,
}

#[derive(Error, Debug)]
pub enum AssetErrorKind {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("redirect without a Location header")]
    MissingLocation,
    #[error("too many redirects (limit {MAX_REDIRECTS})")]
    TooManyRedirects,
    #[error("IO error: {0}")]
    Io(String),
}

/// One successfully resolved URL.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub url: String,
    /// Filename inside the destination directory.
    pub filename: String,
    /// Path written into the configuration (forward slashes).
    pub local_path: String,
    /// Bytes downloaded, or on-disk size for cache hits.
    pub bytes: u64,
    /// True when the file already existed and no fetch was made.
    pub cached: bool,
    /// How many configuration slots referenced this URL.
    pub refs: usize,
}

/// Progress event emitted per URL as resolution completes.
#[derive(Debug, Clone)]
pub enum FetchEvent {
    Resolved {
        url: String,
        local_path: String,
        bytes: u64,
        cached: bool,
    },
    Failed {
        url: String,
        message: String,
    },
}

/// Aggregate outcome of one asset-resolution pass.
#[derive(Debug, Default)]
pub struct AssetReport {
    pub resolved: Vec<ResolvedAsset>,
    pub errors: Vec<AssetError>,
    /// Total configuration slots rewritten to local paths.
    pub rewritten: usize,
}

impl AssetReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn downloaded(&self) -> usize {
        self.resolved.iter().filter(|r| !r.cached).count()
    }

    pub fn cached(&self) -> usize {
        self.resolved.iter().filter(|r| r.cached).count()
    }
}

impl fmt::Display for AssetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unique = self.resolved.len() + self.errors.len();
        write!(
            f,
            "{} downloaded, {} cached, {} failed ({} unique urls, {} references)",
            self.downloaded(),
            self.cached(),
            self.errors.len(),
            unique,
            self.rewritten
        )
    }
}

/// Resolve every remote reference in the tree, rewriting slots in place.
///
/// Returns `Err` only when the destination directory itself cannot be
/// created; per-URL failures are data in the report.
pub fn resolve_assets(
    tree: &mut Value,
    dest_dir: &Path,
    progress: Option<Sender<FetchEvent>>,
) -> io::Result<AssetReport> {
    // Group occurrences by URL value: at most one fetch per unique URL.
    let mut by_url: HashMap<String, Vec<SlotPath>> = HashMap::new();
    for asset_ref in walker::collect(tree) {
        by_url.entry(asset_ref.url).or_default().push(asset_ref.slot);
    }
    if by_url.is_empty() {
        return Ok(AssetReport::default());
    }

    fs::create_dir_all(dest_dir)?;
    let prefix = local_prefix(dest_dir);
    let agent = create_agent();
    let claimed: Mutex<HashSet<String>> = Mutex::new(HashSet::new());

    let results: Vec<(String, Vec<SlotPath>, Result<(String, u64, bool), AssetErrorKind>)> = by_url
        .into_par_iter()
        .map(|(url, slots)| {
            let outcome = resolve_one(&agent, &url, dest_dir, &claimed);
            if let Some(tx) = &progress {
                let event = match &outcome {
                    Ok((filename, bytes, cached)) => FetchEvent::Resolved {
                        url: url.clone(),
                        local_path: join_local(&prefix, filename),
                        bytes: *bytes,
                        cached: *cached,
                    },
                    Err(kind) => FetchEvent::Failed {
                        url: url.clone(),
                        message: kind.to_string(),
                    },
                };
                // Receiver may have hung up; progress is best-effort.
                let _ = tx.send(event);
            }
            (url, slots, outcome)
        })
        .collect();

    let mut report = AssetReport::default();
    for (url, slots, outcome) in results {
        match outcome {
            Ok((filename, bytes, cached)) => {
                let local_path = join_local(&prefix, &filename);
                for slot in &slots {
                    if walker::set_at(tree, slot, &local_path) {
                        report.rewritten += 1;
                    }
                }
                report.resolved.push(ResolvedAsset {
                    url,
                    filename,
                    local_path,
                    bytes,
                    cached,
                    refs: slots.len(),
                });
            }
            Err(kind) => report.errors.push(AssetError { url, kind }),
        }
    }
    Ok(report)
}

fn create_agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(DOWNLOAD_TIMEOUT))
        .http_status_as_error(false)
        .max_redirects(0)
        .build()
        .into()
}

fn resolve_one(
    agent: &Agent,
    url: &str,
    dest_dir: &Path,
    claimed: &Mutex<HashSet<String>>,
) -> Result<(String, u64, bool), AssetErrorKind> {
    match claim_filename(url, dest_dir, claimed) {
        Claim::Reuse(filename) => {
            let bytes = fs::metadata(dest_dir.join(&filename)).map(|m| m.len()).unwrap_or(0);
            Ok((filename, bytes, true))
        }
        Claim::Download(filename) => {
            let bytes = fetch_to_file(agent, url, &dest_dir.join(&filename))?;
            Ok((filename, bytes, false))
        }
    }
}

// ============================================================================
// Filename derivation and reservation
// ============================================================================

enum Claim {
    /// File already on disk from a prior run; skip the network entirely.
    Reuse(String),
    /// Name reserved for this URL; download into it.
    Download(String),
}

/// Atomically decide this URL's filename.
///
/// The whole decision runs under one lock so that a check-and-insert can
/// never interleave with another URL's: two URLs deriving the same base name
/// get `name` and `name_2.ext`, regardless of scheduling.
fn claim_filename(url: &str, dest_dir: &Path, claimed: &Mutex<HashSet<String>>) -> Claim {
    let derived = derive_filename(url);
    let mut claimed = claimed.lock().unwrap_or_else(|e| e.into_inner());

    // Idempotency: a file with the derived (non-uniquified) name is a cache
    // hit — unless another URL claimed that name earlier this run.
    if !claimed.contains(&derived) && dest_dir.join(&derived).is_file() {
        claimed.insert(derived.clone());
        return Claim::Reuse(derived);
    }

    let (stem, ext) = split_name(&derived);
    let mut candidate = derived.clone();
    let mut n = 2;
    while claimed.contains(&candidate) || dest_dir.join(&candidate).exists() {
        candidate = format!("{stem}_{n}{ext}");
        n += 1;
    }
    claimed.insert(candidate.clone());
    Claim::Download(candidate)
}

/// Derive a stable, filesystem-safe filename from a URL.
pub fn derive_filename(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");
    let decoded = percent_decode_str(last_segment).decode_utf8_lossy();

    let cleaned: String = decoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        let digest = Sha256::digest(url.as_bytes());
        format!("{digest:x}")[..12].to_string()
    } else {
        cleaned.to_string()
    }
}

/// Split `image.jpg` into `("image", ".jpg")` for suffix insertion.
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

fn local_prefix(dest_dir: &Path) -> String {
    dest_dir
        .to_string_lossy()
        .replace('\\', "/")
        .trim_end_matches('/')
        .trim_start_matches("./")
        .to_string()
}

fn join_local(prefix: &str, filename: &str) -> String {
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{prefix}/{filename}")
    }
}

// ============================================================================
// HTTP fetch with manual redirect handling
// ============================================================================

/// Download `url` into `dest`, following up to [`MAX_REDIRECTS`] redirects.
///
/// The body streams straight to the destination file; a failed write deletes
/// the partial file before the error propagates — a truncated asset must
/// never survive on disk.
fn fetch_to_file(agent: &Agent, url: &str, dest: &Path) -> Result<u64, AssetErrorKind> {
    let mut current = Url::parse(url).map_err(|e| AssetErrorKind::InvalidUrl(e.to_string()))?;

    for _ in 0..=MAX_REDIRECTS {
        let response = agent
            .get(current.as_str())
            .call()
            .map_err(|e| AssetErrorKind::Http(e.to_string()))?;
        let status = response.status().as_u16();

        if (300..400).contains(&status) {
            let location = response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok())
                .ok_or(AssetErrorKind::MissingLocation)?;
            // Relative redirects resolve against the URL that issued them.
            current = current
                .join(location)
                .map_err(|e| AssetErrorKind::InvalidUrl(e.to_string()))?;
            continue;
        }
        if !(200..300).contains(&status) {
            return Err(AssetErrorKind::Status(status));
        }

        let mut reader = response.into_body().into_reader();
        let mut file = File::create(dest).map_err(|e| AssetErrorKind::Io(e.to_string()))?;
        return match io::copy(&mut reader, &mut file) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(dest);
                Err(AssetErrorKind::Io(e.to_string()))
            }
        };
    }
    Err(AssetErrorKind::TooManyRedirects)
}
