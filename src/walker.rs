//! Remote asset reference collection and in-place rewriting.
//!
//! Walks a validated configuration tree and collects every string value that
//! looks like a remote resource reference (`http://` or `https://`), together
//! with the exact slot it occupies. The same URL may appear in many unrelated
//! places — a navigation logo, a gallery image, a social link — and each
//! occurrence must be rewritable individually, so a collected reference is a
//! [`SlotPath`]: the sequence of object keys and array indices leading from
//! the root to that one string.
//!
//! Callers must not rely on discovery order. Recursion terminates on the
//! finite tree: the document comes from deserialized content, so no cycles
//! are possible.

use serde_json::Value;
use std::fmt;

/// One step into the tree: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    Key(String),
    Index(usize),
}

/// Address of a single string slot in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPath(Vec<PathSeg>);

impl fmt::Display for SlotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSeg::Key(k) if i == 0 => write!(f, "{k}")?,
                PathSeg::Key(k) => write!(f, ".{k}")?,
                PathSeg::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// A collected remote reference: where it lives and what it points at.
#[derive(Debug, Clone)]
pub struct AssetRef {
    pub slot: SlotPath,
    pub url: String,
}

/// True for strings the downloader should resolve.
pub fn is_remote_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Collect every remote-URL slot in the tree.
pub fn collect(root: &Value) -> Vec<AssetRef> {
    let mut refs = Vec::new();
    collect_into(root, &mut Vec::new(), &mut refs);
    refs
}

fn collect_into(value: &Value, trail: &mut Vec<PathSeg>, refs: &mut Vec<AssetRef>) {
    match value {
        Value::String(s) => {
            if is_remote_url(s) {
                refs.push(AssetRef {
                    slot: SlotPath(trail.clone()),
                    url: s.clone(),
                });
            }
        }
        Value::Object(map) => {
            for (key, entry) in map {
                trail.push(PathSeg::Key(key.clone()));
                collect_into(entry, trail, refs);
                trail.pop();
            }
        }
        Value::Array(list) => {
            for (i, entry) in list.iter().enumerate() {
                trail.push(PathSeg::Index(i));
                collect_into(entry, trail, refs);
                trail.pop();
            }
        }
        _ => {}
    }
}

/// Overwrite the string at `slot` with `new_value`.
///
/// Returns false if the slot no longer exists — which cannot happen in the
/// collect-then-rewrite flow, where the tree is not reshaped in between.
pub fn set_at(root: &mut Value, slot: &SlotPath, new_value: &str) -> bool {
    let mut current = root;
    for seg in &slot.0 {
        let next = match seg {
            PathSeg::Key(k) => current.get_mut(k.as_str()),
            PathSeg::Index(i) => current.get_mut(*i),
        };
        match next {
            Some(v) => current = v,
            None => return false,
        }
    }
    *current = Value::String(new_value.to_string());
    true
}
