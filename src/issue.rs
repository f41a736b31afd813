//! Validation defects as data.
//!
//! A failed check is a value, not an exceptional control-flow event. Every
//! defect is an [`Issue`]: a field-access path from the document root plus a
//! human-readable message. The orchestrator collects issues into a
//! [`ValidationReport`] with separate error and warning lists, so an author
//! sees every problem in one pass instead of fixing them one re-run at a time.
//!
//! ## Paths
//!
//! Paths read like field access in the source document:
//!
//! ```text
//! defaultLanguage
//! navigation.links[0].label
//! sections[2].props.title
//! ```
//!
//! [`FieldPath`] builds these incrementally as validators descend the tree.
//! Cloning is cheap enough for a single validation pass over one document.

use std::fmt;

/// A field-access path from the document root, e.g. `sections[2].props.title`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    /// The document root (empty path).
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Descend into an object key: `sections` → `sections.props`.
    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    /// Descend into a list element: `sections` → `sections[2]`.
    pub fn index(&self, idx: usize) -> Self {
        Self(format!("{}[{}]", self.0, idx))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// One validation defect or warning, addressed by path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: &FieldPath, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating one configuration document.
///
/// `valid` is true iff `errors` is empty; warnings never affect validity.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
