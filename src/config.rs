//! Typed view of a validated site configuration.
//!
//! Validation runs on the raw `serde_json::Value` tree so that every problem
//! can be reported with a precise field path instead of stopping at the first
//! deserialization error. Once a document has passed validation, downstream
//! consumers want real types, not `Value` spelunking — this module is that
//! typed view.
//!
//! The structs here are deliberately permissive (`Option` everywhere the
//! schema allows omission, `props` kept as raw `Value`): the validator is the
//! single source of truth for what is required, and deserializing an already
//! validated tree must not fail on shape. Section props stay untyped because
//! each section type has its own schema and renderers consume them
//! generically.

use crate::locale::LocalizedText;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration shape error: {0}")]
    Shape(#[from] serde_json::Error),
}

/// A complete site configuration, deserialized from a validated tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub name: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    pub default_language: String,
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Value>,
    pub navigation: Navigation,
    pub sections: Vec<SectionBlock>,
    pub footer: Footer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
}

impl SiteConfig {
    /// Build the typed view from a tree that already passed validation.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Languages the site serves: the configured list, or just the default.
    pub fn languages(&self) -> Vec<String> {
        match &self.languages {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![self.default_language.clone()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub colors: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub links: Vec<NavLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub label: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// One section of the page: a type tag, a unique id, and type-specific props.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionBlock {
    #[serde(rename = "type")]
    pub section_type: String,
    pub id: String,
    pub props: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<NavLink>>,
}
