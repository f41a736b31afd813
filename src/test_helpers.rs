//! Shared test utilities for the sitesmith test suite.
//!
//! The central fixture is [`sample_config`]: a complete, valid configuration
//! tree. Tests start from it and mutate the one field under test, so a
//! schema change only has to be reflected here.

use serde_json::{Value, json};

/// A complete configuration that passes validation with no errors.
pub fn sample_config() -> Value {
    json!({
        "name": "Demo Bakery",
        "url": "https://demo-bakery.example",
        "languages": ["en"],
        "defaultLanguage": "en",
        "theme": {
            "colors": {
                "primary": "#8b5a2b",
                "accent": "#e94560",
                "background": "#fffaf0"
            },
            "fonts": {
                "heading": "Playfair Display",
                "body": "Lato"
            }
        },
        "seo": {
            "title": "Demo Bakery",
            "description": "Fresh bread, daily."
        },
        "navigation": {
            "links": [
                {"label": "Home", "anchor": "top"},
                {"label": "About", "anchor": "about"},
                {"label": "Contact", "anchor": "contact"}
            ]
        },
        "sections": [
            {
                "type": "hero",
                "id": "top",
                "props": {
                    "title": "Welcome to Demo Bakery",
                    "subtitle": "Fresh bread, daily."
                }
            },
            {
                "type": "about",
                "id": "about",
                "props": {
                    "title": "About us",
                    "text": "A small neighbourhood bakery."
                }
            },
            {
                "type": "contact",
                "id": "contact",
                "props": {
                    "title": "Contact",
                    "email": "hello@demo-bakery.example"
                }
            }
        ],
        "footer": {
            "text": "© Demo Bakery",
            "social": [
                {"platform": "instagram", "url": "https://instagram.com/demobakery"}
            ]
        }
    })
}

/// Error paths from a report, in order. Keeps assertions one line long.
pub fn error_paths(report: &crate::issue::ValidationReport) -> Vec<&str> {
    report.errors.iter().map(|i| i.path.as_str()).collect()
}
