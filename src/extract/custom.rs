use crate::extract::element_text;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;

/// Value of a custom selector field
///
/// Serializes as `null`, a string, or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Flattens the value into a single string, joining multiple matches with `"; "`
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Single(text) => text.clone(),
            FieldValue::Many(texts) => texts.join("; "),
        }
    }
}

/// Extracts one field per named CSS selector
///
/// # Arguments
///
/// * `document` - The parsed HTML document
/// * `selectors` - Field name to CSS selector
///
/// # Returns
///
/// A map with an entry for every requested field. A selector that fails to
/// parse produces `FieldValue::Null` and logs a warning.
pub fn extract_by_selector(
    document: &Html,
    selectors: &BTreeMap<String, String>,
) -> BTreeMap<String, FieldValue> {
    selectors
        .iter()
        .map(|(name, css)| (name.clone(), select_field(document, name, css)))
        .collect()
}

fn select_field(document: &Html, name: &str, css: &str) -> FieldValue {
    let selector = match Selector::parse(css) {
        Ok(sel) => sel,
        Err(e) => {
            tracing::warn!("Invalid selector for field '{}' ({}): {:?}", name, css, e);
            return FieldValue::Null;
        }
    };

    let mut texts: Vec<String> = document
        .select(&selector)
        .map(|el| element_text(el, " "))
        .collect();

    match texts.len() {
        0 => FieldValue::Null,
        1 => FieldValue::Single(texts.remove(0)),
        _ => FieldValue::Many(texts),
    }
}
