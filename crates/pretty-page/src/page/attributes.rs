//! Page-level configuration as a key/value bag.
//!
//! Keys are dotted strings (`"page.title"`, `"template.stylesheets"`); values
//! are arbitrary JSON values. The defaults describe the built-in page:
//!
//! | Key | Default |
//! |-----|---------|
//! | `template.resource` | `"views/layout.html.jinja"` |
//! | `template.stylesheets` | `["css/base.css"]` |
//! | `template.javascripts` | `[]` |
//! | `page.title` | `"Whoops! There was an error!"` |
//!
//! Stylesheet and script entries are resource names, or full URLs when
//! prefixed with `@` (`"@https://cdn.example.com/reset.css"`).
//!
//! Attributes can also be loaded from YAML, layered over the defaults:
//!
//! ```yaml
//! page.title: "Checkout failed"
//! template.stylesheets:
//!   - css/base.css
//!   - css/shop.css
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{RenderError, Result};

pub const TEMPLATE_RESOURCE: &str = "template.resource";
pub const TEMPLATE_STYLESHEETS: &str = "template.stylesheets";
pub const TEMPLATE_JAVASCRIPTS: &str = "template.javascripts";
pub const PAGE_TITLE: &str = "page.title";

/// String-keyed attribute bag with merge semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageAttributes {
    values: BTreeMap<String, JsonValue>,
}

impl Default for PageAttributes {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert(
            TEMPLATE_RESOURCE.to_string(),
            JsonValue::from("views/layout.html.jinja"),
        );
        values.insert(
            TEMPLATE_STYLESHEETS.to_string(),
            JsonValue::from(vec!["css/base.css"]),
        );
        values.insert(TEMPLATE_JAVASCRIPTS.to_string(), JsonValue::Array(Vec::new()));
        values.insert(
            PAGE_TITLE.to_string(),
            JsonValue::from("Whoops! There was an error!"),
        );
        Self { values }
    }
}

impl PageAttributes {
    /// Creates the default attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bag with no defaults.
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Parses a flat YAML mapping and layers it over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidArgument`] if the YAML is not a mapping
    /// of non-empty string keys.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let parsed: BTreeMap<String, JsonValue> = serde_yaml::from_str(yaml)
            .map_err(|e| RenderError::InvalidArgument(format!("invalid page attributes: {}", e)))?;

        let mut attributes = Self::default();
        for (name, value) in parsed {
            attributes.set(name, value)?;
        }
        Ok(attributes)
    }

    /// Reads a YAML file with [`from_yaml`](Self::from_yaml).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RenderError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Sets an attribute, replacing any existing value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Result<()> {
        let name = checked_name(name.into())?;
        self.values.insert(name, value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name)
    }

    /// Returns the attribute, or `default` when it is not set.
    pub fn get_or(&self, name: &str, default: JsonValue) -> JsonValue {
        self.values.get(name).cloned().unwrap_or(default)
    }

    /// Returns a string attribute.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(JsonValue::as_str)
    }

    /// Returns the string items of an array attribute, skipping non-strings.
    pub fn get_strings(&self, name: &str) -> Vec<String> {
        self.values
            .get(name)
            .and_then(JsonValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reports whether the attribute is set to something other than `null`.
    pub fn has(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|v| !v.is_null())
    }

    /// Appends `items` to an array attribute, creating it if missing.
    ///
    /// Returns the merged array.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidArgument`] if the name is empty or the
    /// existing value is not an array.
    pub fn merge(&mut self, name: &str, items: Vec<JsonValue>) -> Result<&[JsonValue]> {
        let name = checked_name(name.to_string())?;
        let entry = self
            .values
            .entry(name.clone())
            .or_insert_with(|| JsonValue::Array(Vec::new()));
        if entry.is_null() {
            *entry = JsonValue::Array(Vec::new());
        }

        match entry {
            JsonValue::Array(existing) => {
                existing.extend(items);
                Ok(existing.as_slice())
            }
            _ => Err(RenderError::InvalidArgument(format!(
                "attribute '{}' is not an array - cannot perform merge",
                name
            ))),
        }
    }

    /// Iterates over all attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn checked_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(RenderError::InvalidArgument(
            "attribute name must not be empty".into(),
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let attrs = PageAttributes::new();
        assert_eq!(attrs.get_str(TEMPLATE_RESOURCE), Some("views/layout.html.jinja"));
        assert_eq!(attrs.get_strings(TEMPLATE_STYLESHEETS), vec!["css/base.css"]);
        assert!(attrs.get_strings(TEMPLATE_JAVASCRIPTS).is_empty());
        assert!(attrs.has(PAGE_TITLE));
    }

    #[test]
    fn test_set_and_get() {
        let mut attrs = PageAttributes::empty();
        attrs.set("page.title", "Oops").unwrap();
        assert_eq!(attrs.get("page.title"), Some(&json!("Oops")));
        assert_eq!(attrs.get_or("missing", json!(7)), json!(7));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut attrs = PageAttributes::empty();
        assert!(matches!(attrs.set("", 1), Err(RenderError::InvalidArgument(_))));
        assert!(matches!(attrs.merge(" ", vec![]), Err(RenderError::InvalidArgument(_))));
    }

    #[test]
    fn test_has_treats_null_as_unset() {
        let mut attrs = PageAttributes::empty();
        attrs.set("x", JsonValue::Null).unwrap();
        assert!(!attrs.has("x"));
        assert!(!attrs.has("y"));
    }

    #[test]
    fn test_merge_appends() {
        let mut attrs = PageAttributes::new();
        let merged = attrs
            .merge(TEMPLATE_STYLESHEETS, vec![json!("css/extra.css")])
            .unwrap();
        assert_eq!(merged, &[json!("css/base.css"), json!("css/extra.css")]);
    }

    #[test]
    fn test_merge_creates_missing() {
        let mut attrs = PageAttributes::empty();
        attrs.merge("list", vec![json!(1)]).unwrap();
        assert_eq!(attrs.get("list"), Some(&json!([1])));
    }

    #[test]
    fn test_merge_into_scalar_fails() {
        let mut attrs = PageAttributes::new();
        let err = attrs.merge(PAGE_TITLE, vec![json!("x")]).unwrap_err();
        assert!(err.to_string().contains("not an array"));
    }

    #[test]
    fn test_from_yaml_layers_over_defaults() {
        let attrs = PageAttributes::from_yaml(
            r#"
            page.title: "Checkout failed"
            template.stylesheets:
              - css/base.css
              - "@https://cdn.example.com/reset.css"
            "#,
        )
        .unwrap();

        assert_eq!(attrs.get_str(PAGE_TITLE), Some("Checkout failed"));
        assert_eq!(attrs.get_strings(TEMPLATE_STYLESHEETS).len(), 2);
        assert_eq!(attrs.get_str(TEMPLATE_RESOURCE), Some("views/layout.html.jinja"));
    }

    #[test]
    fn test_from_yaml_rejects_non_mapping() {
        assert!(PageAttributes::from_yaml("- just\n- a list\n").is_err());
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let mut attrs = PageAttributes::empty();
        attrs.set(PAGE_TITLE, "T").unwrap();
        assert_eq!(serde_json::to_value(&attrs).unwrap(), json!({"page.title": "T"}));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.yaml");
        std::fs::write(&path, "page.title: From disk\n").unwrap();

        let attrs = PageAttributes::from_file(&path).unwrap();
        assert_eq!(attrs.get_str(PAGE_TITLE), Some("From disk"));
        assert!(PageAttributes::from_file(dir.path().join("missing.yaml")).is_err());
    }
}
