//! Manifest parsing and dependency extraction.
//!
//! A manifest is a `package.json`-style JSON object. Only the
//! `dependencies` and `devDependencies` mappings are read; every other
//! field is ignored.

use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ScanError;

/// One declared dependency, before version normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    pub name: String,
    pub raw_version_spec: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, deserialize_with = "section")]
    dependencies: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "section")]
    dev_dependencies: Option<Map<String, Value>>,
}

/// Reads a dependency section. Falsy JSON values (`null`, `false`, `0`, `""`)
/// count as an absent section; any other non-object is rejected.
fn section<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(Some(map)),
        value if is_falsy(&value) => Ok(None),
        other => Err(de::Error::custom(format!(
            "dependency section must be an object, got {}",
            other
        ))),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, ScanError> {
        if text.trim().is_empty() {
            return Err(ScanError::EmptyManifest);
        }

        let value: Value = serde_json::from_str(text)
            .map_err(|e| ScanError::InvalidManifestFormat(e.to_string()))?;

        if !value.is_object() {
            return Err(ScanError::InvalidManifestFormat(
                "manifest must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| ScanError::InvalidManifestFormat(e.to_string()))
    }

    /// Merges `dependencies` and `devDependencies` into one set keyed by name.
    ///
    /// A dev entry replaces a same-named regular entry in place, so the
    /// position comes from `dependencies` and the version from
    /// `devDependencies`. Dev-only entries follow in their own order.
    pub fn dependencies(&self) -> Result<Vec<DependencyDeclaration>, ScanError> {
        let mut merged: Map<String, Value> = Map::new();
        for section in [&self.dependencies, &self.dev_dependencies].into_iter().flatten() {
            for (name, spec) in section {
                merged.insert(name.clone(), spec.clone());
            }
        }

        merged
            .into_iter()
            .map(|(name, spec)| match spec {
                Value::String(raw_version_spec) => Ok(DependencyDeclaration {
                    name,
                    raw_version_spec,
                }),
                other => Err(ScanError::InvalidManifestFormat(format!(
                    "version spec for '{}' must be a string, got {}",
                    name, other
                ))),
            })
            .collect()
    }
}
