use crate::camera::CameraOptions;
use crate::error::{Error, Result};
use canopy_layout::LayoutOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Viewer configuration. Every field has a default, so `{}` is a valid document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CanopyConfig {
    pub layout: LayoutOptions,
    pub camera: CameraOptions,
}

impl CanopyConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(invalid)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(invalid)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::LoadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Applies a partial JSON document on top of the current values.
    ///
    /// Objects merge key by key; any other value replaces the existing one. On error `self` is left
    /// untouched.
    pub fn merge_json(&mut self, overrides: &Value) -> Result<()> {
        let mut merged = self.to_value();
        deep_merge_value(&mut merged, overrides);
        *self = Self::from_value(merged)?;
        Ok(())
    }
}

fn invalid(err: serde_json::Error) -> Error {
    Error::InvalidConfig {
        message: err.to_string(),
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
