//! Option items returned by the lookup endpoints.

use serde::{Deserialize, Serialize};

/// One selectable option. Order is whatever the server returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: String,
    pub label: String,
}

impl OptionItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Response body of the brigade and role lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsEnvelope {
    #[serde(default)]
    pub data: Vec<RawOption>,
}

/// Ids come back as numbers or strings depending on the model.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOption {
    pub id: serde_json::Value,
    pub nombre: String,
}

impl From<OptionsEnvelope> for Vec<OptionItem> {
    fn from(envelope: OptionsEnvelope) -> Self {
        envelope
            .data
            .into_iter()
            .map(|raw| {
                let id = match raw.id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                OptionItem::new(id, raw.nombre)
            })
            .collect()
    }
}
