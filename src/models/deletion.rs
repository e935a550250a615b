//! Delete endpoint payload and the confirmation copy shown before calling it.

use serde::{Deserialize, Deserializer, Serialize};

/// Body returned by the delete view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub msg: String,
    /// Set when the server refused the delete for a business reason
    #[serde(default, deserialize_with = "falsy_marker")]
    pub tipo_msg: Option<String>,
}

/// `tipo_msg` is a string when set and any falsy JSON value otherwise.
fn falsy_marker<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Bool(true) => Some("true".to_string()),
        serde_json::Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    })
}

impl DeleteResponse {
    /// A non-empty `tipo_msg` marks a refusal.
    pub fn is_refusal(&self) -> bool {
        self.tipo_msg
            .as_deref()
            .is_some_and(|kind| !kind.is_empty())
    }
}

/// Copy of the confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmPrompt {
    pub fn delete_person() -> Self {
        Self {
            title: "Importante".to_string(),
            text: "¿Está seguro que desea eliminar a la persona seleccionada?".to_string(),
            confirm_label: "SI".to_string(),
            cancel_label: "NO".to_string(),
        }
    }
}

/// How a notice is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}
