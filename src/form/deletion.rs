//! Delete button of the persons list: confirm, call, report.

use super::effects::UiEffect;
use crate::errors::FormError;
use crate::models::{ConfirmPrompt, DeleteResponse, Severity};
use crate::remote::RemoteRequest;

pub const DELETE_FAILED_TEXT: &str = "Ocurrio un error al eliminar, intente nuevamente";

#[derive(Debug, Clone)]
pub struct ListDeletionController {
    pending: Option<String>,
    home_url: String,
}

impl ListDeletionController {
    pub fn new(home_url: impl Into<String>) -> Self {
        Self {
            pending: None,
            home_url: home_url.into(),
        }
    }

    /// Entity waiting on the confirmation dialog, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Ask for confirmation. A newer trigger replaces an unanswered one.
    pub fn on_delete_requested(&mut self, entity_id: &str) -> Vec<UiEffect> {
        let entity_id = entity_id.trim();
        if entity_id.is_empty() {
            tracing::warn!("Delete trigger without an entity id ignored");
            return Vec::new();
        }

        if let Some(previous) = self.pending.replace(entity_id.to_string()) {
            tracing::debug!("Delete of {} superseded by {}", previous, entity_id);
        }

        vec![UiEffect::Confirm {
            prompt: ConfirmPrompt::delete_person(),
        }]
    }

    /// The dialog closed. Cancelling does nothing.
    pub fn on_confirm_resolved(&mut self, confirmed: bool) -> Option<RemoteRequest> {
        let entity_id = self.pending.take()?;
        if !confirmed {
            tracing::debug!("Delete of {} cancelled", entity_id);
            return None;
        }

        tracing::info!("Deleting person {}", entity_id);
        Some(RemoteRequest::DeletePerson { entity_id })
    }

    pub fn on_response(
        &self,
        entity_id: &str,
        result: Result<DeleteResponse, FormError>,
    ) -> Vec<UiEffect> {
        match result {
            Ok(response) if response.is_refusal() => {
                tracing::info!("Delete of {} refused: {}", entity_id, response.msg);
                vec![UiEffect::Notify {
                    text: response.msg,
                    severity: Severity::Warning,
                }]
            }
            Ok(response) => {
                tracing::info!("Person {} deleted", entity_id);
                vec![
                    UiEffect::Notify {
                        text: response.msg,
                        severity: Severity::Success,
                    },
                    UiEffect::Navigate {
                        url: self.home_url.clone(),
                    },
                ]
            }
            Err(err) => {
                tracing::error!("Delete of {} failed: {}", entity_id, err);
                vec![UiEffect::Notify {
                    text: DELETE_FAILED_TEXT.to_string(),
                    severity: Severity::Error,
                }]
            }
        }
    }
}
