//! The registration form session.
//!
//! [`FormSession`] owns all form state and is driven by one event at a time. It never
//! awaits: remote work leaves as [`RemoteRequest`]s in the [`Outcome`] and comes back
//! through [`FormSession::complete`]; deferred normalization leaves as [`Scheduled`]
//! continuations and comes back through [`FormSession::resume`].

mod constraints;
mod deletion;
mod effects;
mod events;
mod rows;
mod validation;
mod visibility;

pub use constraints::*;
pub use deletion::*;
pub use effects::*;
pub use events::*;
pub use rows::*;
pub use validation::*;
pub use visibility::*;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::FormConfig;
use crate::errors::{ErrorDetails, FormError};
use crate::models::{AssignmentRow, DocumentTypeRule, RowField, RowIndex, ROW_CONTROL_PREFIX};
use crate::remote::{Completion, RemoteRequest};

/// Live values of the top-level form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(HashMap<String, String>);

impl FieldValues {
    /// Current value, empty when the field was never set.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }
}

impl From<HashMap<String, String>> for FieldValues {
    fn from(values: HashMap<String, String>) -> Self {
        Self(values)
    }
}

/// Everything produced by handling one event.
#[derive(Debug, Default)]
pub struct Outcome {
    pub effects: Vec<UiEffect>,
    pub requests: Vec<RemoteRequest>,
    pub scheduled: Vec<Scheduled>,
}

impl Outcome {
    fn effects(effects: Vec<UiEffect>) -> Self {
        Self {
            effects,
            ..Default::default()
        }
    }

    pub fn rejected(err: &FormError) -> Self {
        Self::effects(vec![UiEffect::Rejected {
            error: ErrorDetails::from(err),
        }])
    }
}

pub struct FormSession {
    config: Arc<FormConfig>,
    values: FieldValues,
    constraints: InputConstraintManager,
    visibility: ConditionalVisibilityController,
    rules: ConditionalValidationRuleSet,
    rows: RowDependencyCoordinator,
    deletion: ListDeletionController,
}

impl FormSession {
    pub fn new(config: Arc<FormConfig>) -> Self {
        Self {
            rows: RowDependencyCoordinator::new(config.coordination_team_id.clone()),
            deletion: ListDeletionController::new(config.home_url.clone()),
            values: FieldValues::default(),
            constraints: InputConstraintManager::new(),
            visibility: ConditionalVisibilityController::new(),
            rules: ConditionalValidationRuleSet::registration(),
            config,
        }
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn document_rule(&self) -> &'static DocumentTypeRule {
        self.constraints.installed()
    }

    pub fn visibility(&self) -> VisibilityState {
        self.visibility.state()
    }

    pub fn row(&self, index: RowIndex) -> Option<&AssignmentRow> {
        self.rows.row(index)
    }

    pub fn rows(&self) -> impl Iterator<Item = &AssignmentRow> {
        self.rows.rows()
    }

    pub fn handle(&mut self, event: FormEvent) -> Outcome {
        match event {
            FormEvent::Load { values, rows } => self.load(values, rows),
            FormEvent::FieldChanged { field, value } => Outcome::effects(self.field_changed(&field, value)),
            FormEvent::Input { field, value } => self.input(&field, &value),
            FormEvent::RowChanged { row, field, value } => self.row_changed(row, field, value),
            FormEvent::ControlChanged { control_id, value } => self.control_changed(&control_id, value),
            FormEvent::DeleteRequested { entity_id } => {
                Outcome::effects(self.deletion.on_delete_requested(&entity_id))
            }
            FormEvent::ConfirmResolved { confirmed } => Outcome {
                requests: self.deletion.on_confirm_resolved(confirmed).into_iter().collect(),
                ..Default::default()
            },
            FormEvent::Submit => Outcome::effects(self.submit()),
            FormEvent::Clear => Outcome::effects(vec![UiEffect::Navigate {
                url: self.config.create_person_url.clone(),
            }]),
        }
    }

    /// Feed back the result of a [`RemoteRequest`].
    pub fn complete(&mut self, completion: Completion) -> Vec<UiEffect> {
        match completion {
            Completion::Options { ticket, result } => self.rows.complete(ticket, result),
            Completion::Deleted { entity_id, result } => self.deletion.on_response(&entity_id, result),
        }
    }

    /// Run a continuation previously handed out in [`Outcome::scheduled`].
    pub fn resume(&mut self, continuation: Continuation) -> Vec<UiEffect> {
        match continuation {
            Continuation::Uppercase { field } => {
                let current = self.values.get(&field);
                let upper = current.to_uppercase();
                if upper == current {
                    return Vec::new();
                }
                self.values.set(&field, upper.clone());
                vec![UiEffect::SetValue { field, value: upper }]
            }
        }
    }

    fn load(&mut self, values: HashMap<String, String>, rows: Vec<RowSnapshot>) -> Outcome {
        tracing::info!("Form loaded with {} fields and {} rows", values.len(), rows.len());
        self.values = values.into();

        let mut effects = Vec::new();
        let document_type = self.values.get(DOCUMENT_TYPE_FIELD).to_string();
        effects.extend(self.constraints.apply_document_constraint(&document_type));
        effects.extend(self.visibility.initialize(
            self.config.person_type_context.as_deref(),
            self.values.get(PERSON_TYPE_FIELD),
        ));
        for snapshot in rows {
            effects.extend(self.rows.restore(snapshot));
        }

        Outcome::effects(effects)
    }

    fn field_changed(&mut self, field: &str, value: String) -> Vec<UiEffect> {
        self.values.set(field, value);
        let value = self.values.get(field).to_string();

        match field {
            DOCUMENT_TYPE_FIELD => {
                let mut effects: Vec<UiEffect> =
                    self.constraints.apply_document_constraint(&value).into_iter().collect();
                let number = self.values.get(DOCUMENT_NUMBER_FIELD).to_string();
                let conformed = self.constraints.conform_document_number(&number);
                if conformed != number {
                    self.values.set(DOCUMENT_NUMBER_FIELD, conformed.clone());
                    effects.push(UiEffect::SetValue {
                        field: DOCUMENT_NUMBER_FIELD.to_string(),
                        value: conformed,
                    });
                }
                effects
            }
            PERSON_TYPE_FIELD => self.visibility.on_personnel_type_changed(&value),
            _ => Vec::new(),
        }
    }

    fn input(&mut self, field: &str, proposed: &str) -> Outcome {
        let current = self.values.get(field).to_string();
        let kept = self.constraints.filter_input(field, &current, proposed);
        self.values.set(field, kept.clone());

        let mut outcome = Outcome::default();
        if kept != proposed {
            outcome.effects.push(UiEffect::SetValue {
                field: field.to_string(),
                value: kept,
            });
        }
        if is_name_field(field) {
            outcome.scheduled.push(Scheduled {
                continuation: Continuation::Uppercase {
                    field: field.to_string(),
                },
                delay: self.config.normalize_delay,
            });
        }
        outcome
    }

    fn row_changed(&mut self, row: RowIndex, field: RowField, value: FieldValue) -> Outcome {
        match field {
            RowField::Point => Outcome {
                requests: self
                    .rows
                    .on_point_changed(row, value.first())
                    .map(RemoteRequest::FetchOptions)
                    .into_iter()
                    .collect(),
                ..Default::default()
            },
            RowField::PersonnelType => {
                let (effects, ticket) = self.rows.on_personnel_type_changed(row, value.first());
                Outcome {
                    effects,
                    requests: vec![RemoteRequest::FetchOptions(ticket)],
                    ..Default::default()
                }
            }
            RowField::Brigades | RowField::Role | RowField::Production => {
                self.rows.on_selection_changed(row, field, value.into_vec());
                Outcome::default()
            }
        }
    }

    /// Route a change known only by DOM id: row controls by their index, others by name.
    fn control_changed(&mut self, control_id: &str, value: FieldValue) -> Outcome {
        match (RowIndex::from_control_id(control_id), RowField::from_control_id(control_id)) {
            (Ok(row), Some(field)) => self.row_changed(row, field, value),
            (Ok(row), None) if control_id.starts_with(ROW_CONTROL_PREFIX) => {
                Outcome::rejected(&FormError::BadEvent(format!(
                    "Row {} has no tracked control {:?}",
                    row, control_id
                )))
            }
            _ => match control_id.strip_prefix("id_") {
                Some(field) if !field.is_empty() => {
                    Outcome::effects(self.field_changed(field, value.first().to_string()))
                }
                _ => Outcome::rejected(&FormError::BadEvent(format!(
                    "Unrecognized control id {:?}",
                    control_id
                ))),
            },
        }
    }

    fn submit(&mut self) -> Vec<UiEffect> {
        let errors = self.rules.validate(&self.values, self.constraints.installed());
        if errors.is_empty() {
            tracing::info!("Form accepted for submission");
            return vec![UiEffect::SubmitAccepted];
        }

        tracing::debug!("Submission blocked by {} field errors", errors.len());
        vec![UiEffect::FieldErrors { errors }]
    }
}
