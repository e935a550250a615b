//! What the host must render after the session handled something.

use serde::Serialize;

use crate::errors::ErrorDetails;
use crate::models::{ConfirmPrompt, OptionItem, RowField, RowIndex, Severity};

/// Page regions whose visibility depends on the person type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityTarget {
    /// Board member fields (`.f-ext`)
    ExtendedGroup,
    /// Faculty selector inside the extended group (`#div_id_facultad`)
    FacultyField,
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// One change the host applies to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum UiEffect {
    InstallConstraint {
        field: String,
        pattern: String,
        min_length: usize,
        max_length: usize,
    },
    SetValue {
        field: String,
        value: String,
    },
    SetVisible {
        target: VisibilityTarget,
        visible: bool,
    },
    SetOptions {
        row: RowIndex,
        field: RowField,
        control_id: String,
        options: Vec<OptionItem>,
    },
    SetSelection {
        row: RowIndex,
        field: RowField,
        control_id: String,
        selected: Vec<String>,
    },
    SetDisabled {
        row: RowIndex,
        field: RowField,
        control_id: String,
        disabled: bool,
    },
    /// Transient inline notice next to a row selector whose options could not be refreshed
    RowFetchFailed {
        row: RowIndex,
        field: RowField,
        control_id: String,
        message: String,
    },
    FieldErrors {
        errors: Vec<FieldError>,
    },
    SubmitAccepted,
    Confirm {
        prompt: ConfirmPrompt,
    },
    Notify {
        text: String,
        severity: Severity,
    },
    Navigate {
        url: String,
    },
    Rejected {
        error: ErrorDetails,
    },
}

impl UiEffect {
    pub(crate) fn row_effect(row: RowIndex, field: RowField) -> RowEffectBuilder {
        RowEffectBuilder { row, field }
    }
}

/// Fills in the addressing shared by every row-scoped effect.
pub(crate) struct RowEffectBuilder {
    row: RowIndex,
    field: RowField,
}

impl RowEffectBuilder {
    pub fn options(self, options: Vec<OptionItem>) -> UiEffect {
        UiEffect::SetOptions {
            row: self.row,
            field: self.field,
            control_id: self.row.control_id(self.field),
            options,
        }
    }

    pub fn selection(self, selected: Vec<String>) -> UiEffect {
        UiEffect::SetSelection {
            row: self.row,
            field: self.field,
            control_id: self.row.control_id(self.field),
            selected,
        }
    }

    pub fn disabled(self, disabled: bool) -> UiEffect {
        UiEffect::SetDisabled {
            row: self.row,
            field: self.field,
            control_id: self.row.control_id(self.field),
            disabled,
        }
    }

    pub fn fetch_failed(self, message: String) -> UiEffect {
        UiEffect::RowFetchFailed {
            row: self.row,
            field: self.field,
            control_id: self.row.control_id(self.field),
            message,
        }
    }
}
