//! Board member fields shown or hidden from the person type.

use super::effects::{UiEffect, VisibilityTarget};
use crate::models::PersonnelType;

pub const PERSON_TYPE_FIELD: &str = "tipo_persona";

/// What is currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityState {
    pub extended_visible: bool,
    pub faculty_visible: bool,
}

#[derive(Debug, Clone)]
pub struct ConditionalVisibilityController {
    state: VisibilityState,
}

impl Default for ConditionalVisibilityController {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionalVisibilityController {
    pub fn new() -> Self {
        Self {
            state: VisibilityState {
                extended_visible: false,
                faculty_visible: true,
            },
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Run for the page context first, then for the form's own field, which wins.
    pub fn initialize(&mut self, context: Option<&str>, field_value: &str) -> Vec<UiEffect> {
        let mut effects = self.on_personnel_type_changed(context.unwrap_or(""));
        effects.extend(self.on_personnel_type_changed(field_value));
        effects
    }

    pub fn on_personnel_type_changed(&mut self, value: &str) -> Vec<UiEffect> {
        let person_type = PersonnelType::parse(value);

        if !person_type.is_board_member() {
            self.state.extended_visible = false;
            return vec![UiEffect::SetVisible {
                target: VisibilityTarget::ExtendedGroup,
                visible: false,
            }];
        }

        self.state.extended_visible = true;
        self.state.faculty_visible = person_type == PersonnelType::FacultyBoardMember;
        tracing::debug!(
            "Extended group visible for {}, faculty visible: {}",
            person_type.as_str(),
            self.state.faculty_visible
        );

        vec![
            UiEffect::SetVisible {
                target: VisibilityTarget::ExtendedGroup,
                visible: true,
            },
            UiEffect::SetVisible {
                target: VisibilityTarget::FacultyField,
                visible: self.state.faculty_visible,
            },
        ]
    }
}
