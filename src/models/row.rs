//! Assignment rows of the repeating block and how their controls are addressed.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::OptionItem;
use crate::errors::FormError;

/// Prefix of every control rendered inside the assignment formset.
pub const ROW_CONTROL_PREFIX: &str = "id_asignacionpersonal_set";

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("Invalid digit regex"));

/// Position of a row in the repeating block. Never changes once the row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowIndex(pub u32);

impl RowIndex {
    /// Row index carried by a control id such as `id_asignacionpersonal_set-3-brigadas`.
    pub fn from_control_id(control_id: &str) -> Result<Self, FormError> {
        DIGIT_RUN
            .find(control_id)
            .and_then(|m| m.as_str().parse().ok())
            .map(RowIndex)
            .ok_or_else(|| FormError::UnknownRow(control_id.to_string()))
    }

    /// Id of a sibling control in the same row.
    pub fn control_id(&self, field: RowField) -> String {
        format!("{}-{}-{}", ROW_CONTROL_PREFIX, self.0, field.suffix())
    }
}

impl std::fmt::Display for RowIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Controls inside one assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowField {
    Point,
    PersonnelType,
    Brigades,
    Role,
    Production,
}

impl RowField {
    pub const ALL: [RowField; 5] = [
        RowField::Point,
        RowField::PersonnelType,
        RowField::Brigades,
        RowField::Role,
        RowField::Production,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            RowField::Point => "punto_vacunacion",
            RowField::PersonnelType => "tipo_personal",
            RowField::Brigades => "brigadas",
            RowField::Role => "rol_profesional",
            RowField::Production => "produccion",
        }
    }

    /// Field named by the last `-` segment of a row control id.
    pub fn from_control_id(control_id: &str) -> Option<Self> {
        let suffix = control_id.rsplit('-').next()?;
        Self::ALL.into_iter().find(|f| f.suffix() == suffix)
    }
}

/// A selector whose value decides the options of another selector in the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyEdge {
    PointToBrigades,
    PersonnelTypeToRoles,
}

impl DependencyEdge {
    pub fn source(&self) -> RowField {
        match self {
            DependencyEdge::PointToBrigades => RowField::Point,
            DependencyEdge::PersonnelTypeToRoles => RowField::PersonnelType,
        }
    }

    pub fn target(&self) -> RowField {
        match self {
            DependencyEdge::PointToBrigades => RowField::Brigades,
            DependencyEdge::PersonnelTypeToRoles => RowField::Role,
        }
    }
}

/// Dependent options and selections for one side of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependentField {
    pub options: Vec<OptionItem>,
    pub selected: Vec<String>,
    /// Bumped whenever the source selector changes
    pub generation: u64,
    pub last_error: Option<String>,
}

impl DependentField {
    /// Replace options, keeping only previously selected ids that still exist.
    pub fn repopulate(&mut self, options: Vec<OptionItem>) {
        self.selected
            .retain(|id| options.iter().any(|option| &option.id == id));
        self.options = options;
        self.last_error = None;
    }
}

/// One entry of the assignment formset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub index: RowIndex,
    pub point: String,
    pub personnel_type: String,
    pub brigades: DependentField,
    pub roles: DependentField,
    pub brigade_disabled: bool,
    pub production_disabled: bool,
}

impl AssignmentRow {
    pub fn new(index: RowIndex) -> Self {
        Self {
            index,
            point: String::new(),
            personnel_type: String::new(),
            brigades: DependentField::default(),
            roles: DependentField::default(),
            brigade_disabled: false,
            production_disabled: false,
        }
    }

    pub fn source_value(&self, edge: DependencyEdge) -> &str {
        match edge {
            DependencyEdge::PointToBrigades => &self.point,
            DependencyEdge::PersonnelTypeToRoles => &self.personnel_type,
        }
    }

    pub fn dependent(&self, edge: DependencyEdge) -> &DependentField {
        match edge {
            DependencyEdge::PointToBrigades => &self.brigades,
            DependencyEdge::PersonnelTypeToRoles => &self.roles,
        }
    }

    pub fn dependent_mut(&mut self, edge: DependencyEdge) -> &mut DependentField {
        match edge {
            DependencyEdge::PointToBrigades => &mut self.brigades,
            DependencyEdge::PersonnelTypeToRoles => &mut self.roles,
        }
    }

    /// Single role selection, if any.
    pub fn role(&self) -> Option<&str> {
        self.roles.selected.first().map(String::as_str)
    }
}
