//! Submit-time validation.
//!
//! Conditional rules are predicates over the live field values. They are evaluated on
//! every submission attempt and never cached.

use std::sync::LazyLock;

use regex::Regex;

use super::constraints::{DOCUMENT_NUMBER_FIELD, DOCUMENT_TYPE_FIELD};
use super::effects::FieldError;
use super::visibility::PERSON_TYPE_FIELD;
use super::FieldValues;
use crate::models::{DocumentTypeRule, PersonnelType};

pub const MEMBER_ROLE_FIELD: &str = "cargo_miembro";
pub const FACULTY_FIELD: &str = "facultad";
pub const EMAIL_FIELD: &str = "email";

pub const REQUIRED_MESSAGE: &str = "Este campo es obligatorio.";
pub const DOCUMENT_FORMAT_MESSAGE: &str = "El número de documento no tiene el formato correcto.";
pub const EMAIL_MESSAGE: &str = "Ingrese una dirección de correo válida.";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex"));

type Predicate = Box<dyn Fn(&FieldValues) -> bool + Send + Sync>;

struct RequiredRule {
    field: &'static str,
    when: Predicate,
}

/// Required-field rules, some of them conditional.
pub struct ConditionalValidationRuleSet {
    rules: Vec<RequiredRule>,
}

impl std::fmt::Debug for ConditionalValidationRuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.field))
            .finish()
    }
}

impl Default for ConditionalValidationRuleSet {
    fn default() -> Self {
        Self::registration()
    }
}

impl ConditionalValidationRuleSet {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Rules of the person registration form.
    pub fn registration() -> Self {
        Self::empty()
            .require(DOCUMENT_TYPE_FIELD)
            .require(DOCUMENT_NUMBER_FIELD)
            .require("apellido_paterno")
            .require("nombres")
            .require_if(MEMBER_ROLE_FIELD, |values| {
                PersonnelType::parse(values.get(PERSON_TYPE_FIELD)).is_board_member()
            })
            .require_if(FACULTY_FIELD, |values| {
                PersonnelType::parse(values.get(PERSON_TYPE_FIELD))
                    == PersonnelType::FacultyBoardMember
            })
    }

    pub fn require(self, field: &'static str) -> Self {
        self.require_if(field, |_| true)
    }

    pub fn require_if<F>(mut self, field: &'static str, when: F) -> Self
    where
        F: Fn(&FieldValues) -> bool + Send + Sync + 'static,
    {
        self.rules.push(RequiredRule {
            field,
            when: Box::new(when),
        });
        self
    }

    pub fn is_required(&self, field: &str, values: &FieldValues) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.field == field && (rule.when)(values))
    }

    /// All failures for the current values; empty means the form may be submitted.
    pub fn validate(&self, values: &FieldValues, document_rule: &DocumentTypeRule) -> Vec<FieldError> {
        let mut errors: Vec<FieldError> = Vec::new();

        for rule in &self.rules {
            if (rule.when)(values) && values.get(rule.field).trim().is_empty() {
                push_once(&mut errors, rule.field, REQUIRED_MESSAGE);
            }
        }

        let number = values.get(DOCUMENT_NUMBER_FIELD);
        if !number.is_empty() && !document_rule.is_complete(number) {
            push_once(&mut errors, DOCUMENT_NUMBER_FIELD, DOCUMENT_FORMAT_MESSAGE);
        }

        let email = values.get(EMAIL_FIELD).trim();
        if !email.is_empty() && !EMAIL.is_match(email) {
            push_once(&mut errors, EMAIL_FIELD, EMAIL_MESSAGE);
        }

        errors
    }
}

fn push_once(errors: &mut Vec<FieldError>, field: &str, message: &str) {
    if errors.iter().all(|e| e.field != field) {
        errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}
