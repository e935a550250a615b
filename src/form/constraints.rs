//! Input format constraints: document number mask, name fields, phone.

use std::sync::LazyLock;

use regex::Regex;

use super::effects::UiEffect;
use crate::models::{DocumentType, DocumentTypeRule};

pub const DOCUMENT_TYPE_FIELD: &str = "tipo_documento";
pub const DOCUMENT_NUMBER_FIELD: &str = "numero_documento";
pub const PHONE_FIELD: &str = "celular";
pub const NAME_FIELDS: [&str; 3] = ["apellido_paterno", "apellido_materno", "nombres"];

const PHONE_MAX_LENGTH: usize = 9;

static NAME_CHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ A-Za-zñÑäÄëËïÏöÖüÜáéíóúÁÉÍÓÚÂÊÎÔÛâêîôûàèìòùÀÈÌÒÙ.\-@]$")
        .expect("Invalid name character regex")
});

fn is_name_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    NAME_CHAR.is_match(c.encode_utf8(&mut buf))
}

pub fn is_name_field(field: &str) -> bool {
    NAME_FIELDS.contains(&field)
}

/// Value a masked field keeps after the user turned `current` into `proposed`.
///
/// Text appended to `current` is taken one character at a time up to the first one that
/// makes the value unacceptable. Any other edit (deletion, mid-value insert, paste over a
/// selection) is taken whole or rejected whole, leaving `current` untouched.
fn mask_input(current: &str, proposed: &str, accepts: impl Fn(&str) -> bool) -> String {
    let Some(typed) = proposed.strip_prefix(current) else {
        return if accepts(proposed) {
            proposed.to_string()
        } else {
            current.to_string()
        };
    };

    let mut value = current.to_string();
    for c in typed.chars() {
        value.push(c);
        if !accepts(&value) {
            value.pop();
            break;
        }
    }
    value
}

fn is_phone_prefix(value: &str) -> bool {
    value.chars().count() <= PHONE_MAX_LENGTH && value.chars().all(|c| c.is_ascii_digit())
}

fn is_name_prefix(value: &str) -> bool {
    value.chars().all(is_name_char)
}

/// Owns the single document number rule and filters keystrokes on constrained fields.
#[derive(Debug, Clone)]
pub struct InputConstraintManager {
    installed: &'static DocumentTypeRule,
}

impl Default for InputConstraintManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputConstraintManager {
    /// Starts with the national id mask, like the page does before any selection.
    pub fn new() -> Self {
        Self {
            installed: DocumentType::NationalId.rule(),
        }
    }

    pub fn installed(&self) -> &'static DocumentTypeRule {
        self.installed
    }

    /// Install the rule for `code`, replacing the previous one.
    ///
    /// Unknown or empty codes keep whatever was installed last and produce no effect.
    pub fn apply_document_constraint(&mut self, code: &str) -> Option<UiEffect> {
        let Some(doc_type) = DocumentType::from_code(code) else {
            tracing::debug!("Keeping {} rule for document type {:?}", self.installed.code(), code);
            return None;
        };

        self.installed = doc_type.rule();
        tracing::debug!("Installed document rule {}", self.installed.pattern());

        Some(UiEffect::InstallConstraint {
            field: DOCUMENT_NUMBER_FIELD.to_string(),
            pattern: self.installed.pattern(),
            min_length: self.installed.min_length,
            max_length: self.installed.max_length,
        })
    }

    /// Value a field keeps after the user produced `proposed` from `current`.
    pub fn filter_input(&self, field: &str, current: &str, proposed: &str) -> String {
        if field == DOCUMENT_NUMBER_FIELD {
            let rule = self.installed;
            mask_input(current, proposed, |value| rule.accepts_partial(value)).to_uppercase()
        } else if field == PHONE_FIELD {
            mask_input(current, proposed, is_phone_prefix)
        } else if is_name_field(field) {
            mask_input(current, proposed, is_name_prefix)
        } else {
            proposed.to_string()
        }
    }

    /// Current document number re-filtered under the installed rule.
    pub fn conform_document_number(&self, value: &str) -> String {
        self.installed.conform(value).to_uppercase()
    }
}
