//! Document types and the input format each one imposes on the document number.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Document types offered by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Undocumented,
    NationalId,
    Passport,
    ForeignResidentCard,
    IdentityCard,
    ApplicantCard,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Undocumented,
        DocumentType::NationalId,
        DocumentType::Passport,
        DocumentType::ForeignResidentCard,
        DocumentType::IdentityCard,
        DocumentType::ApplicantCard,
    ];

    /// Code used by the document type selector.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Undocumented => "00",
            DocumentType::NationalId => "01",
            DocumentType::Passport => "02",
            DocumentType::ForeignResidentCard => "03",
            DocumentType::IdentityCard => "04",
            DocumentType::ApplicantCard => "05",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code.trim())
    }

    pub fn rule(&self) -> &'static DocumentTypeRule {
        &DOCUMENT_RULES[self.index()]
    }

    fn index(&self) -> usize {
        match self {
            DocumentType::Undocumented => 0,
            DocumentType::NationalId => 1,
            DocumentType::Passport => 2,
            DocumentType::ForeignResidentCard => 3,
            DocumentType::IdentityCard => 4,
            DocumentType::ApplicantCard => 5,
        }
    }
}

/// Characters a document number may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Digits,
    Alphanumeric,
    DigitsDash,
    AlphanumericDash,
}

impl CharClass {
    pub fn contains(&self, c: char) -> bool {
        match self {
            CharClass::Digits => c.is_ascii_digit(),
            CharClass::Alphanumeric => c.is_ascii_alphanumeric(),
            CharClass::DigitsDash => c.is_ascii_digit() || c == '-',
            CharClass::AlphanumericDash => c.is_ascii_alphanumeric() || c == '-',
        }
    }

    fn regex_class(&self) -> &'static str {
        match self {
            CharClass::Digits => "[0-9]",
            CharClass::Alphanumeric => "[0-9A-Za-z]",
            CharClass::DigitsDash => "[0-9-]",
            CharClass::AlphanumericDash => "[0-9A-Za-z-]",
        }
    }
}

/// Format constraint installed on the document number field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTypeRule {
    pub document_type: DocumentType,
    pub chars: CharClass,
    pub min_length: usize,
    pub max_length: usize,
}

pub static DOCUMENT_RULES: [DocumentTypeRule; 6] = [
    DocumentTypeRule {
        document_type: DocumentType::Undocumented,
        chars: CharClass::AlphanumericDash,
        min_length: 1,
        max_length: 12,
    },
    DocumentTypeRule {
        document_type: DocumentType::NationalId,
        chars: CharClass::Digits,
        min_length: 1,
        max_length: 8,
    },
    DocumentTypeRule {
        document_type: DocumentType::Passport,
        chars: CharClass::Alphanumeric,
        min_length: 1,
        max_length: 12,
    },
    DocumentTypeRule {
        document_type: DocumentType::ForeignResidentCard,
        chars: CharClass::Digits,
        min_length: 1,
        max_length: 9,
    },
    DocumentTypeRule {
        document_type: DocumentType::IdentityCard,
        chars: CharClass::Alphanumeric,
        min_length: 1,
        max_length: 12,
    },
    DocumentTypeRule {
        document_type: DocumentType::ApplicantCard,
        chars: CharClass::DigitsDash,
        min_length: 5,
        max_length: 11,
    },
];

static COMPLETE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DOCUMENT_RULES
        .iter()
        .map(|rule| Regex::new(&rule.pattern()).expect("Invalid document rule pattern"))
        .collect()
});

impl DocumentTypeRule {
    pub fn code(&self) -> &'static str {
        self.document_type.code()
    }

    /// Anchored pattern a complete value must match, e.g. `^([0-9]{1,8})$`.
    pub fn pattern(&self) -> String {
        format!(
            "^({}{{{},{}}})$",
            self.chars.regex_class(),
            self.min_length,
            self.max_length
        )
    }

    /// Whether `value` is acceptable while the user is still typing.
    pub fn accepts_partial(&self, value: &str) -> bool {
        value.chars().count() <= self.max_length && value.chars().all(|c| self.chars.contains(c))
    }

    /// Whether `value` satisfies the rule, minimum length included.
    pub fn is_complete(&self, value: &str) -> bool {
        COMPLETE_PATTERNS[self.document_type.index()].is_match(value)
    }

    /// Drop disallowed characters and truncate to the maximum length.
    pub fn conform(&self, value: &str) -> String {
        value
            .chars()
            .filter(|c| self.chars.contains(*c))
            .take(self.max_length)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_catalog() {
        for doc_type in DocumentType::ALL {
            assert_eq!(DocumentType::from_code(doc_type.code()), Some(doc_type));
            assert_eq!(doc_type.rule().document_type, doc_type);
        }
        assert_eq!(DocumentType::from_code(""), None);
        assert_eq!(DocumentType::from_code("99"), None);
    }

    #[test]
    fn test_patterns_match_page_masks() {
        assert_eq!(DocumentType::NationalId.rule().pattern(), "^([0-9]{1,8})$");
        assert_eq!(DocumentType::ApplicantCard.rule().pattern(), "^([0-9-]{5,11})$");
        assert_eq!(
            DocumentType::Undocumented.rule().pattern(),
            "^([0-9A-Za-z-]{1,12})$"
        );
    }

    #[test]
    fn test_partial_values_respect_class_and_max_length() {
        for rule in DOCUMENT_RULES.iter() {
            let longest = "1".repeat(rule.max_length);
            assert!(rule.accepts_partial(&longest), "{:?}", rule.document_type);
            assert!(rule.is_complete(&longest));
            assert!(!rule.accepts_partial(&format!("{}1", longest)));
        }
        assert!(!DocumentType::NationalId.rule().accepts_partial("12A"));
        assert!(DocumentType::Passport.rule().accepts_partial("AB12"));
        assert!(!DocumentType::Passport.rule().accepts_partial("AB-12"));
    }

    #[test]
    fn test_minimum_length_only_applies_to_complete_values() {
        let applicant = DocumentType::ApplicantCard.rule();
        assert!(applicant.accepts_partial("12"));
        assert!(!applicant.is_complete("12"));
        assert!(applicant.is_complete("12-345"));
        assert!(!applicant.is_complete(""));
    }

    #[test]
    fn test_conform_filters_and_truncates() {
        let dni = DocumentType::NationalId.rule();
        assert_eq!(dni.conform("AB12345678901"), "12345678");
        assert_eq!(dni.conform("X-9"), "9");
    }
}
