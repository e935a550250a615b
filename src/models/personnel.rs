//! Personnel type values and the distinguished variants the form reacts to.

use serde::{Deserialize, Serialize};

pub const FACULTY_BOARD_MEMBER: &str = "consejo_facultad";
pub const UNIVERSITY_BOARD_MEMBER: &str = "consejo_unasam";

/// Value of a personnel type selector. Opaque apart from the two board variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PersonnelType {
    FacultyBoardMember,
    UniversityBoardMember,
    Other(String),
}

impl PersonnelType {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            FACULTY_BOARD_MEMBER => PersonnelType::FacultyBoardMember,
            UNIVERSITY_BOARD_MEMBER => PersonnelType::UniversityBoardMember,
            other => PersonnelType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PersonnelType::FacultyBoardMember => FACULTY_BOARD_MEMBER,
            PersonnelType::UniversityBoardMember => UNIVERSITY_BOARD_MEMBER,
            PersonnelType::Other(value) => value,
        }
    }

    pub fn is_board_member(&self) -> bool {
        matches!(
            self,
            PersonnelType::FacultyBoardMember | PersonnelType::UniversityBoardMember
        )
    }

    /// Whether this is the configured coordination team sentinel.
    pub fn is_sentinel(&self, sentinel_id: &str) -> bool {
        !sentinel_id.is_empty() && self.as_str() == sentinel_id
    }
}

impl From<String> for PersonnelType {
    fn from(value: String) -> Self {
        PersonnelType::parse(&value)
    }
}

impl From<PersonnelType> for String {
    fn from(value: PersonnelType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board_variants() {
        assert_eq!(
            PersonnelType::parse("consejo_facultad"),
            PersonnelType::FacultyBoardMember
        );
        assert_eq!(
            PersonnelType::parse(" consejo_unasam "),
            PersonnelType::UniversityBoardMember
        );
        assert_eq!(
            PersonnelType::parse("participante"),
            PersonnelType::Other("participante".to_string())
        );
        assert!(!PersonnelType::parse("").is_board_member());
    }

    #[test]
    fn test_sentinel_never_matches_empty_config() {
        assert!(PersonnelType::parse("7").is_sentinel("7"));
        assert!(!PersonnelType::parse("8").is_sentinel("7"));
        assert!(!PersonnelType::parse("").is_sentinel(""));
    }
}
