use std::str::FromStr;

use crate::api::{Gender, StudentFields, StudentRecord};
use crate::error::RosterError;

/// Editable field of the add/edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Name,
    Gender,
    Age,
    Education,
    AcademicYear,
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Gender => write!(f, "gender"),
            Self::Age => write!(f, "age"),
            Self::Education => write!(f, "education"),
            Self::AcademicYear => write!(f, "academicYear"),
        }
    }
}

impl FromStr for FieldName {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "gender" => Ok(Self::Gender),
            "age" => Ok(Self::Age),
            "education" => Ok(Self::Education),
            "academicYear" | "academic_year" | "academic-year" => Ok(Self::AcademicYear),
            _ => Err(RosterError::UnknownField(s.to_string())),
        }
    }
}

/// Working copy of a student while the form is open.
///
/// Numeric fields hold the raw input and are only coerced on submit, so a
/// half-typed number never churns the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub gender: Gender,
    pub age: String,
    pub education: String,
    pub academic_year: String,
}

impl Draft {
    /// Blank template used when adding a student
    pub fn template() -> Self {
        Self {
            name: String::new(),
            gender: Gender::Male,
            age: "0".to_string(),
            education: String::new(),
            academic_year: "0".to_string(),
        }
    }

    /// Independent copy of an existing record
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            name: record.name.clone(),
            gender: record.gender.clone(),
            age: record.age.to_string(),
            education: record.education.clone(),
            academic_year: record.academic_year.to_string(),
        }
    }

    /// Replace one field, leaving the others untouched
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        match field {
            FieldName::Name => self.name = value,
            FieldName::Gender => self.gender = Gender::from(value),
            FieldName::Age => self.age = value,
            FieldName::Education => self.education = value,
            FieldName::AcademicYear => self.academic_year = value,
        }
    }

    /// Coerce into a creation body
    pub fn to_fields(&self) -> Result<StudentFields, RosterError> {
        Ok(StudentFields {
            name: self.name.clone(),
            gender: self.gender.clone(),
            age: coerce(FieldName::Age, &self.age)?,
            education: self.education.clone(),
            academic_year: coerce(FieldName::AcademicYear, &self.academic_year)?,
        })
    }

    /// Coerce into a full record addressed by `id`
    pub fn to_record(&self, id: i64) -> Result<StudentRecord, RosterError> {
        self.to_fields()
            .map(|fields| StudentRecord::from_fields(id, fields))
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::template()
    }
}

/// Numeric input: surrounding whitespace ignored, empty means zero
fn coerce(field: FieldName, raw: &str) -> Result<u32, RosterError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|_| RosterError::InvalidField {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// State of the shared add/edit form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormSession {
    #[default]
    Closed,
    Adding {
        draft: Draft,
    },
    Editing {
        id: i64,
        draft: Draft,
    },
}

/// Mode of the form without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormMode {
    Closed,
    Adding,
    Editing,
}

impl std::fmt::Display for FormMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Adding => write!(f, "adding"),
            Self::Editing => write!(f, "editing"),
        }
    }
}

impl FormSession {
    pub fn mode(&self) -> FormMode {
        match self {
            Self::Closed => FormMode::Closed,
            Self::Adding { .. } => FormMode::Adding,
            Self::Editing { .. } => FormMode::Editing,
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Closed => None,
            Self::Adding { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            Self::Closed => None,
            Self::Adding { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}
