use serde::{Deserialize, Serialize};

/// Student gender as sent over the wire.
///
/// Values outside `M`/`F` are kept verbatim in `Other` and left for the
/// server to accept or reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other(String),
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => f.pad("M"),
            Self::Female => f.pad("F"),
            Self::Other(s) => f.pad(s),
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        match s.as_str() {
            "M" => Self::Male,
            "F" => Self::Female,
            _ => Self::Other(s),
        }
    }
}

impl From<Gender> for String {
    fn from(g: Gender) -> Self {
        g.to_string()
    }
}

/// A student as stored by the remote API.
///
/// `id == 0` marks a record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    pub education: String,
    pub academic_year: u32,
}

impl StudentRecord {
    /// Attach a server-assigned id to submitted fields
    pub fn from_fields(id: i64, fields: StudentFields) -> Self {
        Self {
            id,
            name: fields.name,
            gender: fields.gender,
            age: fields.age,
            education: fields.education,
            academic_year: fields.academic_year,
        }
    }
}

impl std::fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Use chars() to handle UTF-8 safely
        let name: String = if self.name.chars().count() > 24 {
            self.name.chars().take(21).collect::<String>() + "..."
        } else {
            self.name.clone()
        };

        write!(
            f,
            "{:<6} {:<24} {:<6} {:<5} {:<13} {}",
            self.id, name, self.gender, self.age, self.academic_year, self.education
        )
    }
}

/// Record body sent on creation (no id; the server assigns one)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    pub education: String,
    pub academic_year: u32,
}
