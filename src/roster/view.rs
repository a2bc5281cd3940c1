use super::FormSession;
use crate::api::StudentRecord;

/// Everything the presentation layer needs at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshot {
    pub students: Vec<StudentRecord>,
    pub loading: bool,
    pub error: Option<String>,
    pub form: FormSession,
}

impl RosterSnapshot {
    /// Pick what to show: loading wins, then error, then the list
    pub fn view(&self) -> RosterView<'_> {
        if self.loading {
            RosterView::Loading
        } else if let Some(ref error) = self.error {
            RosterView::Error(error)
        } else {
            RosterView::List(&self.students)
        }
    }
}

/// The three mutually exclusive screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterView<'a> {
    Loading,
    Error(&'a str),
    List(&'a [StudentRecord]),
}

impl std::fmt::Display for RosterView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading..."),
            Self::Error(message) => write!(f, "Error: {}", message),
            Self::List([]) => write!(f, "No students found."),
            Self::List(students) => {
                writeln!(
                    f,
                    "{:<6} {:<24} {:<6} {:<5} {:<13} EDUCATION",
                    "ID", "NAME", "GENDER", "AGE", "ACADEMIC YEAR"
                )?;
                write!(f, "{}", "-".repeat(70))?;
                for student in *students {
                    write!(f, "\n{}", student)?;
                }
                Ok(())
            }
        }
    }
}
