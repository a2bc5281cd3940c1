#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("No token provided")]
    NoSession,

    #[error("Request failed with status code {status}")]
    Remote { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {field}: '{value}'")]
    InvalidField { field: String, value: String },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("student not found: {0}")]
    NotFound(i64),

    #[error("no add or edit form is open")]
    FormClosed,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for RosterError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Remote {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            Self::Transport(e.to_string())
        }
    }
}
