use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error! Status: {status}, Message: {message}")]
    Http { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DashboardError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::NotFound(_) | DashboardError::Http { status: 404, .. })
    }

    /// Text for toasts. Validation messages are already user copy.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DashboardError::Decode(e.to_string())
        } else {
            DashboardError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
