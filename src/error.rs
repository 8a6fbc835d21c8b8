use thiserror::Error;

/// Warning shown when the student form is missing required fields.
pub const MISSING_FIELDS_WARNING: &str = "Please fill in at least GPA, skills, and interests.";

/// Failures a submission can surface to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// Rejected locally; the chat-completion service was not called.
    #[error("{0}")]
    Validation(String),

    /// The chat-completion call failed (transport, auth, quota, bad body).
    #[error("Error: {0}")]
    ExternalService(String),
}

impl AdvisorError {
    pub fn missing_fields() -> Self {
        Self::Validation(MISSING_FIELDS_WARNING.to_string())
    }

    /// Wrap an upstream failure, keeping the full cause chain as detail.
    pub fn external(err: &anyhow::Error) -> Self {
        Self::ExternalService(format!("{:#}", err))
    }

    /// Text rendered to the user as-is.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
