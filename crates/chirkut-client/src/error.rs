use thiserror::Error;

/// Server text that identifies a register conflict.
pub const USERNAME_TAKEN: &str = "Username already taken";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with `{"error": ...}`.
    #[error("{0}")]
    Server(String),

    /// Registration went through but the follow-up sign-in did not.
    #[error("account created but sign-in failed: {0}")]
    LoginAfterRegister(String),

    #[error("username and password are required")]
    MissingCredentials,

    #[error("not signed in")]
    NotSignedIn,

    #[error("no profile is open")]
    NoProfile,

    #[error("session storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("session record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// What an auth form shows for a failed submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UsernameTaken,
    Rejected,
}

impl ClientError {
    pub fn auth_failure(&self) -> AuthFailure {
        match self {
            ClientError::Server(msg) if msg == USERNAME_TAKEN => AuthFailure::UsernameTaken,
            _ => AuthFailure::Rejected,
        }
    }
}
