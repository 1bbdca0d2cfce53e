use thiserror::Error;

/// Failures talking to the question and execution services.
///
/// Both variants surface the same way in the UI (a "link failed" notice with
/// a retry hint); they are kept apart so the log says which one happened.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("link failed: {0}")]
    LinkFailed(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RemoteError {
    pub fn link(msg: impl Into<String>) -> Self {
        RemoteError::LinkFailed(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        RemoteError::Malformed(msg.into())
    }

    /// Text shown in the notice line.
    pub fn user_message(&self) -> &'static str {
        match self {
            RemoteError::LinkFailed(_) => "Link failed: service unreachable or busy",
            RemoteError::Malformed(_) => "Link failed: service returned an unexpected response",
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Malformed(err.to_string())
    }
}
