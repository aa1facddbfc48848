use thiserror::Error;

/// Coarse classification of a [`ResponderError`], for callers that only need
/// to branch on the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponderErrorKind {
    Unauthenticated,
    Unavailable,
    InvalidRequest,
    Unknown,
}

impl ResponderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponderErrorKind::Unauthenticated => "unauthenticated",
            ResponderErrorKind::Unavailable => "unavailable",
            ResponderErrorKind::InvalidRequest => "invalid_request",
            ResponderErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ResponderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure reported by a [`crate::application::Responder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponderError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Model provider unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown responder error: {0}")]
    Unknown(String),
}

impl ResponderError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    pub fn kind(&self) -> ResponderErrorKind {
        match self {
            Self::Unauthenticated(_) => ResponderErrorKind::Unauthenticated,
            Self::Unavailable(_) => ResponderErrorKind::Unavailable,
            Self::InvalidRequest(_) => ResponderErrorKind::InvalidRequest,
            Self::Unknown(_) => ResponderErrorKind::Unknown,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Unauthenticated(m)
            | Self::Unavailable(m)
            | Self::InvalidRequest(m)
            | Self::Unknown(m) => m,
        }
    }
}

/// Errors returned by [`crate::application::ChatSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Question is empty")]
    EmptyInput,

    #[error("A question is already being answered in this session")]
    Busy,

    #[error(transparent)]
    Responder(#[from] ResponderError),
}

impl ChatError {
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }

    pub fn responder_kind(&self) -> Option<ResponderErrorKind> {
        match self {
            Self::Responder(e) => Some(e.kind()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            ResponderError::unauthenticated("no key").kind(),
            ResponderErrorKind::Unauthenticated
        );
        assert_eq!(
            ResponderError::unavailable("down").kind(),
            ResponderErrorKind::Unavailable
        );
        assert_eq!(
            ResponderError::invalid_request("bad").kind(),
            ResponderErrorKind::InvalidRequest
        );
        assert_eq!(ResponderError::unknown("?").kind(), ResponderErrorKind::Unknown);
    }

    #[test]
    fn chat_error_wraps_responder_error_transparently() {
        let err: ChatError = ResponderError::unavailable("provider outage").into();
        assert_eq!(err.to_string(), "Model provider unavailable: provider outage");
        assert_eq!(err.responder_kind(), Some(ResponderErrorKind::Unavailable));
        assert!(!err.is_empty_input());
    }
}
