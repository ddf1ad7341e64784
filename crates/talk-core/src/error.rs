use thiserror::Error;

/// Provider code for an invalid or expired access token.
pub const CODE_INVALID_TOKEN: i64 = -401;
/// Provider code for a token lacking the scope a capability needs.
pub const CODE_INSUFFICIENT_SCOPE: i64 = -402;
/// Provider code for an API not enabled for the calling app.
pub const CODE_API_NOT_ENABLED: i64 = -3;
/// Provider code for an app without the delegated-send entitlement.
pub const CODE_NO_PERMISSION: i64 = -5;

#[derive(Error, Debug)]
pub enum TalkError {
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("Permission denied ({code}): {message}")]
    Permission { code: i64, message: String },
    #[error("Invalid argument: {0}")]
    Validation(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Remote error ({code}): {message}")]
    Remote { code: i64, message: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse error category, for branching without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Permission,
    Validation,
    Network,
    Remote,
    Decode,
    Internal,
}

impl TalkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TalkError::Auth(_) => ErrorKind::Auth,
            TalkError::Permission { .. } => ErrorKind::Permission,
            TalkError::Validation(_) => ErrorKind::Validation,
            TalkError::Network(_) => ErrorKind::Network,
            TalkError::Remote { .. } => ErrorKind::Remote,
            TalkError::Decode(_) | TalkError::Serialization(_) => ErrorKind::Decode,
            TalkError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Map a provider error body (`code`, `msg`) and HTTP status onto the taxonomy.
    pub fn from_provider(status: u16, code: Option<i64>, message: impl Into<String>) -> Self {
        let message = message.into();
        match (status, code) {
            (401, _) | (_, Some(CODE_INVALID_TOKEN)) => TalkError::Auth(message),
            (403, _)
            | (_, Some(CODE_INSUFFICIENT_SCOPE | CODE_API_NOT_ENABLED | CODE_NO_PERMISSION)) => {
                TalkError::Permission {
                    code: code.unwrap_or(-(status as i64)),
                    message,
                }
            }
            (_, Some(code)) => TalkError::Remote { code, message },
            (_, None) => TalkError::Remote { code: -(status as i64), message },
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }
}

pub type Result<T> = std::result::Result<T, TalkError>;
