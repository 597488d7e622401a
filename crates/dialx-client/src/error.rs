use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Gateway error ({status}) from {endpoint}: {message}")]
    Gateway {
        status: u16,
        message: String,
        endpoint: String,
    },

    #[error("Protocol error from {endpoint}: {reason}")]
    Protocol { endpoint: String, reason: String },

    #[error("File not found: {url}")]
    NotFound { url: String },
}

impl DialError {
    pub(crate) fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub(crate) fn protocol(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Protocol {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status behind this error
    ///
    /// The gateway's status for `Gateway`, 404 for `NotFound`, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Gateway { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, DialError>;
