use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The market-data provider could not be reached, answered with a
    /// non-success status, or returned a payload missing required fields.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Insufficient data: need {required} samples, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid moving-average period: {0}")]
    InvalidPeriod(usize),

    /// Never leaves the notification dispatcher.
    #[error("Channel '{channel}' unavailable: {reason}")]
    ChannelUnavailable { channel: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification surfaced to callers that render errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Upstream,
    Computation,
    Notification,
    Internal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Upstream => write!(f, "upstream_unavailable"),
            FailureKind::Computation => write!(f, "computation_error"),
            FailureKind::Notification => write!(f, "notification_error"),
            FailureKind::Internal => write!(f, "internal_error"),
        }
    }
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::UpstreamUnavailable(_) => FailureKind::Upstream,
            Error::InsufficientData { .. } | Error::InvalidPeriod(_) => FailureKind::Computation,
            Error::ChannelUnavailable { .. } => FailureKind::Notification,
            Error::Config(_) | Error::Io(_) => FailureKind::Internal,
        }
    }

    pub fn upstream(msg: impl std::fmt::Display) -> Self {
        Error::UpstreamUnavailable(msg.to_string())
    }

    pub fn channel(channel: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::ChannelUnavailable {
            channel: channel.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
