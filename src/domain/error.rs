//! Domain error types.

/// Top-level error type for ascentia.
#[derive(Debug, thiserror::Error)]
pub enum AscentiaError {
    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("insufficient data for {ticker}: have {points} points, need {minimum}")]
    InsufficientData {
        ticker: String,
        points: usize,
        minimum: usize,
    },

    #[error("watchlist store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid ticker {input:?}: {reason}")]
    InvalidTicker { input: String, reason: String },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AscentiaError {
    pub fn data_unavailable(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }
}

impl From<&AscentiaError> for std::process::ExitCode {
    fn from(err: &AscentiaError) -> Self {
        let code: u8 = match err {
            AscentiaError::Io(_) => 1,
            AscentiaError::ConfigParse { .. }
            | AscentiaError::ConfigMissing { .. }
            | AscentiaError::ConfigInvalid { .. } => 2,
            AscentiaError::StoreUnavailable { .. } => 3,
            AscentiaError::InvalidCredentials | AscentiaError::InvalidTicker { .. } => 4,
            AscentiaError::DataUnavailable { .. }
            | AscentiaError::InsufficientData { .. }
            | AscentiaError::InvalidSeries { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
