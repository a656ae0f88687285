use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("unknown symbol: {symbol}")]
    NotFound { symbol: String },

    #[error("invalid seed for {symbol:?}: {reason}")]
    InvalidSeed { symbol: String, reason: &'static str },

    #[error("invalid simulation config: {0}")]
    InvalidConfig(&'static str),
}

impl SimError {
    pub(crate) fn not_found(symbol: impl Into<String>) -> Self {
        Self::NotFound {
            symbol: symbol.into(),
        }
    }

    pub(crate) fn invalid_seed(symbol: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidSeed {
            symbol: symbol.into(),
            reason,
        }
    }
}
