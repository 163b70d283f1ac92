use thiserror::Error;

pub type Result<T> = std::result::Result<T, PassportError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

#[derive(Debug, Error)]
pub enum PassportError {
    #[error("could not load countries: {0}")]
    FetchFailure(#[from] FetchError),

    #[error("country not found: {name}")]
    CountryNotFound { name: String },

    #[error("You can only have {capacity} favorites.")]
    FavoritesCapacityExceeded { capacity: usize },

    #[error("stored favorites are corrupt: {0}")]
    StorageCorrupt(#[source] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("config error: {message}")]
    Config { message: String },
}

impl PassportError {
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::CountryNotFound { name: name.into() }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Errors that leave the session usable. Only a failed catalog load does not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::FetchFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_the_limit() {
        let error = PassportError::FavoritesCapacityExceeded { capacity: 40 };
        assert_eq!(error.to_string(), "You can only have 40 favorites.");
        assert!(error.is_recoverable());
    }

    #[test]
    fn fetch_failure_is_not_recoverable() {
        let error = PassportError::from(FetchError::Timeout { seconds: 30 });
        assert_eq!(
            error.to_string(),
            "could not load countries: request timed out after 30s"
        );
        assert!(!error.is_recoverable());
    }
}
