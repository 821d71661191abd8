/// Crate-wide result type for link resolution.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can end a single link's resolution.
///
/// None of these ever reach the chat: the dispatcher logs them and drops
/// the link.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The candidate is not an absolute http(s) URL with a host.
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Connection, timeout or body transfer failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than 200.
    #[error("{context} returned HTTP {status}")]
    Status {
        context: &'static str,
        status: reqwest::StatusCode,
    },

    /// An API payload did not have the expected shape.
    #[error("malformed JSON from {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A post timestamp did not match the fixed creation-time format.
    #[error("invalid creation timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A platform lookup needs credentials that were not configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    /// Rejected resolver configuration.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn config(message: impl std::fmt::Display) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }
}
