use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body was not the JSON shape we asked for.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config file: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a failed fetch into an empty value after logging it.
pub trait OrLog<T> {
    fn or_log(self, what: &str) -> T;
}

impl<T: Default> OrLog<T> for Result<T> {
    fn or_log(self, what: &str) -> T {
        match self {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(%error, "{what} failed, continuing with an empty value");
                T::default()
            }
        }
    }
}
