use std::io;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Why a single frame could not be turned into an event.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Failure to open the connection, split by what the user should be told.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connection refused")]
    Refused(#[source] io::Error),
    #[error("invalid websocket url: {0}")]
    InvalidUrl(#[source] tungstenite::Error),
    #[error("{0}")]
    Transport(#[source] tungstenite::Error),
}

impl ConnectError {
    pub fn classify(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::Io(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                Self::Refused(e)
            }
            e @ (tungstenite::Error::Url(_) | tungstenite::Error::HttpFormat(_)) => {
                Self::InvalidUrl(e)
            }
            other => Self::Transport(other),
        }
    }
}
