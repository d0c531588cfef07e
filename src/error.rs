use thiserror::Error;

use crate::media::MediaError;

#[derive(Error, Debug)]
pub enum Error {
    /// The credential endpoint failed or returned an error body.
    #[error("credential endpoint failure: {0}")]
    Credential(String),

    /// Microphone acquisition failed. Permission denial and device absence
    /// are recoverable kinds; anything else is fatal to setup.
    #[error("{0}")]
    MediaAccess(#[from] MediaError),

    /// The signaling endpoint rejected the offer exchange.
    #[error("signaling endpoint returned status {status}")]
    NegotiationFailed { status: u16 },

    /// A send was attempted while the control channel was not open.
    #[error("control channel is not open")]
    ChannelNotOpen,

    /// An inbound control message could not be parsed.
    #[error("malformed control event: {0}")]
    MalformedEvent(String),

    /// The search collaborator failed or returned an error body.
    #[error("search endpoint failure: {0}")]
    Search(String),

    #[error("HTTP protocol error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse or serialize JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("WebRTC error: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("The connection was closed unexpectedly")]
    ConnectionClosed,

    #[error("Invalid session configuration: {0}")]
    Configuration(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
