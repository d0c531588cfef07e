#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

//! Realtime voice-assistant sessions over WebRTC.
//!
//! A [`session::Session`] negotiates a peer connection with a remote
//! voice-assistant service: it fetches a short-lived credential, sets up the
//! media transport and microphone tracks, opens a structured-event control
//! channel, and exchanges session descriptions with the signaling endpoint.
//! Once ready, instructions and text messages flow out over the control
//! channel and transcripts/status changes flow back through registered
//! listeners. The [`session::Session::ask_question`] workflow additionally
//! enriches instructions with results from an external search endpoint.

pub mod config;
pub mod error;
pub mod media;
pub mod protocol;
pub mod session;
pub mod transport;

pub use config::EndpointConfig;
pub use error::{Error, Result};
pub use media::{AudioConstraints, AudioSink, LocalAudioStream, MediaDevices, MediaError};
pub use protocol::{ClientEvent, CompletedResponse, Modality, ServerEvent};
pub use session::{
    ChannelState, HttpSearchProvider, Listeners, Outcome, SearchProvider, SearchResult, Session,
    SessionBuilder, SessionStatus,
};
pub use transport::{
    ControlLink, Credential, CredentialSource, PeerConnector, PeerEvent, PeerTransport,
    SignalingClient, SignalingExchange, WebRtcConnector, WebRtcPeer,
};

const TRACE_LOG_MAX_BYTES: usize = 1024;

/// Truncate a wire payload for trace logging, respecting char boundaries.
pub(crate) fn safe_truncate(s: &str) -> std::borrow::Cow<'_, str> {
    if s.len() <= TRACE_LOG_MAX_BYTES {
        return std::borrow::Cow::Borrowed(s);
    }

    let mut end = TRACE_LOG_MAX_BYTES;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!(
        "{}... (truncated) {} bytes",
        &s[..end],
        s.len() - end
    ))
}

#[cfg(test)]
mod tests {
    use super::safe_truncate;

    #[test]
    fn short_payloads_pass_through() {
        assert_eq!(safe_truncate("{}"), "{}");
    }

    #[test]
    fn long_payloads_are_capped() {
        let long = "x".repeat(4096);
        let truncated = safe_truncate(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.contains("truncated"));
    }
}
