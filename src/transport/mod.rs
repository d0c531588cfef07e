//! The peer transport seam.
//!
//! [`PeerTransport`] wraps the point-to-point media/data connection;
//! [`ControlLink`] is the raw send/close surface of the data channel the
//! control protocol rides on. The production implementation is
//! [`webrtc::WebRtcPeer`]; tests substitute in-memory fakes.

pub mod signaling;
pub mod webrtc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::media::{AudioSink, LocalAudioStream};

pub use signaling::{Credential, CredentialSource, SignalingClient, SignalingExchange};
pub use self::webrtc::{WebRtcConnector, WebRtcPeer};

/// Events the transport delivers asynchronously to the session's pump.
///
/// Channel events arrive in transmission order; the carrying channel is
/// ordered and reliable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// The first remote media stream arrived and was attached to the sink.
    MediaConnected,
    ChannelOpen,
    ChannelClosed,
    ChannelError(String),
    ChannelMessage(String),
}

/// Raw duplex link underneath the control channel.
#[async_trait]
pub trait ControlLink: Send + Sync {
    async fn send_text(&self, payload: String) -> Result<()>;
    async fn close(&self) -> Result<()>;
}

/// The negotiated peer-to-peer connection and its track set.
///
/// Ordering invariant: local tracks and the control channel must be attached
/// before [`PeerTransport::create_offer`], so both ride in the initial offer
/// and the remote side can accept them in the same negotiation round.
#[async_trait]
pub trait PeerTransport: Send {
    /// Attach all local tracks to the connection.
    async fn attach_local_audio(&mut self, stream: &LocalAudioStream) -> Result<()>;

    /// Create the control data channel. Called once, before offer creation.
    async fn open_control_channel(&mut self, label: &str) -> Result<Box<dyn ControlLink>>;

    /// Create a local session description and commit it as the local
    /// description, returning the offer SDP text.
    async fn create_offer(&mut self) -> Result<String>;

    /// Apply the signaling endpoint's response as the remote description.
    async fn apply_answer(&mut self, sdp: String) -> Result<()>;

    async fn close(&mut self) -> Result<()>;

    /// Take the transport's event receiver. Yields `Some` exactly once.
    fn take_events(&mut self) -> Option<mpsc::Receiver<PeerEvent>>;
}

/// Factory for peer transports, injected into the session so setup is
/// testable without media devices or a network.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    /// Create a fresh peer connection with its remote-track handler wired to
    /// `sink`.
    async fn connect(&self, sink: AudioSink) -> Result<Box<dyn PeerTransport>>;
}
