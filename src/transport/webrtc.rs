//! WebRTC-backed [`PeerTransport`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_local::TrackLocal;

use super::{ControlLink, PeerConnector, PeerEvent, PeerTransport};
use crate::error::Result;
use crate::media::{AudioSink, LocalAudioStream};

const PEER_EVENT_BUFFER: usize = 64;

/// Default connector building [`WebRtcPeer`] transports.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebRtcConnector;

#[async_trait]
impl PeerConnector for WebRtcConnector {
    async fn connect(&self, sink: AudioSink) -> Result<Box<dyn PeerTransport>> {
        Ok(Box::new(WebRtcPeer::connect(sink).await?))
    }
}

/// Peer transport over a `webrtc` crate `RTCPeerConnection`.
pub struct WebRtcPeer {
    peer: Arc<RTCPeerConnection>,
    events_tx: mpsc::Sender<PeerEvent>,
    events_rx: Option<mpsc::Receiver<PeerEvent>>,
}

impl WebRtcPeer {
    /// Create the peer connection and register the remote-track handler.
    ///
    /// The first inbound remote stream is attached to `sink` and announced
    /// as [`PeerEvent::MediaConnected`]; connection-object creation alone
    /// does not count as connected.
    ///
    /// # Errors
    /// Returns an error if codec or interceptor registration fails, or the
    /// peer connection cannot be created.
    pub async fn connect(sink: AudioSink) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let mut registry = Registry::new();
        registry = register_default_interceptors(registry, &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();
        let peer = Arc::new(api.new_peer_connection(RTCConfiguration::default()).await?);

        let (events_tx, events_rx) = mpsc::channel(PEER_EVENT_BUFFER);

        let tx = events_tx.clone();
        peer.on_track(Box::new(move |track, _receiver, _transceiver| {
            let tx = tx.clone();
            let sink = sink.clone();
            Box::pin(async move {
                if sink.attach(track) {
                    tracing::info!("remote media stream attached to playback sink");
                    let _ = tx.send(PeerEvent::MediaConnected).await;
                }
            })
        }));

        Ok(Self {
            peer,
            events_tx,
            events_rx: Some(events_rx),
        })
    }
}

#[async_trait]
impl PeerTransport for WebRtcPeer {
    async fn attach_local_audio(&mut self, stream: &LocalAudioStream) -> Result<()> {
        for track in stream.tracks() {
            self.peer
                .add_track(Arc::clone(track) as Arc<dyn TrackLocal + Send + Sync>)
                .await?;
        }
        Ok(())
    }

    async fn open_control_channel(&mut self, label: &str) -> Result<Box<dyn ControlLink>> {
        let channel = self.peer.create_data_channel(label, None).await?;

        let tx = self.events_tx.clone();
        channel.on_open(Box::new(move || {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(PeerEvent::ChannelOpen).await;
            })
        }));

        let tx = self.events_tx.clone();
        channel.on_close(Box::new(move || {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(PeerEvent::ChannelClosed).await;
            })
        }));

        let tx = self.events_tx.clone();
        channel.on_error(Box::new(move |err| {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(PeerEvent::ChannelError(err.to_string())).await;
            })
        }));

        let tx = self.events_tx.clone();
        channel.on_message(Box::new(move |message: DataChannelMessage| {
            let tx = tx.clone();
            Box::pin(async move {
                match String::from_utf8(message.data.to_vec()) {
                    Ok(payload) => {
                        let _ = tx.send(PeerEvent::ChannelMessage(payload)).await;
                    }
                    Err(_) => tracing::warn!("dropping non-UTF-8 control message"),
                }
            })
        }));

        Ok(Box::new(WebRtcLink { channel }))
    }

    async fn create_offer(&mut self) -> Result<String> {
        let offer = self.peer.create_offer(None).await?;
        let sdp = offer.sdp.clone();
        self.peer.set_local_description(offer).await?;
        Ok(sdp)
    }

    async fn apply_answer(&mut self, sdp: String) -> Result<()> {
        let answer = RTCSessionDescription::answer(sdp)?;
        self.peer.set_remote_description(answer).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.peer.close().await?;
        Ok(())
    }

    fn take_events(&mut self) -> Option<mpsc::Receiver<PeerEvent>> {
        self.events_rx.take()
    }
}

struct WebRtcLink {
    channel: Arc<RTCDataChannel>,
}

#[async_trait]
impl ControlLink for WebRtcLink {
    async fn send_text(&self, payload: String) -> Result<()> {
        let _ = self.channel.send_text(payload).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.channel.close().await?;
        Ok(())
    }
}
