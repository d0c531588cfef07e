//! The session façade: lifecycle, messaging, and the event pump.

pub mod builder;
pub mod channel;
pub mod listeners;
pub mod search;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::media::{AudioConstraints, AudioSink, LocalAudioStream, MediaDevices};
use crate::transport::{
    Credential, CredentialSource, PeerConnector, PeerEvent, PeerTransport, SignalingExchange,
};

pub use builder::SessionBuilder;
pub use channel::{ChannelState, ControlChannel};
pub use listeners::{Listeners, SessionStatus};
pub use search::{HttpSearchProvider, NO_RESULTS_CONTEXT, SearchProvider, SearchResult};

/// Label the remote side expects on the structured-event channel.
const CONTROL_CHANNEL_LABEL: &str = "oai-events";

/// Typed absorb-and-report result of `initialize` and `ask_question`.
///
/// Failures inside those operations never propagate as faults: they are
/// logged, reported once through the status listeners, and returned here
/// with the same human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    Success,
    Failed(String),
}

impl Outcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failed(detail) => Some(detail),
        }
    }
}

/// A realtime voice-assistant session.
///
/// The aggregate root: owns the peer transport, the control channel, the
/// playback sink, and the local media stream for its lifetime. Constructed
/// via [`Session::builder`]; live after a successful [`Session::initialize`];
/// all owned resources are released by [`Session::disconnect`].
pub struct Session {
    credentials: Arc<dyn CredentialSource>,
    signaling: Arc<dyn SignalingExchange>,
    search: Arc<dyn SearchProvider>,
    media: Arc<dyn MediaDevices>,
    connector: Arc<dyn PeerConnector>,
    listeners: Arc<Listeners>,

    credential: Option<Credential>,
    transport: Option<Box<dyn PeerTransport>>,
    channel: Option<Arc<ControlChannel>>,
    sink: Option<AudioSink>,
    local_stream: Option<LocalAudioStream>,
    pump: Option<JoinHandle<()>>,
}

impl Session {
    #[must_use]
    pub fn builder(config: crate::config::EndpointConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// Establish the session: credential fetch, transport setup, control
    /// channel creation, and the offer/answer exchange, in that order.
    ///
    /// Every internal failure is absorbed: logged, reported through exactly
    /// one `Error` status, and returned as [`Outcome::Failed`].
    pub async fn initialize(&mut self) -> Outcome {
        match self.try_initialize().await {
            Ok(()) => {
                tracing::info!("session initialized");
                Outcome::Success
            }
            Err(err) => self.report_failure("session initialization failed", &err),
        }
    }

    async fn try_initialize(&mut self) -> Result<()> {
        let credential = self.credentials.fetch().await?;

        // Resource handles are stored as soon as they exist, so a failure in
        // any later step leaves a partially initialized session that
        // `disconnect` can still reclaim.
        let sink = AudioSink::default();
        self.transport = Some(self.connector.connect(sink.clone()).await?);
        self.sink = Some(sink);
        let transport = self.transport.as_mut().ok_or(Error::ConnectionClosed)?;

        // Recoverable microphone failures surface through the same absorb
        // path; the distinction only matters for the message shown.
        let local_stream = self.media.open_input(&AudioConstraints::default()).await?;
        transport.attach_local_audio(&local_stream).await?;
        self.local_stream = Some(local_stream);
        let transport = self.transport.as_mut().ok_or(Error::ConnectionClosed)?;

        // The channel must ride in the initial offer.
        let link = transport.open_control_channel(CONTROL_CHANNEL_LABEL).await?;
        let channel = Arc::new(ControlChannel::new(link));

        let offer = transport.create_offer().await?;
        let answer = self.signaling.exchange_offer(&credential, offer).await?;
        let transport = self.transport.as_mut().ok_or(Error::ConnectionClosed)?;
        transport.apply_answer(answer).await?;

        let events = transport.take_events().ok_or(Error::ConnectionClosed)?;
        let pump = spawn_event_pump(events, Arc::clone(&channel), Arc::clone(&self.listeners));

        self.credential = Some(credential);
        self.channel = Some(channel);
        self.pump = Some(pump);
        Ok(())
    }

    /// Tear the session down. Idempotent: every release step is
    /// independently guarded, so a partially initialized session (or a
    /// second call) tears down without fault.
    pub async fn disconnect(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        // Dropping the stream releases the local tracks.
        drop(self.local_stream.take());
        if let Some(channel) = self.channel.take() {
            channel.close().await;
        }
        if let Some(mut transport) = self.transport.take() {
            if let Err(err) = transport.close().await {
                tracing::debug!("transport close: {err}");
            }
        }
        if let Some(sink) = self.sink.take() {
            sink.detach();
        }
        self.credential = None;

        self.listeners.notify_status(SessionStatus::Disconnected, None);
        tracing::info!("session disconnected");
    }

    /// Dispatch `instructions` as a `response.create` event.
    ///
    /// # Errors
    /// Returns [`Error::ChannelNotOpen`] if the control channel is not open;
    /// calling this before the session is ready is programmer misuse.
    pub async fn send_instruction(&self, instructions: &str) -> Result<()> {
        let channel = self.channel.as_ref().ok_or(Error::ChannelNotOpen)?;
        channel.send_instruction(instructions).await
    }

    /// Send a free-text message, echoing it back through the text listeners
    /// as final and self-authored.
    ///
    /// # Errors
    /// Returns [`Error::ChannelNotOpen`] if the control channel is not open.
    pub async fn send_text_message(&self, content: &str) -> Result<()> {
        let channel = self.channel.as_ref().ok_or(Error::ChannelNotOpen)?;
        channel.send_text_message(content).await?;
        self.listeners.notify_text(&format!("You: {content}"), true);
        Ok(())
    }

    /// Search for context on `question` and dispatch an enriched
    /// instruction. Search failures and empty results degrade to the fixed
    /// fallback context; all other failures are absorbed and reported like
    /// `initialize` failures.
    pub async fn ask_question(&self, question: &str) -> Outcome {
        match self.try_ask_question(question).await {
            Ok(()) => Outcome::Success,
            Err(err) => self.report_failure("ask_question failed", &err),
        }
    }

    async fn try_ask_question(&self, question: &str) -> Result<()> {
        let channel = self.channel.as_ref().ok_or(Error::ChannelNotOpen)?;
        channel.ensure_open()?;

        let context = match self.search.search(question).await {
            Ok(results) if results.is_empty() => NO_RESULTS_CONTEXT.to_string(),
            Ok(results) => search::build_context(&results),
            Err(err) => {
                tracing::warn!("search failed, using fallback context: {err}");
                NO_RESULTS_CONTEXT.to_string()
            }
        };

        let instructions = search::build_instructions(question, &context);
        channel.send_instruction(&instructions).await
    }

    /// The most recently dispatched instruction text.
    #[must_use]
    pub fn current_instructions(&self) -> Option<String> {
        self.channel.as_ref().and_then(|channel| channel.last_instruction())
    }

    /// Current control channel state, if a channel exists.
    #[must_use]
    pub fn channel_state(&self) -> Option<ChannelState> {
        self.channel.as_ref().map(|channel| channel.state())
    }

    /// Whether the session currently owns a live transport.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.transport.is_some()
    }

    /// The playback sink holding the remote audio stream, if any.
    #[must_use]
    pub fn audio_sink(&self) -> Option<&AudioSink> {
        self.sink.as_ref()
    }

    fn report_failure(&self, what: &str, err: &Error) -> Outcome {
        tracing::error!("{what}: {err}");
        let detail = err.to_string();
        self.listeners.notify_status(SessionStatus::Error, Some(&detail));
        Outcome::Failed(detail)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.is_active())
            .field("channel_state", &self.channel_state())
            .finish()
    }
}

fn spawn_event_pump(
    mut events: mpsc::Receiver<PeerEvent>,
    channel: Arc<ControlChannel>,
    listeners: Arc<Listeners>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                PeerEvent::MediaConnected => {
                    listeners.notify_status(SessionStatus::Connected, None);
                }
                PeerEvent::ChannelOpen => channel.mark_open(&listeners),
                PeerEvent::ChannelClosed => channel.mark_closed(&listeners),
                PeerEvent::ChannelError(message) => channel.mark_errored(&message, &listeners),
                PeerEvent::ChannelMessage(payload) => {
                    channel.dispatch_inbound(&payload, &listeners);
                }
            }
        }
        tracing::debug!("peer event stream ended");
    })
}
