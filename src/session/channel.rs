//! The control channel: the structured-event protocol over the data link.

use std::sync::Mutex;

use chrono::Utc;

use super::listeners::{Listeners, SessionStatus};
use crate::error::{Error, Result};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::safe_truncate;
use crate::transport::ControlLink;

/// Control channel lifecycle.
///
/// `Connecting → Open → Closed`, with `Errored` reachable from any
/// non-closed state. Sends are only valid in `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
    Errored,
}

pub struct ControlChannel {
    link: Box<dyn ControlLink>,
    state: Mutex<ChannelState>,
    last_instruction: Mutex<Option<String>>,
}

impl ControlChannel {
    pub(crate) fn new(link: Box<dyn ControlLink>) -> Self {
        Self {
            link,
            state: Mutex::new(ChannelState::Connecting),
            last_instruction: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn state(&self) -> ChannelState {
        *self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// The most recently dispatched instruction text.
    #[must_use]
    pub fn last_instruction(&self) -> Option<String> {
        self.last_instruction
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.state() == ChannelState::Open {
            Ok(())
        } else {
            Err(Error::ChannelNotOpen)
        }
    }

    /// Serialize and send a `response.create` event for `instructions`,
    /// recording it as the session's current instruction.
    ///
    /// # Errors
    /// Returns [`Error::ChannelNotOpen`] outside the `Open` state, or the
    /// link's failure if the send itself fails.
    pub async fn send_instruction(&self, instructions: &str) -> Result<()> {
        self.ensure_open()?;
        let payload = serde_json::to_string(&ClientEvent::response_create(instructions))?;
        tracing::trace!("sending event: {}", safe_truncate(&payload));
        self.link.send_text(payload).await?;
        *self
            .last_instruction
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(instructions.to_string());
        Ok(())
    }

    /// Serialize and send a `text.message` event stamped with the client
    /// clock.
    ///
    /// # Errors
    /// Returns [`Error::ChannelNotOpen`] outside the `Open` state, or the
    /// link's failure if the send itself fails.
    pub async fn send_text_message(&self, content: &str) -> Result<()> {
        self.ensure_open()?;
        let event = ClientEvent::text_message(content, Utc::now().to_rfc3339());
        let payload = serde_json::to_string(&event)?;
        tracing::trace!("sending event: {}", safe_truncate(&payload));
        self.link.send_text(payload).await?;
        Ok(())
    }

    pub(crate) async fn close(&self) {
        if let Err(err) = self.link.close().await {
            tracing::debug!("control link close: {err}");
        }
        *self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
            ChannelState::Closed;
    }

    pub(crate) fn mark_open(&self, listeners: &Listeners) {
        tracing::info!("control channel opened");
        *self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = ChannelState::Open;
        listeners.notify_status(SessionStatus::Ready, None);
    }

    pub(crate) fn mark_closed(&self, listeners: &Listeners) {
        tracing::info!("control channel closed");
        *self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
            ChannelState::Closed;
        listeners.notify_status(SessionStatus::Disconnected, None);
    }

    pub(crate) fn mark_errored(&self, message: &str, listeners: &Listeners) {
        tracing::error!("control channel error: {message}");
        {
            let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if *state != ChannelState::Closed {
                *state = ChannelState::Errored;
            }
        }
        listeners.notify_status(SessionStatus::Error, Some(message));
    }

    /// Parse and dispatch one inbound payload.
    ///
    /// Malformed payloads are logged and dropped without touching the
    /// channel or invoking listeners. `response.done` is a terminal event,
    /// so its transcript is delivered as final.
    pub(crate) fn dispatch_inbound(&self, payload: &str, listeners: &Listeners) {
        tracing::trace!("received event: {}", safe_truncate(payload));
        let event = match ServerEvent::parse(payload) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!("dropping inbound event: {err}");
                return;
            }
        };

        match event {
            ServerEvent::ResponseDone { response } => {
                let transcript = response
                    .as_ref()
                    .and_then(crate::protocol::CompletedResponse::first_transcript)
                    .unwrap_or_default();
                listeners.notify_text(transcript, true);
            }
            ServerEvent::TextMessage { content } => listeners.notify_message(&content),
            ServerEvent::Unknown => tracing::debug!("ignoring unrecognized event tag"),
        }
    }
}

impl std::fmt::Debug for ControlChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlChannel")
            .field("state", &self.state())
            .finish()
    }
}
