use std::sync::Arc;

use super::listeners::{Listeners, SessionStatus};
use super::search::{HttpSearchProvider, SearchProvider};
use super::Session;
use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::media::MediaDevices;
use crate::transport::{
    CredentialSource, PeerConnector, SignalingClient, SignalingExchange, WebRtcConnector,
};

/// Builder for [`Session`].
///
/// Collaborators default to their production implementations (HTTP
/// credential/signaling/search clients, the WebRTC connector); a media
/// devices source must always be supplied. Listeners are registered here,
/// before the session starts.
pub struct SessionBuilder {
    config: EndpointConfig,
    media: Option<Arc<dyn MediaDevices>>,
    credentials: Option<Arc<dyn CredentialSource>>,
    signaling: Option<Arc<dyn SignalingExchange>>,
    search: Option<Arc<dyn SearchProvider>>,
    connector: Option<Arc<dyn PeerConnector>>,
    listeners: Listeners,
}

impl SessionBuilder {
    #[must_use]
    pub fn new(config: EndpointConfig) -> Self {
        Self {
            config,
            media: None,
            credentials: None,
            signaling: None,
            search: None,
            connector: None,
            listeners: Listeners::new(),
        }
    }

    #[must_use]
    pub fn media_devices(mut self, media: impl MediaDevices + 'static) -> Self {
        self.media = Some(Arc::new(media));
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: impl CredentialSource + 'static) -> Self {
        self.credentials = Some(Arc::new(credentials));
        self
    }

    #[must_use]
    pub fn signaling(mut self, signaling: impl SignalingExchange + 'static) -> Self {
        self.signaling = Some(Arc::new(signaling));
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl SearchProvider + 'static) -> Self {
        self.search = Some(Arc::new(search));
        self
    }

    #[must_use]
    pub fn connector(mut self, connector: impl PeerConnector + 'static) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Register a transcript/text listener: `(text, is_final)`.
    #[must_use]
    pub fn on_text<F>(mut self, listener: F) -> Self
    where
        F: Fn(&str, bool) + Send + Sync + 'static,
    {
        self.listeners.on_text(listener);
        self
    }

    /// Register a status listener: `(status, detail)`.
    #[must_use]
    pub fn on_status<F>(mut self, listener: F) -> Self
    where
        F: Fn(SessionStatus, Option<&str>) + Send + Sync + 'static,
    {
        self.listeners.on_status(listener);
        self
    }

    /// Register a free-text message listener.
    #[must_use]
    pub fn on_message<F>(mut self, listener: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.listeners.on_message(listener);
        self
    }

    /// Assemble the session. No network activity happens here.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if no media devices source was
    /// supplied.
    pub fn build(self) -> Result<Session> {
        let media = self
            .media
            .ok_or(Error::Configuration("a media devices source is required"))?;

        let http = Arc::new(SignalingClient::new(&self.config));
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::clone(&http) as Arc<dyn CredentialSource>);
        let signaling = self
            .signaling
            .unwrap_or_else(|| http as Arc<dyn SignalingExchange>);
        let search = self
            .search
            .unwrap_or_else(|| Arc::new(HttpSearchProvider::new(&self.config)));
        let connector = self.connector.unwrap_or_else(|| Arc::new(WebRtcConnector));

        Ok(Session {
            credentials,
            signaling,
            search,
            media,
            connector,
            listeners: Arc::new(self.listeners),
            credential: None,
            transport: None,
            channel: None,
            sink: None,
            local_stream: None,
            pump: None,
        })
    }
}
