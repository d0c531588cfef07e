/// Default base URL for the signaling exchange.
pub const DEFAULT_SIGNALING_URL: &str = "https://api.openai.com/v1/realtime";

/// Default model requested during the signaling exchange.
pub const DEFAULT_MODEL: &str = "gpt-4o-realtime-preview-2024-12-17";

/// Endpoint configuration for a session.
///
/// The credential and search endpoints are deployment specific and must be
/// provided; the signaling base URL and model carry sensible defaults.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// `GET` endpoint issuing the short-lived bearer credential.
    pub credential_url: String,
    /// Base URL of the signaling endpoint the SDP offer is posted to.
    pub signaling_url: String,
    /// Model identifier appended to the signaling request.
    pub model: String,
    /// `POST` endpoint of the external search collaborator.
    pub search_url: String,
}

impl EndpointConfig {
    #[must_use]
    pub fn new(credential_url: impl Into<String>, search_url: impl Into<String>) -> Self {
        Self {
            credential_url: credential_url.into(),
            signaling_url: DEFAULT_SIGNALING_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            search_url: search_url.into(),
        }
    }

    #[must_use]
    pub fn with_signaling_url(mut self, url: impl Into<String>) -> Self {
        self.signaling_url = url.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_signaling_and_model() {
        let config = EndpointConfig::new("https://backend.example/session", "https://backend.example/search");
        assert_eq!(config.signaling_url, DEFAULT_SIGNALING_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.credential_url, "https://backend.example/session");
    }

    #[test]
    fn overrides_apply() {
        let config = EndpointConfig::new("a", "b")
            .with_signaling_url("https://rtc.example/negotiate")
            .with_model("gpt-test");
        assert_eq!(config.signaling_url, "https://rtc.example/negotiate");
        assert_eq!(config.model, "gpt-test");
    }
}
