//! Credential fetch and the SDP offer/answer exchange.
//!
//! A strict single request/response exchange: no retries, no renegotiation,
//! and no credential refresh. A hung request blocks the caller; the client
//! is deliberately built without a timeout.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::config::EndpointConfig;
use crate::error::{Error, Result};

/// Short-lived bearer credential for the signaling exchange.
///
/// Opaque and single-use: invalid after the negotiation it was issued for.
/// `Debug` redacts the secret.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Issues the bearer credential used to authenticate the signaling exchange.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn fetch(&self) -> Result<Credential>;
}

/// Performs the offer/answer exchange with the remote signaling endpoint.
#[async_trait]
pub trait SignalingExchange: Send + Sync {
    /// Transmit the offer SDP, authenticated with `credential`, and return
    /// the endpoint's answer SDP.
    async fn exchange_offer(&self, credential: &Credential, offer_sdp: String) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct CredentialResponse {
    client_secret: Option<ClientSecret>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecret {
    value: String,
}

/// HTTP client for the credential and signaling endpoints.
#[derive(Debug, Clone)]
pub struct SignalingClient {
    client: Client,
    credential_url: String,
    signaling_url: String,
    model: String,
}

impl SignalingClient {
    #[must_use]
    pub fn new(config: &EndpointConfig) -> Self {
        Self {
            client: Client::new(),
            credential_url: config.credential_url.clone(),
            signaling_url: config.signaling_url.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl CredentialSource for SignalingClient {
    async fn fetch(&self) -> Result<Credential> {
        let response = self
            .client
            .get(&self.credential_url)
            .send()
            .await
            .map_err(|err| Error::Credential(err.to_string()))?;
        let body: CredentialResponse = response
            .json()
            .await
            .map_err(|err| Error::Credential(err.to_string()))?;

        if let Some(message) = body.error {
            return Err(Error::Credential(message));
        }
        let secret = body
            .client_secret
            .ok_or_else(|| Error::Credential("missing client_secret in response".to_string()))?;

        tracing::info!("obtained ephemeral credential");
        Ok(Credential::new(secret.value))
    }
}

#[async_trait]
impl SignalingExchange for SignalingClient {
    async fn exchange_offer(&self, credential: &Credential, offer_sdp: String) -> Result<String> {
        let mut url = Url::parse(&self.signaling_url)?;
        url.query_pairs_mut().append_pair("model", &self.model);

        let auth = HeaderValue::from_str(&format!("Bearer {}", credential.secret()))
            .map_err(|_| Error::Credential("credential is not a valid header value".to_string()))?;

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/sdp")
            .body(offer_sdp)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NegotiationFailed {
                status: status.as_u16(),
            });
        }

        tracing::info!("signaling exchange completed");
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_redacts_secret() {
        let credential = Credential::new("ek_super_secret");
        let printed = format!("{credential:?}");
        assert!(!printed.contains("super_secret"));
        assert_eq!(credential.secret(), "ek_super_secret");
    }
}
