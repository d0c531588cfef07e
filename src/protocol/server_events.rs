use serde::Deserialize;

use crate::error::{Error, Result};

/// A single content entry inside a completed response output item.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ContentEntry {
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputItem {
    #[serde(default)]
    pub content: Vec<ContentEntry>,
}

/// The response body of a `response.done` event.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompletedResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

impl CompletedResponse {
    /// Transcript of the first output item's first content entry.
    ///
    /// Every level of the structure is optional on the wire; a missing level
    /// short-circuits to `None` rather than faulting.
    #[must_use]
    pub fn first_transcript(&self) -> Option<&str> {
        self.output.first()?.content.first()?.transcript.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// A completed assistant response carrying the transcript content.
    #[serde(rename = "response.done")]
    ResponseDone {
        #[serde(default)]
        response: Option<CompletedResponse>,
    },
    /// A free-text message from the remote side.
    #[serde(rename = "text.message")]
    TextMessage {
        #[serde(default)]
        content: String,
    },
    /// Any tag this client does not recognize. Ignored, never fatal.
    #[serde(other)]
    Unknown,
}

impl ServerEvent {
    /// Parse a raw control-channel payload.
    ///
    /// # Errors
    /// Returns [`Error::MalformedEvent`] if the payload is not a valid
    /// structured event. Callers drop and log such payloads; the channel
    /// itself stays up.
    pub fn parse(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|err| Error::MalformedEvent(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_extraction_short_circuits() {
        let empty = CompletedResponse::default();
        assert_eq!(empty.first_transcript(), None);

        let no_content = CompletedResponse {
            output: vec![OutputItem::default()],
        };
        assert_eq!(no_content.first_transcript(), None);

        let no_transcript = CompletedResponse {
            output: vec![OutputItem {
                content: vec![ContentEntry::default()],
            }],
        };
        assert_eq!(no_transcript.first_transcript(), None);
    }
}
