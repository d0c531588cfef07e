use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Audio,
}

/// Response request carried by `response.create`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseRequest {
    pub modalities: Vec<Modality>,
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "response.create")]
    ResponseCreate { response: ResponseRequest },
    #[serde(rename = "text.message")]
    TextMessage { content: String, timestamp: String },
}

impl ClientEvent {
    /// Instruction dispatch requesting both audio and text response output.
    #[must_use]
    pub fn response_create(instructions: impl Into<String>) -> Self {
        Self::ResponseCreate {
            response: ResponseRequest {
                modalities: vec![Modality::Text, Modality::Audio],
                instructions: instructions.into(),
            },
        }
    }

    /// Free-text message stamped with the client clock.
    #[must_use]
    pub fn text_message(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::TextMessage {
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}
