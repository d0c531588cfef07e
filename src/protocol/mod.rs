//! The structured-event wire protocol carried over the control channel.
//!
//! Messages are UTF-8 JSON with a `type` tag. Outbound events are
//! [`ClientEvent`]; inbound events are [`ServerEvent`]. Unrecognized inbound
//! tags deserialize to [`ServerEvent::Unknown`] and are ignored rather than
//! treated as fatal.

pub mod client_events;
pub mod server_events;

pub use client_events::{ClientEvent, Modality, ResponseRequest};
pub use server_events::{CompletedResponse, ContentEntry, OutputItem, ServerEvent};
