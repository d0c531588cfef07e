//! Per-kind listener registration.
//!
//! Each event kind accepts any number of independent listeners, registered
//! on the builder before the session starts.

/// Connection-health states reported through status listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The first remote media stream arrived.
    Connected,
    /// The control channel opened.
    Ready,
    /// The control channel closed or the session was torn down.
    Disconnected,
    /// A failure was absorbed and reported; detail carries a human-readable
    /// message.
    Error,
}

pub type TextListener = Box<dyn Fn(&str, bool) + Send + Sync>;
pub type StatusListener = Box<dyn Fn(SessionStatus, Option<&str>) + Send + Sync>;
pub type MessageListener = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub struct Listeners {
    text: Vec<TextListener>,
    status: Vec<StatusListener>,
    message: Vec<MessageListener>,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transcript/text listener: `(text, is_final)`.
    pub fn on_text<F>(&mut self, listener: F)
    where
        F: Fn(&str, bool) + Send + Sync + 'static,
    {
        self.text.push(Box::new(listener));
    }

    /// Register a status listener: `(status, detail)`.
    pub fn on_status<F>(&mut self, listener: F)
    where
        F: Fn(SessionStatus, Option<&str>) + Send + Sync + 'static,
    {
        self.status.push(Box::new(listener));
    }

    /// Register a free-text message listener.
    pub fn on_message<F>(&mut self, listener: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.message.push(Box::new(listener));
    }

    pub(crate) fn notify_text(&self, text: &str, is_final: bool) {
        for listener in &self.text {
            listener(text, is_final);
        }
    }

    pub(crate) fn notify_status(&self, status: SessionStatus, detail: Option<&str>) {
        for listener in &self.status {
            listener(status, detail);
        }
    }

    pub(crate) fn notify_message(&self, content: &str) {
        for listener in &self.message {
            listener(content);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("text", &self.text.len())
            .field("status", &self.status.len())
            .field("message", &self.message.len())
            .finish()
    }
}
