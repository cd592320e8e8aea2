//! Inbound message shapes
//!
//! Defines what the framing layer hands to the gate and to downstream handlers.

/// One decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// A whitespace-tokenized command line.
    Command(Vec<String>),
    /// An HTTP request: head plus any `Content-Length` body.
    Http(HttpRequest),
    /// Anything the framing layer could not classify, tagged with a short description.
    Other(String),
}

impl InboundMessage {
    /// Short description of the message shape, safe to log.
    pub fn kind(&self) -> &str {
        match self {
            InboundMessage::Command(_) => "command",
            InboundMessage::Http(_) => "http",
            InboundMessage::Other(kind) => kind,
        }
    }
}

/// An HTTP request with its headers in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub uri: String,
    pub version: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            version: version.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// First header whose trimmed name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}
