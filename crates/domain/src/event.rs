//! Transport-neutral request and response shapes.
//!
//! The HTTP adapter converts whatever its framework hands it into an
//! [`InboundEvent`], and converts the [`WebhookResponse`] the dispatcher
//! returns back into a framework response. Nothing in this module knows about
//! a particular HTTP library.

use std::collections::HashMap;

/// Body returned for every successfully handled event.
///
/// Terraform Cloud run task verification requires exactly this text.
pub const OK_RESPONSE: &str = "200 OK";

/// HTTP methods the dispatcher distinguishes between.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    /// Any other method, kept verbatim for logging.
    Other(String),
}

impl HttpMethod {
    /// Parses a method name case-insensitively.
    pub fn parse(method: &str) -> Self {
        if method.eq_ignore_ascii_case("GET") {
            Self::Get
        } else if method.eq_ignore_ascii_case("POST") {
            Self::Post
        } else {
            Self::Other(method.to_ascii_uppercase())
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
            Self::Other(m) => f.write_str(m),
        }
    }
}

/// One inbound webhook call.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    method: HttpMethod,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl InboundEvent {
    /// Creates an event. Header names are normalised to lowercase.
    pub fn new<I, K, V>(method: HttpMethod, headers: I, body: impl Into<Vec<u8>>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        Self {
            method,
            headers,
            body: body.into(),
        }
    }

    /// Request method.
    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    /// Looks up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Raw request body, exactly as received.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// What the dispatcher hands back to the transport on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl WebhookResponse {
    /// The fixed acknowledgement: status 200, body [`OK_RESPONSE`].
    pub fn ok() -> Self {
        Self {
            status: 200,
            body: OK_RESPONSE.to_string(),
        }
    }
}
