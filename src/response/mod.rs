//! HTTP response types.
//!
//! [`HttpResponse`] is the finalized value the router hands back to the
//! transport; the write-once rules live in [`crate::context`].

mod cookie;
mod status;
mod tests;

use std::collections::HashMap;

pub use cookie::{Cookie, SameSite};
pub use status::StatusCode;

/// Represents an HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers, without `Content-Length` which is derived from the body
    pub headers: HashMap<String, String>,
    /// Cookies, each rendered as its own `Set-Cookie` line
    pub cookies: Vec<Cookie>,
    /// The response body
    pub body: Vec<u8>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code.
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), "microroute".to_string());

        Self {
            status,
            headers,
            cookies: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Set the response body with a string.
    pub fn with_body_string(self, body: impl Into<String>) -> Self {
        self.with_body_bytes(body.into().into_bytes())
    }

    /// Set the response body with bytes.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Add or replace a header in place.
    ///
    /// Header names compare case-insensitively; the last spelling wins. CR and
    /// LF in the name or value are replaced by spaces so a value cannot start
    /// a new header line.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = single_line(name.into());
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, single_line(value.into()));
    }

    /// Get a header value, ignoring the case of the header name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Append a cookie.
    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }

    /// Convert the response to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(128 + self.body.len());

        bytes.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            if name.eq_ignore_ascii_case("Content-Length") {
                continue;
            }
            bytes.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }

        for cookie in &self.cookies {
            let cookie = single_line(cookie.to_string());
            bytes.extend_from_slice(format!("Set-Cookie: {cookie}\r\n").as_bytes());
        }

        bytes.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        bytes.extend_from_slice(b"\r\n");
        bytes.extend_from_slice(&self.body);

        bytes
    }
}

const LINE_BREAKS: &[char] = &['\r', '\n'];

fn single_line(s: String) -> String {
    if s.contains(LINE_BREAKS) {
        s.replace(LINE_BREAKS, " ")
    } else {
        s
    }
}
