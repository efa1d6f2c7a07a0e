//! HTTP request parsing and representation.

use std::collections::HashMap;
use std::str::FromStr;
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Represents an HTTP request as handed to the router.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The percent-decoded request path, without the query string
    pub path: String,
    /// The raw query string (without the leading `?`), empty when absent
    pub query: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The request body
    pub body: Vec<u8>,
    /// Decoded query parameters; the last occurrence of a key wins
    pub query_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a new HTTP request from a request target such as `/search?q=rust`.
    ///
    /// The target is split into [`path`](Self::path) and [`query`](Self::query).
    /// The path is percent-decoded (kept as sent if that does not yield valid
    /// UTF-8); the query stays raw and is decoded into
    /// [`query_params`](Self::query_params).
    pub fn new(method: Method, target: String, version: HttpVersion, headers: HashMap<String, String>) -> Self {
        let (raw_path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query.to_string()),
            None => (target.as_str(), String::new()),
        };

        let path = match urlencoding::decode(raw_path) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => raw_path.to_string(),
        };

        let query_params = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Self {
            method,
            path,
            query,
            version,
            headers,
            body: Vec::new(),
            query_params,
        }
    }

    /// Create a new HTTP request with a body.
    pub fn with_body(method: Method, target: String, version: HttpVersion, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let mut request = Self::new(method, target, version, headers);
        request.body = body;
        request
    }

    /// Get a header value, ignoring the case of the header name.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                Some(v)
            } else {
                None
            }
        })
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Parse the request body as JSON.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingHeader`] when the request is not declared as
    /// JSON, or [`Error::JsonError`] when the body does not decode.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader("Content-Type: application/json".to_string()));
        }

        let json = serde_json::from_slice(&self.body)?;
        Ok(json)
    }

    /// Check if the request has a JSON body.
    pub fn is_json(&self) -> bool {
        self.get_header("Content-Type")
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    }

    /// Check if the request carries an urlencoded form body.
    pub fn is_form(&self) -> bool {
        self.method.accepts_form_body()
            && self.get_header("Content-Type")
                .is_some_and(|content_type| content_type.starts_with(FORM_CONTENT_TYPE))
    }

    /// Get a query parameter value.
    pub fn get_query_param(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    /// Check if a query parameter exists.
    pub fn has_query_param(&self, name: &str) -> bool {
        self.query_params.contains_key(name)
    }

    /// All form pairs in order: urlencoded body pairs first, then query pairs.
    pub fn form_values(&self) -> Vec<(String, String)> {
        let mut values = Vec::new();
        if self.is_form() {
            values.extend(form_urlencoded::parse(&self.body).into_owned());
        }
        values.extend(form_urlencoded::parse(self.query.as_bytes()).into_owned());
        values
    }

    /// First value for `key`, with body values taking precedence over the query string.
    pub fn form_value(&self, key: &str) -> Option<String> {
        self.form_values()
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

/// Locates the end of the request head.
///
/// Returns the length of the head and the offset at which the body starts.
fn split_head(input: &[u8]) -> Option<(usize, usize)> {
    let crlf = find(input, b"\r\n\r\n").map(|i| (i, i + 4));
    let lf = find(input, b"\n\n").map(|i| (i, i + 2));
    match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn content_length(headers: &HashMap<String, String>) -> Result<Option<usize>, Error> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
        .map(|(_, v)| v.parse::<usize>().map_err(|_| Error::InvalidContentLength(v.clone())))
        .transpose()
}

/// Report how many bytes a complete request occupies.
///
/// Returns `Ok(None)` while the head has not been fully received yet. Once it
/// has, the result is the head length plus the announced `Content-Length`
/// (zero when the header is absent). A length whose sum with the head does
/// not fit in `usize` is reported as [`Error::ContentLengthOverflow`].
pub fn expected_len(input: &[u8]) -> Result<Option<usize>, Error> {
    let Some((head_len, body_start)) = split_head(input) else {
        return Ok(None);
    };

    let head = std::str::from_utf8(&input[..head_len])
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;
    let headers = parse_headers(head.lines().skip(1))?;
    let body_len = content_length(&headers)?.unwrap_or(0);

    body_start
        .checked_add(body_len)
        .map(Some)
        .ok_or(Error::ContentLengthOverflow(body_len))
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Result<HashMap<String, String>, Error> {
    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }

        let (name, value) = line.split_once(':').ok_or(Error::InvalidHeaderFormat)?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}

/// Parse an HTTP request from a byte slice.
///
/// The head must be valid UTF-8; everything after the blank line is kept as
/// the body, truncated to `Content-Length` when that header is present.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let (head, body) = match split_head(input) {
        Some((head_len, body_start)) => (&input[..head_len], &input[body_start..]),
        None => (input, &[][..]),
    };

    let head = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;

    let mut lines = head.lines();

    let request_line = match lines.next() {
        Some(line) if !line.trim().is_empty() => line,
        _ => return Err(Error::EmptyRequest),
    };

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let method = Method::from_str(parts[0])?;

    let target = parts[1].to_string();
    if !target.starts_with('/') {
        return Err(Error::InvalidPath);
    }
    let raw_path = target.split_once('?').map_or(target.as_str(), |(path, _)| path);
    if urlencoding::decode(raw_path).is_err() {
        return Err(Error::InvalidPath);
    }

    let version = HttpVersion::from_str(parts[2])?;

    let headers = parse_headers(lines)?;

    if version.requires_host() && !headers.keys().any(|k| k.eq_ignore_ascii_case("Host")) {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    let body = match content_length(&headers)? {
        Some(len) => body[..len.min(body.len())].to_vec(),
        None => body.to_vec(),
    };

    Ok(HttpRequest::with_body(method, target, version, headers, body))
}
