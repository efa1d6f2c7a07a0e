//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use serde::{Deserialize, Serialize};

    use crate::parser::{HttpRequest, Method, HttpVersion, Error, expected_len, parse_request};

    #[test]
    fn test_parse_simple_get_request() {
        let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.path, "/index.html");
        assert_eq!(result.query, "");
        assert_eq!(result.version, HttpVersion::Http11);
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
        assert!(result.body.is_empty());
    }

    #[test]
    fn test_case_insensitive_headers() {
        let request = b"GET /index.html HTTP/1.1\r\nhost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert!(result.has_header("host"));
        assert!(result.has_header("HOST"));
        assert!(result.has_header("Host"));
    }

    #[test]
    fn test_missing_host_header() {
        let request = b"GET /index.html HTTP/1.1\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::MissingHeader(ref h)) if h == "Host"));
    }

    #[test]
    fn test_http10_without_host() {
        let request = b"GET /index.html HTTP/1.0\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.version, HttpVersion::Http10);
        assert!(result.headers.is_empty());
    }

    #[test]
    fn test_invalid_method() {
        let request = b"INVALID /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidMethod(ref m)) if m == "INVALID"));
    }

    #[test]
    fn test_invalid_http_version() {
        let request = b"GET /index.html HTTP/9.9\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidVersion(ref v)) if v == "HTTP/9.9"));
    }

    #[test]
    fn test_target_must_be_absolute_path() {
        let request = b"GET index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
        assert!(matches!(parse_request(request), Err(Error::InvalidPath)));
    }

    #[test]
    fn test_invalid_header_format() {
        let request = b"GET /index.html HTTP/1.1\r\nInvalidHeader\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidHeaderFormat)));
    }

    #[test]
    fn test_empty_request() {
        assert!(matches!(parse_request(b""), Err(Error::EmptyRequest)));
        assert!(matches!(parse_request(b"\r\n\r\n"), Err(Error::EmptyRequest)));
    }

    #[test]
    fn test_incomplete_request_line() {
        let result = parse_request(b"GET\r\n");
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[test]
    fn test_all_methods() {
        for (name, expected) in [
            ("GET", Method::GET),
            ("POST", Method::POST),
            ("PUT", Method::PUT),
            ("DELETE", Method::DELETE),
            ("HEAD", Method::HEAD),
            ("OPTIONS", Method::OPTIONS),
            ("PATCH", Method::PATCH),
        ] {
            let request = format!("{name} /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n");
            let result = parse_request(request.as_bytes()).unwrap();
            assert_eq!(result.method, expected);
            assert_eq!(result.method.to_string(), name);
        }
    }

    #[test]
    fn test_http_version_display() {
        assert_eq!(HttpVersion::Http10.to_string(), "HTTP/1.0");
        assert_eq!(HttpVersion::Http11.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::Http20.to_string(), "HTTP/2");
    }

    #[test]
    fn test_headers_with_multiple_colons_and_whitespace() {
        let request = b"GET / HTTP/1.1\r\nHost: example.com  \r\nX-Test: value:with:colons\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
        assert_eq!(result.headers.get("X-Test").unwrap(), "value:with:colons");
    }

    #[test]
    fn test_mixed_line_endings() {
        let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\nUser-Agent: test\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
        assert_eq!(result.headers.get("User-Agent").unwrap(), "test");
    }

    #[test]
    fn test_malformed_utf8_in_request() {
        let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\nX-Test: \xFF\xFF\xFF\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::MalformedRequestLine(ref s)) if s == "Invalid UTF-8"));
    }

    #[test]
    fn test_path_is_percent_decoded() {
        let request = b"GET /users/ada%20l?next=%2Fhome HTTP/1.1\r\nHost: a\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.path, "/users/ada l");
        assert_eq!(result.query, "next=%2Fhome");
        assert_eq!(result.get_query_param("next").unwrap(), "/home");
    }

    #[test]
    fn test_path_decoding_to_invalid_utf8_is_rejected() {
        let request = b"GET /files/%FF HTTP/1.1\r\nHost: a\r\n\r\n";
        assert!(matches!(parse_request(request), Err(Error::InvalidPath)));
    }

    #[test]
    fn test_path_is_split_from_query() {
        let request = b"GET /search?q=test%20query&filter=name:john&flag HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.path, "/search");
        assert_eq!(result.query, "q=test%20query&filter=name:john&flag");
        assert_eq!(result.get_query_param("q").unwrap(), "test query");
        assert_eq!(result.get_query_param("filter").unwrap(), "name:john");
        assert_eq!(result.get_query_param("flag").unwrap(), "");
        assert!(!result.has_query_param("page"));
    }

    #[test]
    fn test_body_is_truncated_to_content_length() {
        let request = b"POST /api/users HTTP/1.1\r\nHost: example.com\r\nContent-Length: 5\r\n\r\nhello world";
        let result = parse_request(request).unwrap();
        assert_eq!(result.body, b"hello");
    }

    #[test]
    fn test_binary_body_is_preserved() {
        let request = b"PUT /blob HTTP/1.1\r\nHost: example.com\r\nContent-Length: 3\r\n\r\n\xFF\x00\xFE";
        let result = parse_request(request).unwrap();
        assert_eq!(result.body, vec![0xFF, 0x00, 0xFE]);
    }

    #[test]
    fn test_invalid_content_length() {
        let request = b"POST / HTTP/1.1\r\nHost: example.com\r\nContent-Length: lots\r\n\r\n";
        assert!(matches!(parse_request(request), Err(Error::InvalidContentLength(ref v)) if v == "lots"));
    }

    #[test]
    fn test_expected_len() {
        assert_eq!(expected_len(b"GET / HTTP/1.1\r\nHost: a").unwrap(), None);

        let head = b"POST / HTTP/1.1\r\nHost: a\r\nContent-Length: 10\r\n\r\n";
        assert_eq!(expected_len(head).unwrap(), Some(head.len() + 10));

        let no_body = b"GET / HTTP/1.1\r\nHost: a\r\n\r\n";
        assert_eq!(expected_len(no_body).unwrap(), Some(no_body.len()));
    }

    #[test]
    fn test_expected_len_rejects_overflowing_content_length() {
        let request = format!("POST /x HTTP/1.1\r\nHost: a\r\nContent-Length: {}\r\n\r\n", usize::MAX);
        assert!(matches!(expected_len(request.as_bytes()), Err(Error::ContentLengthOverflow(usize::MAX))));
    }

    #[test]
    fn test_form_values_prefer_body() {
        let request = b"POST /users?id=7&name=query HTTP/1.1\r\n\
            Host: example.com\r\n\
            Content-Type: application/x-www-form-urlencoded\r\n\
            Content-Length: 17\r\n\
            \r\n\
            name=John+Doe&x=1";
        let result = parse_request(request).unwrap();
        assert!(result.is_form());
        assert_eq!(result.form_value("name").unwrap(), "John Doe");
        assert_eq!(result.form_value("id").unwrap(), "7");
        assert_eq!(result.form_value("missing"), None);
        assert_eq!(result.form_values().len(), 4);
    }

    #[test]
    fn test_form_body_ignored_for_get() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/x-www-form-urlencoded".to_string());
        let request = HttpRequest::with_body(Method::GET, "/".to_string(), HttpVersion::Http10, headers, b"a=1".to_vec());
        assert!(!request.is_form());
        assert_eq!(request.form_value("a"), None);
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestUser {
        name: String,
        email: String,
    }

    #[test]
    fn test_json_parsing() {
        let mut headers = HashMap::new();
        headers.insert("Host".to_string(), "example.com".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let body = r#"{"name":"John Doe","email":"john@example.com"}"#.as_bytes().to_vec();
        let request = HttpRequest::with_body(Method::POST, "/api/users".to_string(), HttpVersion::Http11, headers.clone(), body.clone());

        let user: TestUser = request.json().unwrap();
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.email, "john@example.com");

        let mut headers_no_json = headers.clone();
        headers_no_json.insert("Content-Type".to_string(), "text/plain".to_string());
        let request_no_json = HttpRequest::with_body(Method::POST, "/api/users".to_string(), HttpVersion::Http11, headers_no_json, body);
        let result: Result<TestUser, _> = request_no_json.json();
        assert!(matches!(result, Err(Error::MissingHeader(_))));

        let invalid_body = r#"{"name":"John Doe","email":}"#.as_bytes().to_vec();
        let request_invalid_json = HttpRequest::with_body(Method::POST, "/api/users".to_string(), HttpVersion::Http11, headers, invalid_body);
        let result: Result<TestUser, _> = request_invalid_json.json();
        assert!(matches!(result, Err(Error::JsonError(_))));
    }

    #[test]
    fn test_complex_request() {
        let request = b"POST /api/users?role=admin HTTP/1.1\r\n\
            Host: example.com\r\n\
            Content-Type: application/json\r\n\
            Content-Length: 46\r\n\
            X-API-Key: secret-key\r\n\
            \r\n\
            {\"name\":\"John Doe\",\"email\":\"john@example.com\"}";

        let result = parse_request(request).unwrap();
        assert_eq!(result.method, Method::POST);
        assert_eq!(result.path, "/api/users");
        assert_eq!(result.get_header("x-api-key").unwrap(), "secret-key");
        assert_eq!(result.get_query_param("role").unwrap(), "admin");

        let user: TestUser = result.json().unwrap();
        assert_eq!(user.email, "john@example.com");
    }
}
