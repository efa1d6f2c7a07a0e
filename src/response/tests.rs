//! Tests for response serialization.

#[cfg(test)]
mod tests {
    use crate::response::{Cookie, HttpResponse, SameSite, StatusCode};

    #[test]
    fn test_status_line_and_content_length() {
        let response = HttpResponse::new(StatusCode::Created)
            .with_content_type("text/plain")
            .with_body_string("made");
        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 201 Created\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.ends_with("\r\n\r\nmade"));
    }

    #[test]
    fn test_empty_body_still_announces_length() {
        let text = String::from_utf8(HttpResponse::default().to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut response = HttpResponse::new(StatusCode::Ok).with_header("content-type", "text/plain");
        response.set_header("Content-Type", "text/html");
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(
            response.headers.keys().filter(|k| k.eq_ignore_ascii_case("content-type")).count(),
            1
        );
    }

    #[test]
    fn test_line_breaks_in_headers_cannot_split_the_response() {
        let mut response = HttpResponse::new(StatusCode::Found);
        response.set_header("Location", "/home\r\nSet-Cookie: admin=1");
        response.add_cookie(Cookie::new("id", "1\r\nX-Evil: yes"));
        assert_eq!(response.header("Location"), Some("/home  Set-Cookie: admin=1"));

        let text = String::from_utf8(response.to_bytes()).unwrap();
        let head = text.split("\r\n\r\n").next().unwrap();
        assert!(head.lines().all(|line| !line.starts_with("Set-Cookie: admin")));
        assert!(head.lines().all(|line| !line.starts_with("X-Evil")));
        assert!(head.contains("Set-Cookie: id=1  X-Evil: yes\r\n"));
    }

    #[test]
    fn test_cookies_render_as_separate_lines() {
        let mut response = HttpResponse::new(StatusCode::Ok);
        response.add_cookie(Cookie::new("session", "abc").with_path("/").http_only().secure());
        response.add_cookie(
            Cookie::new("theme", "dark")
                .with_domain("example.com")
                .with_max_age(-5)
                .with_same_site(SameSite::Lax),
        );
        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.contains("Set-Cookie: session=abc; Path=/; HttpOnly; Secure\r\n"));
        assert!(text.contains("Set-Cookie: theme=dark; Domain=example.com; Max-Age=0; SameSite=Lax\r\n"));
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(StatusCode::Found.to_string(), "302 Found");
        assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
        assert_eq!(StatusCode::PayloadTooLarge.reason_phrase(), "Payload Too Large");
    }
}
