//! Tests for the request context and its write-once response.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use serde::ser::{Error as _, Serialize, Serializer};
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::context::{Context, ResponseWriter, WriteState};
    use crate::logger::{Event, Level, Logger};
    use crate::parser::{HttpRequest, HttpVersion, Method};
    use crate::response::{Cookie, StatusCode};
    use crate::router::{Error, Params};
    use crate::store::Store;

    fn context() -> (Context, UnboundedReceiver<Event>) {
        let mut headers = HashMap::new();
        headers.insert("X-Request-Id".to_string(), "abc".to_string());
        let request = HttpRequest::new(Method::GET, "/users/foo?tab=posts".to_string(), HttpVersion::Http11, headers);
        let params: Params = [("id", "foo")].into_iter().collect();
        let (logger, events) = Logger::channel();
        (Context::new(request, params, Arc::new(Store::new()), logger), events)
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot encode"))
        }
    }

    #[test]
    fn test_writer_allows_a_single_transition() {
        let mut writer = ResponseWriter::new();
        assert_eq!(writer.state(), WriteState::Open);
        assert!(writer.head_mut().is_some());

        writer.finalize().unwrap().status = StatusCode::Created;
        assert_eq!(writer.state(), WriteState::Finalized);
        assert!(writer.finalize().is_none());
        assert!(writer.head_mut().is_none());
        assert_eq!(writer.into_response().status, StatusCode::Created);
    }

    #[test]
    fn test_request_accessors() {
        let (ctx, _events) = context();
        assert_eq!(ctx.param("id"), Some("foo"));
        assert_eq!(ctx.param("missing"), None);
        assert_eq!(ctx.method(), Method::GET);
        assert_eq!(ctx.path(), "/users/foo");
        assert_eq!(ctx.header("x-request-id"), Some("abc"));
        assert_eq!(ctx.form_value("tab"), Some("posts".to_string()));
        assert!(!ctx.is_written());
    }

    #[test]
    fn test_second_write_is_rejected_and_first_kept() {
        let (mut ctx, mut events) = context();
        ctx.write_string(StatusCode::Ok, "hello").unwrap();

        let second = ctx.json(StatusCode::Ok, &json!({ "x": 1 }));
        assert!(matches!(second, Err(Error::SuperfluousWrite("json"))));

        let response = ctx.into_response();
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.body, b"hello");
        assert_eq!(response.header("Content-Type"), None);

        let event = events.try_recv().unwrap();
        assert_eq!(event.level, Level::Warning);
        assert_eq!(event.message, "superfluous call to json");
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_every_response_operation_is_guarded() {
        let (mut ctx, mut events) = context();
        ctx.set_status(StatusCode::NoContent).unwrap();

        assert!(ctx.send(StatusCode::Ok, b"raw".to_vec()).is_err());
        assert!(ctx.write_string(StatusCode::Ok, "s").is_err());
        assert!(ctx.json(StatusCode::Ok, &json!(null)).is_err());
        assert!(ctx.html(StatusCode::Ok, "<p></p>").is_err());
        assert!(ctx.redirect("/elsewhere").is_err());
        assert!(ctx.set_status(StatusCode::Ok).is_err());
        assert!(ctx.bad_request().is_err());
        assert!(ctx.unauthorized().is_err());
        assert!(ctx.forbidden().is_err());
        assert!(ctx.not_found().is_err());
        assert!(ctx.method_not_allowed().is_err());
        assert!(ctx.internal_server_error().is_err());

        let warnings = std::iter::from_fn(|| events.try_recv().ok()).count();
        assert_eq!(warnings, 12);

        let response = ctx.into_response();
        assert_eq!(response.status, StatusCode::NoContent);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_json_is_indented() {
        let (mut ctx, _events) = context();
        ctx.json(StatusCode::Created, &json!({ "message": "hello" })).unwrap();
        let response = ctx.into_response();
        assert_eq!(response.status, StatusCode::Created);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(String::from_utf8(response.body).unwrap(), "{\n  \"message\": \"hello\"\n}");
    }

    #[test]
    fn test_json_encoding_failure_finalizes_with_500() {
        let (mut ctx, _events) = context();
        let result = ctx.json(StatusCode::Ok, &Unserializable);
        assert!(matches!(result, Err(Error::JsonError(_))));
        assert!(ctx.is_written());
        assert!(ctx.write_string(StatusCode::Ok, "too late").is_err());

        let response = ctx.into_response();
        assert_eq!(response.status, StatusCode::InternalServerError);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_html_and_redirect() {
        let (mut ctx, _events) = context();
        ctx.html(StatusCode::Ok, "<h1>hello</h1>").unwrap();
        let response = ctx.into_response();
        assert_eq!(response.header("Content-Type"), Some("text/html"));
        assert_eq!(response.body, b"<h1>hello</h1>");

        let (mut ctx, _events) = context();
        ctx.redirect("/login").unwrap();
        let response = ctx.into_response();
        assert_eq!(response.status, StatusCode::Found);
        assert_eq!(response.header("Location"), Some("/login"));
    }

    #[test]
    fn test_redirect_target_stays_on_one_line() {
        let (mut ctx, _events) = context();
        ctx.redirect("/next\r\nSet-Cookie: session=stolen").unwrap();
        let text = String::from_utf8(ctx.into_response().to_bytes()).unwrap();
        assert!(text.contains("Location: /next  Set-Cookie: session=stolen\r\n"));
        assert!(!text.contains("\r\nSet-Cookie:"));
    }

    #[test]
    fn test_canned_responses() {
        let cases: [(fn(&mut Context) -> Result<(), Error>, StatusCode); 6] = [
            (Context::bad_request, StatusCode::BadRequest),
            (Context::unauthorized, StatusCode::Unauthorized),
            (Context::forbidden, StatusCode::Forbidden),
            (Context::not_found, StatusCode::NotFound),
            (Context::method_not_allowed, StatusCode::MethodNotAllowed),
            (Context::internal_server_error, StatusCode::InternalServerError),
        ];

        for (operation, status) in cases {
            let (mut ctx, _events) = context();
            operation(&mut ctx).unwrap();
            let response = ctx.into_response();
            assert_eq!(response.status, status);
            assert_eq!(response.body, status.reason_phrase().as_bytes());
        }
    }

    #[test]
    fn test_headers_and_cookies_before_finalize() {
        let (mut ctx, _events) = context();
        ctx.set_header("X-One", "1");
        ctx.set_header("X-One", "uno");
        ctx.set_headers(HashMap::from([("X-Two".to_string(), "2".to_string())]));
        ctx.set_cookie(Cookie::new("session", "s1").http_only());
        ctx.set_cookie(Cookie::new("theme", "dark"));
        ctx.send(StatusCode::Ok, b"ok".to_vec()).unwrap();

        // Header writes after finalization do not reach the response.
        ctx.set_header("X-Late", "late");
        ctx.set_cookie(Cookie::new("late", "1"));

        let response = ctx.into_response();
        assert_eq!(response.header("X-One"), Some("uno"));
        assert_eq!(response.header("X-Two"), Some("2"));
        assert_eq!(response.header("X-Late"), None);
        assert_eq!(response.cookies.len(), 2);
    }

    #[test]
    fn test_store_handle_is_shared() {
        let (ctx, _events) = context();
        let other = Arc::clone(ctx.store());
        ctx.store().set("visits", 1);
        assert_eq!(other.get("visits"), Some(json!(1)));
    }
}
