//! Per-request context handed to middlewares and handlers.
//!
//! A [`Context`] is created by the router for every matched request and lives
//! only as long as that request's dispatch. Its response follows a
//! write-once contract: the first response operation wins, every later one is
//! logged as a warning and returns [`Error::SuperfluousWrite`] while the
//! response already written stays as it was.

mod writer;
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::logger::Logger;
use crate::parser::{HttpRequest, Method};
use crate::response::{Cookie, HttpResponse, StatusCode};
use crate::router::{Error, Params};
use crate::store::Store;

pub use writer::{ResponseWriter, WriteState};

/// Per-request state: parameters, request data, shared handles and the
/// response being written.
#[derive(Debug)]
pub struct Context {
    params: Params,
    request: HttpRequest,
    store: Arc<Store>,
    logger: Logger,
    writer: ResponseWriter,
}

impl Context {
    pub fn new(request: HttpRequest, params: Params, store: Arc<Store>, logger: Logger) -> Self {
        Self {
            params,
            request,
            store,
            logger,
            writer: ResponseWriter::new(),
        }
    }

    /// The value captured for the dynamic segment `:name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn method(&self) -> Method {
        self.request.method
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    /// A request header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.get_header(name).map(String::as_str)
    }

    /// A form value from the urlencoded body or the query string.
    pub fn form_value(&self, key: &str) -> Option<String> {
        self.request.form_value(key)
    }

    /// The store shared by every request.
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Whether a response operation has already run.
    pub fn is_written(&self) -> bool {
        self.writer.is_finalized()
    }

    /// The response as written so far.
    pub fn response(&self) -> &HttpResponse {
        self.writer.response()
    }

    pub(crate) fn into_response(self) -> HttpResponse {
        self.writer.into_response()
    }

    /// Set a response header. Ignored once the response is finalized.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.writer.head_mut() {
            Some(response) => response.set_header(name, value),
            None => debug!("header {name} set after the response was written"),
        }
    }

    /// Set several response headers at once.
    pub fn set_headers(&mut self, headers: HashMap<String, String>) {
        for (name, value) in headers {
            self.set_header(name, value);
        }
    }

    /// Add a `Set-Cookie` header. Ignored once the response is finalized.
    pub fn set_cookie(&mut self, cookie: Cookie) {
        match self.writer.head_mut() {
            Some(response) => response.add_cookie(cookie),
            None => debug!("cookie {} set after the response was written", cookie.name),
        }
    }

    /// Take the one allowed transition to finalized, or report the
    /// superfluous `operation`.
    fn finalize(&mut self, operation: &'static str) -> Result<&mut HttpResponse, Error> {
        match self.writer.finalize() {
            Some(response) => Ok(response),
            None => {
                self.logger.warning(format!("superfluous call to {operation}"));
                Err(Error::SuperfluousWrite(operation))
            }
        }
    }

    /// Write raw bytes.
    pub fn send(&mut self, status: StatusCode, data: impl Into<Vec<u8>>) -> Result<(), Error> {
        let response = self.finalize("send")?;
        response.status = status;
        response.body = data.into();
        Ok(())
    }

    /// Write a string.
    pub fn write_string(&mut self, status: StatusCode, s: impl Into<String>) -> Result<(), Error> {
        let response = self.finalize("write_string")?;
        response.status = status;
        response.body = s.into().into_bytes();
        Ok(())
    }

    /// Write `value` as indented JSON.
    ///
    /// If encoding fails the response is still finalized, with a 500 status
    /// and no body, and the encoding error is returned.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> Result<(), Error> {
        let response = self.finalize("json")?;
        match serde_json::to_vec_pretty(value) {
            Ok(body) => {
                response.set_header("Content-Type", "application/json");
                response.status = status;
                response.body = body;
                Ok(())
            }
            Err(e) => {
                response.status = StatusCode::InternalServerError;
                Err(Error::JsonError(e))
            }
        }
    }

    /// Write an HTML document.
    pub fn html(&mut self, status: StatusCode, html: impl Into<String>) -> Result<(), Error> {
        let response = self.finalize("html")?;
        response.set_header("Content-Type", "text/html");
        response.status = status;
        response.body = html.into().into_bytes();
        Ok(())
    }

    /// Redirect the client to `location` with `302 Found`.
    pub fn redirect(&mut self, location: impl Into<String>) -> Result<(), Error> {
        let response = self.finalize("redirect")?;
        response.set_header("Location", location);
        response.status = StatusCode::Found;
        Ok(())
    }

    /// Finalize with `status` and an empty body.
    pub fn set_status(&mut self, status: StatusCode) -> Result<(), Error> {
        let response = self.finalize("set_status")?;
        response.status = status;
        Ok(())
    }

    fn canned(&mut self, operation: &'static str, status: StatusCode) -> Result<(), Error> {
        let response = self.finalize(operation)?;
        response.set_header("Content-Type", "text/plain; charset=utf-8");
        response.status = status;
        response.body = status.reason_phrase().as_bytes().to_vec();
        Ok(())
    }

    pub fn bad_request(&mut self) -> Result<(), Error> {
        self.canned("bad_request", StatusCode::BadRequest)
    }

    pub fn unauthorized(&mut self) -> Result<(), Error> {
        self.canned("unauthorized", StatusCode::Unauthorized)
    }

    pub fn forbidden(&mut self) -> Result<(), Error> {
        self.canned("forbidden", StatusCode::Forbidden)
    }

    pub fn not_found(&mut self) -> Result<(), Error> {
        self.canned("not_found", StatusCode::NotFound)
    }

    pub fn method_not_allowed(&mut self) -> Result<(), Error> {
        self.canned("method_not_allowed", StatusCode::MethodNotAllowed)
    }

    pub fn internal_server_error(&mut self) -> Result<(), Error> {
        self.canned("internal_server_error", StatusCode::InternalServerError)
    }
}
