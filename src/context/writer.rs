//! Write-once response state.

use crate::response::HttpResponse;

/// Lifecycle of a response: it starts open and is finalized exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Open,
    Finalized,
}

/// Owns the response under construction and enforces the single
/// `Open → Finalized` transition.
#[derive(Debug)]
pub struct ResponseWriter {
    state: WriteState,
    response: HttpResponse,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            state: WriteState::Open,
            response: HttpResponse::default(),
        }
    }

    pub fn state(&self) -> WriteState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == WriteState::Finalized
    }

    /// Finalize the response and hand it out to be filled in.
    ///
    /// Returns `None` if the response was already finalized; the existing
    /// response is left untouched in that case.
    pub fn finalize(&mut self) -> Option<&mut HttpResponse> {
        match self.state {
            WriteState::Open => {
                self.state = WriteState::Finalized;
                Some(&mut self.response)
            }
            WriteState::Finalized => None,
        }
    }

    /// The response for header and cookie edits, available while still open.
    pub fn head_mut(&mut self) -> Option<&mut HttpResponse> {
        match self.state {
            WriteState::Open => Some(&mut self.response),
            WriteState::Finalized => None,
        }
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    pub fn into_response(self) -> HttpResponse {
        self.response
    }
}
