//! Scripted in-memory transport for exercising the client without a network.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Replays queued outcomes in order and records every request it receives.
///
/// Running out of queued outcomes is reported as a transport error naming
/// the unexpected request.
#[derive(Default)]
pub struct MockTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.outcomes
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.outcomes.borrow_mut().push_back(Err(error));
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Request {
                    url: request.url.clone(),
                    message: format!("unexpected {} request", request.method),
                })
            })
    }
}
