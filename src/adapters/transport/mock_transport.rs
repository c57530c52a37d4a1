//! Mock HTTP transport for testing.
//!
//! Replies are scripted in order and every request is recorded, so tests
//! can drive the executor and fetch strategies without a network.
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new()
//!     .with_status(500)
//!     .with_json(200, json!({"issues": []}));
//!
//! let response = transport.send(&HttpRequest::get(url)).await?;
//! assert_eq!(transport.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return an HTTP response.
    Response(HttpResponse),
    /// Fail below the HTTP layer.
    Error(TransportError),
}

/// Scripted transport. Clones share the same script and call log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a full response.
    pub fn with_response(self, response: HttpResponse) -> Self {
        self.push(MockReply::Response(response));
        self
    }

    /// Queues a JSON body with the given status.
    pub fn with_json(self, status: u16, body: serde_json::Value) -> Self {
        self.with_response(HttpResponse::new(status, body.to_string()))
    }

    /// Queues an empty-bodied response with the given status.
    pub fn with_status(self, status: u16) -> Self {
        self.with_response(HttpResponse::new(status, ""))
    }

    /// Queues a transport failure.
    pub fn with_error(self, error: TransportError) -> Self {
        self.push(MockReply::Error(error));
        self
    }

    /// Queues a reply after construction.
    pub fn push(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Returns the number of requests received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(error)) => Err(error),
            None => Err(TransportError::Other(format!(
                "no scripted reply for {} {}",
                request.method, request.url
            ))),
        }
    }
}
