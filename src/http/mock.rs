use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::http::{HttpRequest, RawResponse, Transport, TransportError};

type Scripted = std::result::Result<RawResponse, TransportError>;

#[derive(Default)]
struct MockState {
    script: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

/// Mock transport for testing without network access
///
/// Replays scripted outcomes in order and records every request it sees.
/// Clones share state, so a test can keep a handle after moving one clone
/// into a [crate::http::RequestHelper].
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a new mock with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an HTTP response
    pub fn push_response(&self, response: RawResponse) {
        self.lock().script.push_back(Ok(response));
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: TransportError) {
        self.lock().script.push_back(Err(error));
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the requests from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Scripted {
        let mut state = self.lock();
        state.requests.push(request.clone());
        state.script.pop_front().unwrap_or_else(|| {
            Err(TransportError::fatal(format!(
                "no scripted response for {} {}",
                request.method, request.url
            )))
        })
    }
}
