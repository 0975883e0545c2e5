//! Test doubles for the transport seam

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use sitewit_domain::Result;

use crate::http::{ApiRequest, Transport};

/// Transport that records every request and replays queued responses.
///
/// When the queue is empty it answers `Value::Null`, which is what the HTTP
/// transport returns for an empty 2xx body.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<Value>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: impl IntoIterator<Item = Result<Value>>) -> Self {
        Self { requests: Mutex::default(), responses: Mutex::new(responses.into_iter().collect()) }
    }

    pub fn push_response(&self, response: Result<Value>) {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}
