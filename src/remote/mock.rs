//! Scripted transport for deterministic tests without a backend.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use super::{Call, RemoteError, Transport};

/// Pre-programmed outcome of one call.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Resolve with this JSON value.
    Ok(Value),
    /// Reject with this error.
    Err(RemoteError),
    /// Wait a duration, then resolve with the inner response.
    Delay(Duration, Box<MockResponse>),
}

impl MockResponse {
    /// Convenience: serialize any value into a successful response.
    pub fn ok(value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Self::Ok(v),
            Err(e) => Self::Err(RemoteError::Decode(e.to_string())),
        }
    }

    /// Convenience: a plain-string rejection.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Err(RemoteError::Rejected(message.into()))
    }

    /// Convenience: wrap any response with a delay.
    pub fn delayed(delay: Duration, inner: MockResponse) -> Self {
        Self::Delay(delay, Box::new(inner))
    }
}

#[derive(Default)]
struct Script {
    /// Consumed front to back, one per call.
    queued: HashMap<Call, VecDeque<MockResponse>>,
    /// Used once a call's queue is empty.
    fallback: HashMap<Call, MockResponse>,
    log: Vec<(Call, Value)>,
}

/// Transport that answers from a script and records every call it receives.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<Script>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a one-shot response for `call`.
    pub fn push(&self, call: Call, response: MockResponse) -> &Self {
        self.script
            .lock()
            .queued
            .entry(call)
            .or_default()
            .push_back(response);
        self
    }

    /// Answer `call` with `response` whenever nothing is queued for it.
    pub fn always(&self, call: Call, response: MockResponse) -> &Self {
        self.script.lock().fallback.insert(call, response);
        self
    }

    /// Every call received so far, in issuance order.
    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().log.iter().map(|(c, _)| *c).collect()
    }

    /// Payloads received for `call`, in issuance order.
    pub fn payloads(&self, call: Call) -> Vec<Value> {
        self.script
            .lock()
            .log
            .iter()
            .filter(|(c, _)| *c == call)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn call_count(&self, call: Call) -> usize {
        self.script
            .lock()
            .log
            .iter()
            .filter(|(c, _)| *c == call)
            .count()
    }

    fn next_response(&self, call: Call, payload: Value) -> Option<MockResponse> {
        let mut script = self.script.lock();
        script.log.push((call, payload));
        let queued = script.queued.get_mut(&call).and_then(VecDeque::pop_front);
        queued.or_else(|| script.fallback.get(&call).cloned())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn invoke(&self, call: Call, payload: Value) -> Result<Value, RemoteError> {
        let Some(mut response) = self.next_response(call, payload) else {
            return Err(RemoteError::Rejected(format!(
                "MockTransport: no response configured for {call}"
            )));
        };
        loop {
            match response {
                MockResponse::Ok(value) => return Ok(value),
                MockResponse::Err(error) => return Err(error),
                MockResponse::Delay(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    response = *inner;
                }
            }
        }
    }
}
