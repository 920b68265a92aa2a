// Shared helpers for integration tests: a recording stub transport and a
// map-backed variable source.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use vsip_cli::api::{ApiClient, HttpRequest, HttpResponse, Transport};
use vsip_cli::config::EndpointConfig;
use vsip_cli::Result;

/// Transport that replays canned responses and records every request.
/// Clones share the same queue and log, so a test can keep one handle while
/// the client owns another. Panics if a request arrives with no response
/// queued.
#[derive(Default, Clone)]
pub struct StubTransport {
    inner: Rc<StubState>,
}

#[derive(Default)]
struct StubState {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response.
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.inner.responses.borrow_mut().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.requests.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.inner.requests.borrow().len()
    }

    /// The only recorded request; panics unless exactly one was made.
    pub fn single(&self) -> HttpRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

impl Transport for StubTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.inner.requests.borrow_mut().push(request);
        let response = self
            .inner
            .responses
            .borrow_mut()
            .pop_front()
            .expect("stub transport has no queued response");
        Ok(response)
    }
}

pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// `EXO_*` variables for key `k`, token `t`, domain `d`, account `a`.
pub fn endpoint_vars() -> HashMap<String, String> {
    vars(&[
        ("EXO_AUTH_KEY", "k"),
        ("EXO_AUTH_TOKEN", "t"),
        ("EXO_SUBSCRIBIX_DOMAIN", "d"),
        ("EXO_ACCOUNT_SID", "a"),
    ])
}

/// Endpoint vars plus the given extras.
pub fn with_endpoint(extra: &[(&str, &str)]) -> HashMap<String, String> {
    let mut all = endpoint_vars();
    all.extend(vars(extra));
    all
}

pub fn client(stub: &StubTransport) -> ApiClient<StubTransport> {
    let config = EndpointConfig::from_vars(&endpoint_vars()).expect("endpoint vars are complete");
    ApiClient::new(config, stub.clone())
}

/// Decode a recorded request body as JSON.
pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    let body = request.body.as_deref().expect("request has a body");
    serde_json::from_slice(body).expect("request body is JSON")
}
