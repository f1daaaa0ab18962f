//! Shared mock HTTP client for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, HttpError> + Send + Sync>;

/// Mock HTTP client driven by a responder function.
///
/// Captures every request for later inspection. The responder decides
/// the result per request, which keeps concurrent tests deterministic
/// regardless of completion order.
pub(crate) struct MockClient {
    responder: Responder,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub(crate) fn with_responder(
        responder: impl Fn(&HttpRequest) -> Result<HttpResponse, HttpError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Always answers HTTP 200 with a provider-style message envelope.
    pub(crate) fn success() -> Self {
        Self::with_responder(|_| Ok(ok_response(r#"{"messages":[{"id":"wamid.test"}]}"#)))
    }

    /// Always answers the given status with the given body.
    pub(crate) fn always_status(status: http::StatusCode, body: &str) -> Self {
        let body = body.to_string();
        Self::with_responder(move |_| {
            Ok(HttpResponse::new(
                status,
                http::HeaderMap::new(),
                body.clone().into_bytes(),
            ))
        })
    }

    /// Always fails with a transport timeout.
    pub(crate) fn failing_transport() -> Self {
        Self::with_responder(|_| Err(HttpError::Timeout))
    }

    /// Answers from a fixed sequence, in call order.
    ///
    /// Only suitable for sequential call sites; concurrent callers
    /// would observe a nondeterministic order.
    pub(crate) fn sequence(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        let queue = Mutex::new(responses);
        Self::with_responder(move |_| {
            let mut queue = queue.lock().unwrap();
            assert!(!queue.is_empty(), "mock client ran out of responses");
            queue.remove(0)
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub(crate) fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let result = (self.responder)(&req);
        self.requests.lock().unwrap().push(req);
        result
    }
}

impl HttpClient for std::sync::Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

/// Builds an HTTP 200 response with the given body.
pub(crate) fn ok_response(body: &str) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::OK,
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    )
}

/// Extracts the `to` field from a captured JSON request body.
pub(crate) fn request_recipient(req: &HttpRequest) -> Option<String> {
    let body = req.body.as_ref()?;
    let json: serde_json::Value = serde_json::from_slice(body).ok()?;
    json.get("to")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}
