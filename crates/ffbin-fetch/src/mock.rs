//! Scripted [`HttpClient`] for tests.
//!
//! Each URL is routed to a canned outcome. Every call is recorded so tests
//! can assert which sources were contacted and in what order.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream};

use crate::effects::{HttpClient, HttpResponse};

#[derive(Debug, Clone)]
pub struct MockError(pub String);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockError {}

/// What a routed URL answers with.
#[derive(Debug, Clone)]
pub enum MockRoute {
    /// A response whose body is delivered in the given chunks.
    Respond {
        status: u16,
        content_length: Option<u64>,
        chunks: Vec<Bytes>,
    },
    /// The request itself fails.
    Fail(String),
    /// The body yields `chunks`, then errors.
    BrokenBody { chunks: Vec<Bytes>, message: String },
    /// The body yields `chunks`, then never produces another item.
    Stall { chunks: Vec<Bytes> },
}

#[derive(Clone, Default)]
pub struct MockHttpClient {
    routes: Arc<Mutex<HashMap<String, MockRoute>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(self, url: impl Into<String>, route: MockRoute) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), route);
        self
    }

    /// 200 with `body` as a single chunk and an accurate `Content-Length`.
    #[must_use]
    pub fn ok(self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.route(
            url,
            MockRoute::Respond {
                status: 200,
                content_length: Some(body.len() as u64),
                chunks: vec![body],
            },
        )
    }

    /// 200 with `body` split into `chunk_size` pieces and no `Content-Length`.
    #[must_use]
    pub fn chunked(self, url: impl Into<String>, body: &[u8], chunk_size: usize) -> Self {
        let chunks = body
            .chunks(chunk_size.max(1))
            .map(Bytes::copy_from_slice)
            .collect();
        self.route(
            url,
            MockRoute::Respond {
                status: 200,
                content_length: None,
                chunks,
            },
        )
    }

    #[must_use]
    pub fn status(self, url: impl Into<String>, status: u16) -> Self {
        self.route(
            url,
            MockRoute::Respond {
                status,
                content_length: None,
                chunks: Vec::new(),
            },
        )
    }

    #[must_use]
    pub fn fail(self, url: impl Into<String>) -> Self {
        self.route(url, MockRoute::Fail("connection refused".to_string()))
    }

    #[must_use]
    pub fn stall(self, url: impl Into<String>) -> Self {
        self.route(url, MockRoute::Stall { chunks: Vec::new() })
    }

    /// URLs requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl HttpClient for MockHttpClient {
    type Error = MockError;

    async fn stream(
        &self,
        url: &str,
        _headers: &[(String, String)],
    ) -> Result<HttpResponse<Self::Error>, Self::Error> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let route = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
            .ok_or_else(|| MockError(format!("no route for {url}")))?;

        let response = match route {
            MockRoute::Respond {
                status,
                content_length,
                chunks,
            } => HttpResponse {
                status,
                content_length,
                body: Box::pin(ok_chunks(chunks)),
            },
            MockRoute::Fail(message) => return Err(MockError(message)),
            MockRoute::BrokenBody { chunks, message } => HttpResponse {
                status: 200,
                content_length: None,
                body: Box::pin(
                    ok_chunks(chunks).chain(stream::once(async move { Err(MockError(message)) })),
                ),
            },
            MockRoute::Stall { chunks } => HttpResponse {
                status: 200,
                content_length: None,
                body: Box::pin(ok_chunks(chunks).chain(stream::pending())),
            },
        };
        Ok(response)
    }
}

fn ok_chunks(chunks: Vec<Bytes>) -> impl Stream<Item = Result<Bytes, MockError>> + Send + 'static {
    stream::iter(chunks.into_iter().map(Ok))
}
