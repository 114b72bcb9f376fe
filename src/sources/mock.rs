//! Mock transport and resolver for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::models::Query;
use crate::sources::{DoiResolver, LookupError};
use crate::utils::{HttpReply, Transport, TransportError};

/// A transport that replays scripted replies and records every URL.
///
/// Scripted replies are consumed in order. Once they run out the
/// `always_reply` fallback is used; without one the request fails with a
/// [`TransportError`].
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpReply, String>>>,
    fallback: Mutex<Option<HttpReply>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one reply.
    pub fn push_reply(&self, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(HttpReply::new(status, body)));
    }

    /// Queue one failed request.
    pub fn push_transport_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Reply used once the queue is empty.
    pub fn always_reply(&self, status: u16, body: &str) {
        *self.fallback.lock().unwrap() = Some(HttpReply::new(status, body));
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());

        let scripted = self.replies.lock().unwrap().pop_front();
        let reply = match scripted {
            Some(reply) => reply,
            None => self
                .fallback
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| "no scripted reply".to_string()),
        };

        reply.map_err(|message| TransportError {
            url: url.to_string(),
            message,
        })
    }
}

/// A resolver that answers from a title → result table.
///
/// Titles without an entry fail with [`LookupError::Exhausted`].
#[derive(Debug, Default)]
pub struct MockResolver {
    responses: Mutex<HashMap<String, Result<String, LookupError>>>,
    queries: Mutex<Vec<Query>>,
}

impl MockResolver {
    /// Create a new mock resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `title` to `doi`.
    pub fn with_doi(self, title: &str, doi: &str) -> Self {
        self.set_response(title, Ok(doi.to_string()));
        self
    }

    /// Fail lookups of `title` with `error`.
    pub fn with_error(self, title: &str, error: LookupError) -> Self {
        self.set_response(title, Err(error));
        self
    }

    /// Set the result returned for `title`.
    pub fn set_response(&self, title: &str, response: Result<String, LookupError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(title.to_string(), response);
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DoiResolver for MockResolver {
    fn name(&self) -> &str {
        "Mock Resolver"
    }

    async fn lookup(&self, query: &Query) -> Result<String, LookupError> {
        self.queries.lock().unwrap().push(query.clone());

        let guard = self.responses.lock().unwrap();
        match guard.get(&query.title) {
            Some(response) => response.clone(),
            None => Err(LookupError::Exhausted { attempts: 1 }),
        }
    }
}
