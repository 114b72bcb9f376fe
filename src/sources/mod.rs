//! DOI resolvers.
//!
//! This module defines the [`DoiResolver`] trait the batch pass talks to.
//! [`CrossRefResolver`] is the production implementation; [`mock`] holds
//! scripted stand-ins for tests.

mod crossref;
pub mod mock;

pub use crossref::{CrossRefResolver, CROSSREF_API_BASE};
pub use mock::{MockResolver, MockTransport};

use crate::models::Query;
use crate::utils::TransportError;
use async_trait::async_trait;

/// Resolves a title/author query to a single DOI.
#[async_trait]
pub trait DoiResolver: Send + Sync + std::fmt::Debug {
    /// Human-readable name of the registry behind this resolver
    fn name(&self) -> &str;

    /// Find the DOI of the best match for `query`
    async fn lookup(&self, query: &Query) -> Result<String, LookupError>;
}

/// Errors that can occur while resolving a DOI
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    /// The registry answered with a non-success status
    #[error("Response not 200 OK (status {0})")]
    Status(u16),

    /// A success response without a usable DOI
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Every attempt returned a non-success status
    #[error("Tried {attempts} times. Response still not 200 OK")]
    Exhausted { attempts: u32 },

    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl LookupError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Status(_))
    }

    /// Whether the error should stop the whole batch
    pub fn is_fatal(&self) -> bool {
        matches!(self, LookupError::Transport(_))
    }
}
