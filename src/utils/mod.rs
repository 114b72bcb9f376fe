//! Utility modules supporting DOI lookups.
//!
//! - [`normalize`]: Strip LaTeX markup and transliterate to ASCII
//! - [`last_names`]: Extract author last names from a raw author field
//! - [`HttpClient`]: reqwest-backed implementation of [`Transport`]
//! - [`RetryConfig`]: Attempt budget and fixed delay between attempts
//! - [`with_retry`]: Execute an operation with automatic retry on transient errors
//! - [`ProgressReporter`]: In-place progress line for the batch pass
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use doi_fill::utils::{with_retry, RetryConfig};
//! use doi_fill::LookupError;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), LookupError> {
//! let config = RetryConfig::default().max_attempts(3).delay(Duration::from_millis(500));
//! let doi = with_retry(config, || async { Ok::<_, LookupError>("10.1000/182") }).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod normalize;
mod progress;
mod retry;

pub use http::{HttpClient, HttpReply, Transport, TransportError};
pub use normalize::{last_names, normalize};
pub use progress::ProgressReporter;
pub use retry::{with_retry, RetryConfig};
