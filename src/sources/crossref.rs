//! CrossRef DOI resolver.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LookupConfig;
use crate::models::Query;
use crate::sources::{DoiResolver, LookupError};
use crate::utils::{with_retry, HttpClient, RetryConfig, Transport};

pub const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// CrossRef DOI resolver
///
/// Searches the `/works` endpoint by title and author and takes the DOI of
/// the first hit. Non-success statuses are retried with a fixed delay;
/// a success response without a DOI fails at once.
#[derive(Debug, Clone)]
pub struct CrossRefResolver {
    transport: Arc<dyn Transport>,
    base_url: String,
    retry: RetryConfig,
}

impl CrossRefResolver {
    /// Resolver over any transport, pointed at the public API
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: CROSSREF_API_BASE.to_string(),
            retry: RetryConfig::default(),
        }
    }

    /// Resolver backed by a real HTTP client built from configuration
    pub fn from_config(config: &LookupConfig) -> Result<Self, reqwest::Error> {
        let user_agent = match &config.mailto {
            Some(mailto) => format!(
                "{}/{} (mailto:{})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                mailto
            ),
            None => format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        };
        let client = HttpClient::with_user_agent(
            &user_agent,
            Duration::from_secs(config.timeout_secs),
        )?;

        Ok(Self::new(Arc::new(client))
            .base_url(&config.base_url)
            .retry(config.retry()))
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Search URL for a query
    pub fn works_url(&self, query: &Query) -> String {
        format!(
            "{}/works?query.author={}&query.title={}",
            self.base_url,
            urlencoding::encode(&query.author),
            urlencoding::encode(&query.title)
        )
    }
}

#[async_trait]
impl DoiResolver for CrossRefResolver {
    fn name(&self) -> &str {
        "CrossRef"
    }

    async fn lookup(&self, query: &Query) -> Result<String, LookupError> {
        let url = self.works_url(query);
        let transport = &self.transport;
        let url_ref = &url;

        let body = with_retry(self.retry, || async move {
            let reply = transport.get(url_ref).await?;
            if !reply.is_success() {
                return Err(LookupError::Status(reply.status));
            }
            Ok(reply.body)
        })
        .await?;

        parse_first_doi(&body).inspect_err(|e| {
            tracing::warn!("Something wrong with JSON response for {}: {}", url, e);
        })
    }
}

/// Extract `message.items[0].DOI` from a `/works` response body
fn parse_first_doi(body: &str) -> Result<String, LookupError> {
    let data: CRResponse = serde_json::from_str(body)
        .map_err(|e| LookupError::MalformedResponse(format!("Failed to parse JSON: {}", e)))?;

    let item = data
        .message
        .items
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::MalformedResponse("no items in response".to_string()))?;

    item.doi
        .filter(|doi| !doi.trim().is_empty())
        .ok_or_else(|| LookupError::MalformedResponse("first item has no DOI".to_string()))
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CRResponse {
    message: CRMessage,
}

#[derive(Debug, Deserialize)]
struct CRMessage {
    items: Vec<CRItem>,
}

#[derive(Debug, Deserialize)]
struct CRItem {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}
