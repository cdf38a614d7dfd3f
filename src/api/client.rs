use crate::api::models::SearchEnvelope;
use crate::api::{SearchClient, SearchError};
use crate::data::ResultBucket;
use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

const SEARCH_PATH: &str = "/doctors/doctor-portal/dashboard/search";

/// Search collaborator backed by the dashboard HTTP API
#[derive(Clone)]
pub struct HttpSearchClient {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl HttpSearchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(
        &self,
        query: &str,
        limit_per_category: usize,
    ) -> Result<Vec<ResultBucket>, SearchError> {
        let started = Instant::now();
        let limit = limit_per_category.to_string();

        let mut request = self
            .client
            .get(self.search_url())
            .query(&[("query", query), ("limit", limit.as_str())]);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: SearchEnvelope = serde_json::from_str(&body)?;
        let buckets = envelope.into_buckets()?;

        debug!(
            target: "api",
            "GET {} query='{}' -> {} items in {:?}",
            SEARCH_PATH,
            query,
            buckets.iter().map(ResultBucket::len).sum::<usize>(),
            started.elapsed()
        );
        Ok(buckets)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_strips_trailing_slash() {
        let client = HttpSearchClient::new("http://localhost:5000/api/");
        assert_eq!(
            client.search_url(),
            "http://localhost:5000/api/doctors/doctor-portal/dashboard/search"
        );
    }

    #[test]
    fn test_blank_token_ignored() {
        let client = HttpSearchClient::new("http://localhost").with_token(Some("  ".into()));
        assert!(client.auth_token.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) is closed on any sane test host
        let client = HttpSearchClient::new("http://127.0.0.1:9");
        let result = client.search("anita", 8).await;
        assert!(matches!(result, Err(SearchError::Transport(_))));
    }
}
