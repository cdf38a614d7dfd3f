use crate::api::{SearchClient, SearchError};
use crate::core::RequestId;
use crate::data::ResultBucket;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

/// A search the widget wants executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: RequestId,
    /// Already trimmed
    pub query: String,
    pub limit_per_category: usize,
}

/// The collaborator's answer, tagged with the request it belongs to
#[derive(Debug)]
pub struct SearchResponse {
    pub id: RequestId,
    pub query: String,
    pub outcome: Result<Vec<ResultBucket>, SearchError>,
}

impl SearchResponse {
    pub fn success(request: &SearchRequest, buckets: Vec<ResultBucket>) -> Self {
        Self {
            id: request.id,
            query: request.query.clone(),
            outcome: Ok(buckets),
        }
    }

    pub fn failure(request: &SearchRequest, error: SearchError) -> Self {
        Self {
            id: request.id,
            query: request.query.clone(),
            outcome: Err(error),
        }
    }
}

/// Runs searches on the tokio runtime and hands the answers back to the UI
/// thread over a channel. Calls are never cancelled; ordering is the
/// receiver's problem (see `RequestSequencer`).
#[derive(Clone)]
pub struct SearchExecutor {
    client: Arc<dyn SearchClient>,
    responses: UnboundedSender<SearchResponse>,
}

impl SearchExecutor {
    pub fn new(client: Arc<dyn SearchClient>) -> (Self, UnboundedReceiver<SearchResponse>) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                client,
                responses: tx,
            },
            rx,
        )
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    /// Spawn the request. Must be called from within a tokio runtime.
    pub fn submit(&self, request: SearchRequest) {
        let client = Arc::clone(&self.client);
        let responses = self.responses.clone();

        debug!(
            target: "search",
            "Submitting {} '{}' to {} backend",
            request.id,
            request.query,
            client.name()
        );

        tokio::spawn(async move {
            let response = match client
                .search(&request.query, request.limit_per_category)
                .await
            {
                Ok(buckets) => SearchResponse::success(&request, buckets),
                Err(e) => SearchResponse::failure(&request, e),
            };

            if responses.send(response).is_err() {
                trace!(target: "search", "Receiver gone, dropping response for {}", request.id);
            }
        });
    }
}
