use crate::config::Config;
use crate::core::MetricsCollector;
use crate::models::{
    Block, CountResponse, DifficultyUpdate, Miner, MiningResult, NewTransaction, PagedEnvelope,
    StatusResponse, Transaction, BLOCK_LIST,
};
use crate::utils::error::{DashboardError, Result};
use bytes::Bytes;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Path prefixes served by the pool coordinator instead of the chain node.
const POOL_PREFIXES: [&str; 2] = ["/pools", "/difficulty"];

/// HTTP client for the chain node and the miner pool coordinator.
///
/// One request per call, no retries and no caching. Non-2xx answers become
/// [`DashboardError::Http`] carrying the status and the best message the
/// body offered.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    node_base: String,
    pool_base: String,
    stats_page_size: u64,
    stats_page_delay: Duration,
    metrics: MetricsCollector,
}

impl ApiClient {
    pub fn new(config: &Config, metrics: MetricsCollector) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DashboardError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            node_base: config.node_api_base.trim_end_matches('/').to_string(),
            pool_base: config.pool_api_base.trim_end_matches('/').to_string(),
            stats_page_size: config.stats_page_size,
            stats_page_delay: config.stats_page_delay(),
            metrics,
        })
    }

    pub fn base_for(&self, path: &str) -> &str {
        if POOL_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
            &self.pool_base
        } else {
            &self.node_base
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_for(path), path)
    }

    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> Result<Response> {
        let start_time = Instant::now();
        debug!(event = "api_request", message = "Issuing API request", endpoint = endpoint);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_request(endpoint, "transport_error", start_time);
                error!(
                    event = "api_transport_error",
                    message = "API request failed before a response arrived",
                    endpoint = endpoint,
                    error = %e
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.metrics.record_request(endpoint, "http_error", start_time);
            let message = error_message(status, response).await;
            warn!(
                event = "api_http_error",
                message = "API answered with a non-success status",
                endpoint = endpoint,
                status = status.as_u16(),
                detail = %message
            );
            return Err(DashboardError::Http { status: status.as_u16(), message });
        }

        self.metrics.record_request(endpoint, "ok", start_time);
        Ok(response)
    }

    async fn body(&self, endpoint: &'static str, request: RequestBuilder) -> Result<Bytes> {
        let response = self.send(endpoint, request).await?;
        Ok(response.bytes().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, path: &str) -> Result<T> {
        let body = self.body(endpoint, self.http.get(self.url(path))).await?;
        decode(endpoint, &body)
    }

    async fn get_text(&self, endpoint: &'static str, path: &str) -> Result<String> {
        let body = self.body(endpoint, self.http.get(self.url(path))).await?;
        Ok(String::from_utf8_lossy(&body).trim().to_string())
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        self.get_json("status", "/blocks/status").await
    }

    pub async fn blocks(&self, page: u64, size: u64) -> Result<PagedEnvelope<Block>> {
        self.get_json("blocks", &format!("/blocks?page={}&size={}", page, size)).await
    }

    /// `Ok(None)` when the node does not know the hash.
    pub async fn block(&self, hash: &str) -> Result<Option<Block>> {
        match self.get_json("block_by_hash", &format!("/blocks/{}", hash)).await {
            Ok(block) => Ok(Some(block)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `NotFound` when the node has no blocks yet.
    pub async fn latest(&self) -> Result<Block> {
        match self.get_json("latest_block", "/blocks/latest").await {
            Err(e) if e.is_not_found() => Err(DashboardError::NotFound("latest block".to_string())),
            other => other,
        }
    }

    pub async fn submit_result(&self, result: &MiningResult) -> Result<String> {
        let request = self.http.post(self.url("/blocks/result")).json(result);
        let body = self.body("submit_result", request).await?;
        Ok(String::from_utf8_lossy(&body).trim().to_string())
    }

    pub async fn pending_transactions(&self) -> Result<PagedEnvelope<Transaction>> {
        self.get_json("pending_transactions", "/transactions/pending").await
    }

    pub async fn pending_count(&self) -> Result<CountResponse> {
        self.get_json("pending_count", "/transactions/pending/count").await
    }

    pub async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let request = self.http.post(self.url("/transactions")).json(transaction);
        let body = self.body("create_transaction", request).await?;
        decode("create_transaction", &body)
    }

    pub async fn miners(&self) -> Result<PagedEnvelope<Miner>> {
        self.get_json("miners", "/pools/miners").await
    }

    pub async fn difficulty(&self) -> Result<String> {
        self.get_text("difficulty", "/difficulty").await
    }

    pub async fn set_difficulty(&self, difficulty: &str) -> Result<String> {
        let update = DifficultyUpdate { difficulty: difficulty.to_string() };
        let request = self.http.post(self.url("/difficulty")).json(&update);
        let body = self.body("set_difficulty", request).await?;
        Ok(String::from_utf8_lossy(&body).trim().to_string())
    }

    /// Walks every page of `/blocks`. A failing page ends the walk and the
    /// blocks gathered so far are returned.
    pub async fn fetch_all_blocks(&self) -> Vec<Block> {
        let mut all_blocks = Vec::new();
        let mut page = 0;

        loop {
            let envelope = match self.blocks(page, self.stats_page_size).await {
                Ok(envelope) => envelope,
                Err(e) => {
                    error!(
                        event = "fetch_all_blocks_error",
                        message = "Stopping block walk after a failed page",
                        page = page,
                        collected = all_blocks.len(),
                        error = %e
                    );
                    break;
                }
            };

            let total = envelope.page.as_ref().map(|p| p.total_elements);
            let blocks = envelope.into_items(BLOCK_LIST);
            let received = blocks.len();
            all_blocks.extend(blocks);

            let has_more = match total {
                Some(total) => received > 0 && (all_blocks.len() as u64) < total,
                None => false,
            };
            if !has_more {
                break;
            }

            page += 1;
            tokio::time::sleep(self.stats_page_delay).await;
        }

        info!(
            event = "fetch_all_blocks_complete",
            message = "Collected blocks for statistics",
            blocks = all_blocks.len(),
            pages = page + 1
        );
        all_blocks
    }
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        error!(
            event = "api_decode_error",
            message = "API response did not match the expected shape",
            endpoint = endpoint,
            error = %e
        );
        DashboardError::from(e)
    })
}

async fn error_message(status: StatusCode, response: Response) -> String {
    let body = response.bytes().await.unwrap_or_default();
    serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|message| !message.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Unknown error".to_string())
}
