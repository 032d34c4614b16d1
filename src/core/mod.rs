pub mod api;
pub mod batch;
mod metrics;
pub mod pagination;
pub mod poller;
pub mod router;
pub mod server;
pub mod stats;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use crate::config::Config;
use futures::future::try_join_all;
use tracing::{info, error};

pub use api::ApiClient;
pub use batch::BatchSubmitter;
pub use metrics::MetricsCollector;
pub use poller::MinerPoolPoller;
pub use server::{AppState, Sessions};

pub struct Dashboard {
    api: ApiClient,
    poller: Arc<MinerPoolPoller>,
    submitter: BatchSubmitter,
    metrics_collector: MetricsCollector,
    config: Config,
}

impl Dashboard {
    pub async fn new(config: Config) -> Result<Self> {
        let metrics_collector = MetricsCollector::new(config.metrics_port)?;
        let api = ApiClient::new(&config, metrics_collector.clone())?;
        let poller = Arc::new(MinerPoolPoller::new(api.clone()));
        let submitter = BatchSubmitter::new(
            api.clone(),
            config.batch_concurrency,
            config.batch_delay(),
            metrics_collector.clone(),
        );

        Ok(Self {
            api,
            poller,
            submitter,
            metrics_collector,
            config,
        })
    }

    pub fn state(&self) -> AppState {
        AppState {
            api: self.api.clone(),
            poller: self.poller.clone(),
            submitter: self.submitter.clone(),
            sessions: Arc::new(Sessions::new(self.metrics_collector.clone())),
            metrics: self.metrics_collector.clone(),
            page_size: self.config.page_size,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = self.config.listen_addr.parse()?;

        match self.config.miner_refresh() {
            Some(period) => self.poller.start(period),
            None => info!(
                event = "miner_poller_disabled",
                message = "Miner pool is fetched on demand"
            ),
        }

        info!(
            event = "dashboard_starting",
            message = "Starting dashboard",
            node_api = %self.config.node_api_base,
            pool_api = %self.config.pool_api_base,
            metrics_port = ?self.metrics_collector.port()
        );

        let state = self.state();
        let server_handle = tokio::spawn(async move {
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(event = "signal_error", message = "Failed to listen for shutdown signal", error = %e);
                }
            };
            server::serve(addr, state, shutdown).await
        });

        let handles = vec![server_handle];

        for result in try_join_all(handles).await? {
            result?;
        }

        self.poller.stop();
        Ok(())
    }
}
