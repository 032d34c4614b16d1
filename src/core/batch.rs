use crate::core::api::ApiClient;
use crate::core::MetricsCollector;
use crate::models::NewTransaction;
use crate::utils::error::{DashboardError, Result};
use crate::utils::format::random_address;
use futures::stream::{self, StreamExt};
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

pub const MAX_GENERATED_TOTAL: u64 = 1000;
pub const MAX_GENERATED_BATCH: u64 = 500;
const ADDRESS_LENGTH: usize = 10;

/// Parses the batch form payload. Anything other than a JSON array of
/// `{sender, receiver, amount}` objects is rejected before a request is made.
pub fn parse_batch(payload: &str) -> Result<Vec<NewTransaction>> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| DashboardError::Validation(format!("Formato JSON inválido: {}", e)))?;

    if !value.is_array() {
        return Err(DashboardError::Validation(
            "El input debe ser un array JSON de transacciones.".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| DashboardError::Validation(format!("Transacción inválida: {}", e)))
}

pub fn random_transaction() -> NewTransaction {
    NewTransaction {
        sender: random_address(ADDRESS_LENGTH),
        receiver: random_address(ADDRESS_LENGTH),
        amount: rand::thread_rng().gen_range(1..=100) as f64,
    }
}

/// Random generator settings as submitted by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorRequest {
    pub total: u64,
    pub batch_size: u64,
}

impl GeneratorRequest {
    pub fn new(total: u64, batch_size: u64) -> Result<Self> {
        if !(1..=MAX_GENERATED_TOTAL).contains(&total) {
            return Err(DashboardError::Validation(format!(
                "Por favor, introduce un número válido para \"Total de TXs\" (1-{}).",
                MAX_GENERATED_TOTAL
            )));
        }
        if !(1..=MAX_GENERATED_BATCH).contains(&batch_size) {
            return Err(DashboardError::Validation(format!(
                "Por favor, introduce un número válido para \"TXs por Batch\" (1-{}).",
                MAX_GENERATED_BATCH
            )));
        }
        Ok(Self { total, batch_size })
    }

    /// Form fields arrive as text; unparsable input fails the same range check.
    pub fn from_form(total: &str, batch_size: &str) -> Result<Self> {
        let total = total.trim().parse().unwrap_or(0);
        let batch_size = batch_size.trim().parse().unwrap_or(0);
        Self::new(total, batch_size)
    }

    /// Size of each group, in send order.
    pub fn group_sizes(&self) -> Vec<u64> {
        let mut sizes = Vec::new();
        let mut remaining = self.total;
        while remaining > 0 {
            let size = remaining.min(self.batch_size);
            sizes.push(size);
            remaining -= size;
        }
        sizes
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub sent: usize,
    pub batches: usize,
}

/// Sends transactions to the node in groups. Groups go out one after another
/// with a pause in between; inside a group at most `concurrency` requests are
/// in flight.
#[derive(Clone)]
pub struct BatchSubmitter {
    api: ApiClient,
    concurrency: usize,
    delay: Duration,
    metrics: MetricsCollector,
}

impl BatchSubmitter {
    pub fn new(api: ApiClient, concurrency: usize, delay: Duration, metrics: MetricsCollector) -> Self {
        Self {
            api,
            concurrency: concurrency.max(1),
            delay,
            metrics,
        }
    }

    async fn send_group(&self, group: Vec<NewTransaction>, batch: usize) -> Result<usize> {
        let size = group.len();
        let api = &self.api;
        let mut in_flight = stream::iter(group)
            .map(|transaction| async move { api.create_transaction(&transaction).await })
            .buffer_unordered(self.concurrency);

        let mut sent = 0;
        while let Some(result) = in_flight.next().await {
            if let Err(e) = result {
                self.metrics.record_transactions_submitted(sent);
                warn!(
                    event = "batch_group_failed",
                    message = "Transaction rejected, abandoning batch",
                    batch = batch,
                    sent = sent,
                    size = size,
                    error = %e
                );
                return Err(e);
            }
            sent += 1;
        }

        self.metrics.record_transactions_submitted(sent);
        info!(
            event = "batch_group_sent",
            message = "Batch sent",
            batch = batch,
            size = size
        );
        Ok(sent)
    }

    /// Sends a parsed batch form payload as a single group.
    pub async fn submit_json(&self, payload: &str) -> Result<BatchReport> {
        let transactions = parse_batch(payload)?;
        self.submit(transactions).await
    }

    pub async fn submit(&self, transactions: Vec<NewTransaction>) -> Result<BatchReport> {
        if transactions.is_empty() {
            return Ok(BatchReport::default());
        }
        let sent = self.send_group(transactions, 1).await?;
        Ok(BatchReport { sent, batches: 1 })
    }

    /// Generates and sends `request.total` random transactions.
    pub async fn generate(&self, request: GeneratorRequest) -> Result<BatchReport> {
        let sizes = request.group_sizes();
        let mut report = BatchReport::default();

        for (i, size) in sizes.iter().enumerate() {
            let group = (0..*size).map(|_| random_transaction()).collect();
            report.batches += 1;
            report.sent += self.send_group(group, report.batches).await?;

            if i + 1 < sizes.len() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            event = "random_batches_complete",
            message = "Generated transactions sent",
            sent = report.sent,
            batches = report.batches
        );
        Ok(report)
    }
}
