use anyhow::Result;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::time::Instant;

#[derive(Clone, Debug, Default)]
pub struct MetricsCollector {
    port: Option<u16>,
}

impl MetricsCollector {
    /// Installs the Prometheus exporter. Port 0 keeps recording through the
    /// facade without an exporter, which is what tests use.
    pub fn new(port: u16) -> Result<Self> {
        if port == 0 {
            return Ok(Self { port: None });
        }

        let builder = PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port));

        builder.install()?;

        Ok(Self { port: Some(port) })
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn record_request(&self, endpoint: &'static str, outcome: &'static str, start_time: Instant) {
        counter!("api_requests_total", "endpoint" => endpoint, "outcome" => outcome).increment(1);
        histogram!("api_request_duration_seconds", "endpoint" => endpoint)
            .record(start_time.elapsed().as_secs_f64());
    }

    pub fn record_render(&self, view: &'static str, outcome: &'static str) {
        counter!("views_rendered_total", "view" => view, "outcome" => outcome).increment(1);
    }

    pub fn record_stale_render(&self) {
        counter!("stale_renders_discarded_total").increment(1);
    }

    pub fn record_transactions_submitted(&self, count: usize) {
        counter!("transactions_submitted_total").increment(count as u64);
    }
}
