use crate::core::api::ApiClient;
use crate::core::stats::ChainStatistics;
use crate::render::{el, Element, Node};
use crate::utils::format::{format_count, format_duration};
use crate::views::chart::bar_chart;
use crate::views::layout::{self, BannerKind};
use chrono::Local;
use tracing::warn;

pub const EMPTY_MESSAGE: &str = "No hay datos de bloques disponibles para generar estadísticas.";

/// Statistics for the chain, or `None` when it holds no blocks.
pub struct StatisticsData {
    pub stats: Option<ChainStatistics>,
    pub pending_count: String,
}

/// The block walk already stops at the first failing page, so nothing here
/// is fatal. A missing tip falls back to the highest block collected.
pub async fn fetch(api: &ApiClient) -> StatisticsData {
    let (blocks, latest, pending) = tokio::join!(api.fetch_all_blocks(), api.latest(), api.pending_count());

    let latest = match latest {
        Ok(block) => Some(block),
        Err(e) => {
            warn!(
                event = "statistics_latest_error",
                message = "Error fetching latest block for statistics",
                error = %e
            );
            blocks.iter().max_by_key(|block| block.index).cloned()
        }
    };

    let pending_count = match pending {
        Ok(count) => count.count.map(format_count).unwrap_or_else(|| "Error".to_string()),
        Err(e) => {
            warn!(
                event = "statistics_pending_error",
                message = "Error fetching pending transaction count",
                error = %e
            );
            "Error".to_string()
        }
    };

    StatisticsData {
        stats: ChainStatistics::compute(&blocks, latest.as_ref(), &Local::now()),
        pending_count,
    }
}

pub async fn load(api: &ApiClient) -> Node {
    view(&fetch(api).await)
}

fn card(icon: &str, badge: &str, title: &str, id: &str, value: &str) -> Element {
    layout::stat_card(icon, badge, title, id, value)
}

fn note(text: &str) -> Node {
    el("p").class("text-sm text-gray-500").text(text).into()
}

fn optional_duration(seconds: Option<i64>) -> String {
    seconds
        .map(|s| format_duration(s as f64))
        .unwrap_or_else(|| "N/A".to_string())
}

fn cards(stats: &ChainStatistics, pending_count: &str) -> Node {
    let min_txs = stats
        .min_txs_in_block
        .map(|n| format_count(n as u64))
        .unwrap_or_else(|| "N/A".to_string());

    el("div")
        .id("statistics-cards")
        .class("grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 xl:grid-cols-3 gap-6 mb-8")
        .child(card(
            "fas fa-layer-group text-xl",
            "bg-blue-100 text-blue-600",
            "Total de Bloques",
            "stat-total-blocks",
            &format_count(stats.total_blocks as u64),
        ))
        .child(
            card(
                "fas fa-clock text-xl",
                "bg-indigo-100 text-indigo-600",
                "Tiempo Promedio por Bloque",
                "stat-avg-block-time",
                &format_duration(stats.avg_block_time),
            )
            .child(note(&format!(
                "Basado en {} intervalos.",
                format_count(stats.block_intervals as u64)
            ))),
        )
        .child(card(
            "fas fa-history text-xl",
            "bg-yellow-100 text-yellow-600",
            "Tiempo Desde Último Bloque",
            "stat-time-since-last",
            &format_duration(stats.time_since_last_block.max(0.0)),
        ))
        .child(card(
            "fas fa-exchange-alt text-xl",
            "bg-green-100 text-green-600",
            "Transacciones Totales Minadas",
            "stat-total-transactions",
            &format_count(stats.total_transactions),
        ))
        .child(card(
            "fas fa-file-invoice-dollar text-xl",
            "bg-teal-100 text-teal-600",
            "TXs Promedio por Bloque",
            "stat-avg-txs",
            &format!("{:.2}", stats.avg_txs_per_block),
        ))
        .child(card(
            "fas fa-fingerprint text-xl",
            "bg-pink-100 text-pink-600",
            "Nonce Promedio por Bloque",
            "stat-avg-nonce",
            &format!("{:.0}", stats.avg_nonce),
        ))
        .child(card(
            "fas fa-tasks text-xl",
            "bg-orange-100 text-orange-600",
            "TXs Pendientes Actuales",
            "stat-pending",
            pending_count,
        ))
        .child(card(
            "fas fa-money-bill-wave text-xl",
            "bg-purple-100 text-purple-600",
            "Valor Promedio de TX",
            "stat-avg-amount",
            &format!("{:.2}", stats.avg_transaction_amount),
        ))
        .child(card(
            "fas fa-minus-circle text-xl",
            "bg-red-100 text-red-600",
            "Bloque Más Pequeño (TXs)",
            "stat-min-txs",
            &min_txs,
        ))
        .child(card(
            "fas fa-plus-circle text-xl",
            "bg-blue-100 text-blue-600",
            "Bloque Más Grande (TXs)",
            "stat-max-txs",
            &format_count(stats.max_txs_in_block as u64),
        ))
        .child(
            card(
                "fas fa-hourglass-start text-xl",
                "bg-cyan-100 text-cyan-600",
                "Retraso Promedio Primera TX",
                "stat-avg-first-delay",
                &format_duration(stats.avg_first_tx_delay),
            )
            .child(note("Valores altos pueden indicar un desfase de reloj (cliente vs. servidor).")),
        )
        .child(card(
            "fas fa-bolt text-xl",
            "bg-lime-100 text-lime-600",
            "Retraso Mínimo Primera TX",
            "stat-min-first-delay",
            &optional_duration(stats.min_first_tx_delay),
        ))
        .child(card(
            "fas fa-exclamation-triangle text-xl",
            "bg-rose-100 text-rose-600",
            "Retraso Máximo Primera TX",
            "stat-max-first-delay",
            &optional_duration(stats.max_first_tx_delay),
        ))
        .into()
}

fn chart_card(title: &str, chart: Node) -> Node {
    el("div")
        .class("bg-white p-6 rounded-lg shadow-md")
        .child(el("h3").class("text-xl font-bold text-gray-800 mb-4").text(title))
        .child(chart)
        .into()
}

fn charts(stats: &ChainStatistics) -> Node {
    el("div")
        .id("statistics-charts")
        .class("grid grid-cols-1 lg:grid-cols-2 gap-6 mt-10")
        .child(chart_card(
            "Transacciones por Bloque (Últimos Bloques Minados)",
            bar_chart(
                "txs-per-block-chart",
                &stats.txs_per_block,
                "Transacciones por Bloque",
                "Bloque",
                "Número de Transacciones",
            ),
        ))
        .child(chart_card(
            "Bloques Minados por Día (Últimos 7 Días)",
            bar_chart(
                "blocks-per-day-chart",
                &stats.blocks_per_day,
                "Bloques por Día",
                "Fecha",
                "Número de Bloques",
            ),
        ))
        .child(chart_card(
            "Retraso Primera TX (Últimos Bloques Minados)",
            bar_chart(
                "first-tx-delay-chart",
                &stats.first_tx_delays,
                "Retraso Primera TX",
                "Bloque",
                "Tiempo (segundos)",
            ),
        ))
        .child(chart_card(
            "Transacciones por Día (Últimos 7 Días)",
            bar_chart(
                "txs-per-day-chart",
                &stats.txs_per_day,
                "Transacciones por Día",
                "Fecha",
                "Número de Transacciones",
            ),
        ))
        .into()
}

pub fn view(data: &StatisticsData) -> Node {
    let Some(stats) = &data.stats else {
        return layout::banner(BannerKind::Info, "Información: ", EMPTY_MESSAGE);
    };

    el("div")
        .id("statistics")
        .child(
            el("h1")
                .class("text-3xl font-bold text-gray-900 mb-8")
                .text("Estadísticas de la Red Blockchain"),
        )
        .child(cards(stats, &data.pending_count))
        .child(charts(stats))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, Transaction};

    fn block(index: u64, timestamp: i64, tx_timestamps: &[i64]) -> Block {
        Block {
            index,
            hash: format!("h{}", index),
            previous_hash: if index == 0 { "0".into() } else { format!("h{}", index - 1) },
            nonce: 100 * (index + 1),
            timestamp,
            data: tx_timestamps
                .iter()
                .map(|ts| Transaction {
                    id: format!("tx{}", ts),
                    sender: "a".into(),
                    receiver: "b".into(),
                    amount: 10.0,
                    timestamp: *ts,
                })
                .collect(),
        }
    }

    fn text_of(node: &Node, id: &str) -> String {
        Node::from(node.find_by_id(id).unwrap().clone()).text_content()
    }

    #[test]
    fn empty_chain_renders_info_without_charts() {
        let data = StatisticsData { stats: None, pending_count: "0".into() };
        let node = view(&data);
        assert!(node.text_content().contains(EMPTY_MESSAGE));
        assert!(node.find(&|e| e.tag == "svg").is_none());
    }

    #[test]
    fn cards_and_charts_reflect_the_chain() {
        let blocks = vec![block(0, 1_000, &[]), block(1, 1_060, &[1_050, 1_055]), block(2, 1_180, &[1_170])];
        let now = Local::now();
        let data = StatisticsData {
            stats: ChainStatistics::compute(&blocks, blocks.last(), &now),
            pending_count: "4".into(),
        };
        let node = view(&data);

        assert_eq!(text_of(&node, "stat-total-blocks"), "3");
        assert_eq!(text_of(&node, "stat-avg-block-time"), "1 min 30 seg");
        assert_eq!(text_of(&node, "stat-total-transactions"), "3");
        assert_eq!(text_of(&node, "stat-avg-txs"), "1.00");
        assert_eq!(text_of(&node, "stat-min-txs"), "0");
        assert_eq!(text_of(&node, "stat-pending"), "4");
        assert_eq!(text_of(&node, "stat-min-first-delay"), "10 segundos");

        let mut svgs = Vec::new();
        node.find_all(&|e| e.tag == "svg", &mut svgs);
        assert_eq!(svgs.len(), 4);
    }
}
