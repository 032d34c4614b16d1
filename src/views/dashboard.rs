use crate::core::api::ApiClient;
use crate::models::{Block, BLOCK_LIST};
use crate::render::{el, Node};
use crate::utils::error::Result;
use crate::utils::format::{format_count, format_timestamp, truncate_hash};
use crate::views::layout::{self, copy_button};
use crate::views::failure;
use tracing::error;

const RECENT_BLOCKS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub total_blocks: u64,
    pub latest: Block,
    /// Rendered count, or "Error" when the count endpoint failed.
    pub pending_count: String,
    pub recent: Vec<Block>,
}

pub async fn fetch(api: &ApiClient) -> Result<DashboardData> {
    let (first_page, latest) = futures::try_join!(api.blocks(0, 1), api.latest())?;
    let total_blocks = first_page.total_elements(BLOCK_LIST);

    let pending_count = match api.pending_count().await {
        Ok(count) => count.count.map(format_count).unwrap_or_else(|| "Error".to_string()),
        Err(e) => {
            error!(
                event = "pending_count_error",
                message = "Error fetching pending transaction count",
                error = %e
            );
            "Error".to_string()
        }
    };

    let mut recent = api.blocks(0, RECENT_BLOCKS).await?.into_items(BLOCK_LIST);
    recent.sort_by(|a, b| b.index.cmp(&a.index));

    Ok(DashboardData {
        total_blocks,
        latest,
        pending_count,
        recent,
    })
}

pub async fn load(api: &ApiClient) -> Node {
    match fetch(api).await {
        Ok(data) => view(&data),
        Err(e) => failure(
            "dashboard",
            &e,
            "No se pudo cargar el dashboard. Intenta de nuevo más tarde.",
        ),
    }
}

fn recent_block(block: &Block) -> Node {
    el("div")
        .class("border border-gray-200 rounded-md p-4 bg-gray-50 hover:bg-gray-100 transition-colors")
        .child(
            el("div")
                .class("flex justify-between items-center mb-2")
                .child(el("span").class("font-semibold text-blue-600 text-lg").text(format!("Bloque #{}", format_count(block.index))))
                .child(el("span").class("text-sm text-gray-500").text(format_timestamp(block.timestamp))),
        )
        .child(
            el("div")
                .class("flex items-center mb-2")
                .child(el("span").class("text-gray-700 font-medium mr-2").text("Hash:"))
                .child(el("span").class("font-mono text-sm break-all").text(truncate_hash(&block.hash, 30)))
                .child(copy_button(&block.hash)),
        )
        .child(
            el("div")
                .class("flex items-center")
                .child(el("span").class("text-gray-700 font-medium mr-2").text("Transacciones:"))
                .child(el("span").class("text-sm text-gray-900").text(format_count(block.data.len() as u64))),
        )
        .child(
            el("a")
                .attr("href", format!("/blocks/{}", block.hash))
                .class("text-blue-500 hover:underline text-sm mt-3 inline-block")
                .text("Ver Detalles del Bloque"),
        )
        .into()
}

pub fn view(data: &DashboardData) -> Node {
    let latest_card = layout::stat_card(
        "fas fa-cube text-xl",
        "bg-blue-100 text-blue-600",
        "Último Bloque",
        "latest-block-index",
        &data.latest.index.to_string(),
    )
    .child(el("p").class("text-sm text-gray-600 font-mono break-all").text(truncate_hash(&data.latest.hash, 24)))
    .child(
        el("a")
            .attr("href", format!("/blocks/{}", data.latest.hash))
            .class("text-blue-500 hover:underline text-sm mt-2")
            .text("Ver Detalles"),
    );

    let cards = el("div")
        .class("grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4 gap-6 mb-8")
        .child(latest_card)
        .child(layout::stat_card(
            "fas fa-layer-group text-xl",
            "bg-green-100 text-green-600",
            "Total de Bloques",
            "total-blocks",
            &format_count(data.total_blocks),
        ))
        .child(layout::stat_card(
            "fas fa-hourglass-half text-xl",
            "bg-yellow-100 text-yellow-600",
            "Transacciones Pendientes",
            "pending-tx-count",
            &data.pending_count,
        ))
        .child(layout::stat_card(
            "fas fa-list-alt text-xl",
            "bg-purple-100 text-purple-600",
            "TXs en Último Bloque",
            "latest-block-txs",
            &format_count(data.latest.data.len() as u64),
        ));

    let list = el("div").id("recent-blocks-list").class("space-y-4");
    let list = if data.recent.is_empty() {
        list.child(el("p").class("text-gray-600 italic").text("No hay bloques recientes para mostrar."))
    } else {
        list.children(data.recent.iter().map(recent_block))
    };

    let recent = el("div")
        .class("bg-white p-8 rounded-lg shadow-xl")
        .child(el("h2").class("text-2xl font-bold text-gray-900 mb-6 border-b pb-4").text("Bloques Recientes"))
        .child(list);

    el("div").id("dashboard").child(cards).child(recent).into()
}
