use crate::core::poller::{MinerPoolPoller, MinerPoolSnapshot};
use crate::models::Miner;
use crate::render::{el, Node};
use crate::utils::format::{format_datetime, shorten_id};
use crate::views::failure;
use crate::views::layout::{self, icon};
use chrono::Local;

pub const DIFFICULTY_ACTION: &str = "/miner-pool/difficulty";

pub async fn load(poller: &MinerPoolPoller, notice: Option<Node>) -> Node {
    match poller.current().await {
        Ok(snapshot) => view(&snapshot, notice),
        Err(e) => failure(
            "miner_pool",
            &e,
            "No se pudieron cargar los mineros del pool. Asegúrate de que la API esté funcionando correctamente.",
        ),
    }
}

fn last_seen(miner: &Miner) -> String {
    miner
        .last_timestamp
        .as_ref()
        .and_then(|ts| ts.to_datetime())
        .map(|dt| format_datetime(&dt.with_timezone(&Local)))
        .unwrap_or_else(|| "N/A".to_string())
}

fn miner_row(miner: &Miner) -> Node {
    let gpu = if miner.gpu_miner {
        icon("fas fa-check-circle text-green-500 text-lg").attr("title", "Sí, minero GPU")
    } else {
        icon("fas fa-times-circle text-red-500 text-lg").attr("title", "No, minero CPU")
    };
    layout::row(vec![
        layout::id_cell(&miner.public_key, shorten_id(&miner.public_key, 10, 10), None),
        layout::cell(last_seen(miner)),
        el("td").class("px-6 py-4 whitespace-nowrap text-sm text-center").child(gpu).into(),
    ])
}

fn miners_card(miners: &[Miner]) -> Node {
    let card = layout::card("Pool de Nodos Mineros").id("miner-pool");
    if miners.is_empty() {
        return card
            .child(el("p").class("text-gray-600 italic").text("No hay mineros registrados en el pool en este momento."))
            .into();
    }
    card.child(layout::table(
        &["Public Key", "Último Keep-Alive", "Minería GPU"],
        miners.iter().map(miner_row).collect(),
    ))
    .into()
}

fn difficulty_card(difficulty: Option<&str>) -> Node {
    let current = difficulty.filter(|d| !d.is_empty()).unwrap_or("N/A");
    layout::card("Dificultad de Minería")
        .id("difficulty")
        .child(
            el("p")
                .class("flex items-center space-x-2 mb-4 text-gray-700")
                .child(el("strong").text("Desafío actual:"))
                .child(el("span").id("current-difficulty").class("font-mono text-lg").text(current)),
        )
        .child(
            el("form")
                .id("difficulty-form")
                .attr("method", "post")
                .attr("action", DIFFICULTY_ACTION)
                .class("flex items-center space-x-2")
                .child(
                    el("input")
                        .attr("type", "text")
                        .attr("name", "difficulty")
                        .attr("required", "required")
                        .attr("placeholder", "0000")
                        .class("p-2 border border-gray-300 rounded-md font-mono text-sm"),
                )
                .child(
                    el("button")
                        .attr("type", "submit")
                        .class("px-4 py-2 bg-blue-600 text-white rounded-lg shadow-md hover:bg-blue-700 transition-colors text-sm")
                        .text("Actualizar Dificultad"),
                ),
        )
        .into()
}

pub fn view(snapshot: &MinerPoolSnapshot, notice: Option<Node>) -> Node {
    el("div")
        .id("miner-pool-view")
        .child(el("div").id("miner-pool-notice").child_opt(notice))
        .child(miners_card(&snapshot.miners))
        .child(difficulty_card(snapshot.difficulty.as_deref()))
        .child(
            el("p")
                .class("text-xs text-gray-500")
                .text(format!("Actualizado: {}", format_datetime(&snapshot.fetched_at.with_timezone(&Local)))),
        )
        .into()
}
