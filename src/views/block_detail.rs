use crate::core::api::ApiClient;
use crate::models::{Block, Transaction};
use crate::render::{el, Element, Node};
use crate::utils::error::Result;
use crate::utils::format::{format_amount, format_count, format_timestamp, shorten_id};
use crate::views::failure;
use crate::views::layout::{self, copy_button, icon, BannerKind};

/// Path token that resolves to the chain tip.
pub const LATEST: &str = "latest";

const NAV_BUTTON: &str = "px-6 py-2 bg-blue-600 text-white rounded-lg shadow-md hover:bg-blue-700 transition-colors flex items-center space-x-2";

pub async fn fetch(api: &ApiClient, hash: &str) -> Result<Option<Block>> {
    if hash == LATEST {
        return match api.latest().await {
            Ok(block) => Ok(Some(block)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        };
    }
    api.block(hash).await
}

pub async fn load(api: &ApiClient, hash: &str) -> Node {
    match fetch(api, hash).await {
        Ok(Some(block)) => view(&block),
        Ok(None) => missing(hash),
        Err(e) => failure(
            "block_detail",
            &e,
            &format!(
                "No se pudieron cargar los detalles del bloque con hash {}. Intenta de nuevo más tarde.",
                hash
            ),
        ),
    }
}

pub fn missing(hash: &str) -> Node {
    layout::banner(
        BannerKind::Warning,
        "Advertencia: ",
        &format!("No se encontró el bloque con hash: {}.", hash),
    )
}

fn navigation(block: &Block) -> Node {
    let previous = match block.previous() {
        Some(hash) => el("a").attr("href", format!("/blocks/{}", hash)).class(NAV_BUTTON),
        None => el("button")
            .attr("disabled", "disabled")
            .attr("title", "Este es el bloque Génesis o no hay un bloque anterior disponible.")
            .class(&format!("{} opacity-50 cursor-not-allowed", NAV_BUTTON)),
    };

    // The node exposes no lookup by index, so "next" jumps to the tip.
    let next = el("a")
        .id("next-block")
        .attr("href", format!("/blocks/{}", LATEST))
        .attr(
            "title",
            "La navegación al siguiente bloque por índice aún no está implementada. Mostrando el último bloque.",
        )
        .class(NAV_BUTTON)
        .child(el("span").text("Siguiente"))
        .child(icon("fas fa-chevron-right"));

    el("div")
        .class("flex justify-between mb-6")
        .child(
            previous
                .id("previous-block")
                .child(icon("fas fa-chevron-left"))
                .child(el("span").text("Anterior")),
        )
        .child(next)
        .into()
}

fn field(label: &str, value: Element) -> Element {
    el("p")
        .class("flex items-center space-x-2")
        .child(el("strong").class("w-32 flex-shrink-0").text(label))
        .child(value)
}

fn info_card(block: &Block) -> Node {
    let previous_hash = if block.previous_hash.is_empty() {
        "N/A"
    } else {
        block.previous_hash.as_str()
    };

    let previous = field(
        "Hash Previo:",
        el("span").id("block-previous-hash").class("font-mono break-all text-sm").text(previous_hash),
    )
    .child_opt(block.previous().map(copy_button))
    .child_opt(block.previous().map(|hash| {
        el("a")
            .attr("href", format!("/blocks/{}", hash))
            .class("ml-2 text-blue-500 hover:underline text-xs")
            .text("Ver")
    }));

    el("div")
        .class("bg-white p-8 rounded-lg shadow-xl mb-6")
        .child(
            el("h2")
                .id("block-title")
                .class("text-3xl font-extrabold text-gray-900 mb-6 border-b pb-4")
                .text(format!("Bloque #{}", format_count(block.index))),
        )
        .child(
            el("div")
                .class("grid grid-cols-1 md:grid-cols-2 gap-y-4 gap-x-8 text-gray-700")
                .child(
                    field("Hash:", el("span").id("block-hash").class("font-mono break-all text-sm").text(block.hash.as_str()))
                        .child(copy_button(&block.hash)),
                )
                .child(previous)
                .child(field("Nonce:", el("span").class("font-mono text-sm").text(format_count(block.nonce))))
                .child(field("Marca de Tiempo:", el("span").class("text-sm").text(format_timestamp(block.timestamp)))),
        )
        .into()
}

pub fn transaction_row(tx: &Transaction) -> Node {
    layout::row(vec![
        layout::id_cell(&tx.id, shorten_id(&tx.id, 6, 6), Some(format!("/transactions/{}", tx.id))),
        layout::id_cell(&tx.sender, shorten_id(&tx.sender, 6, 6), None),
        layout::id_cell(&tx.receiver, shorten_id(&tx.receiver, 6, 6), None),
        layout::cell(format_amount(tx.amount)),
        layout::cell(format_timestamp(tx.timestamp)),
    ])
}

pub const TRANSACTION_HEADERS: [&str; 5] = ["ID TX", "Remitente", "Receptor", "Cantidad", "Marca de Tiempo"];

fn transactions_card(block: &Block) -> Node {
    let card = el("div").class("bg-white p-8 rounded-lg shadow-xl").child(
        el("h3")
            .class("text-2xl font-bold text-gray-900 mb-6 border-b pb-4")
            .text(format!("Transacciones ({})", format_count(block.data.len() as u64))),
    );

    if block.data.is_empty() {
        return card
            .child(el("p").class("text-gray-600 italic").text("No hay transacciones en este bloque."))
            .into();
    }
    card.child(layout::table(
        &TRANSACTION_HEADERS,
        block.data.iter().map(transaction_row).collect(),
    ))
    .into()
}

pub fn view(block: &Block) -> Node {
    el("div")
        .id("block-detail")
        .child(navigation(block))
        .child(info_card(block))
        .child(transactions_card(block))
        .into()
}
