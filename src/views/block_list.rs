use crate::core::api::ApiClient;
use crate::core::pagination::{Pagination, PAGE_WINDOW};
use crate::core::router::Route;
use crate::models::{Block, BLOCK_LIST};
use crate::render::{el, Element, Node};
use crate::utils::error::Result;
use crate::utils::format::{format_count, format_timestamp, shorten_id};
use crate::views::failure;
use crate::views::layout::{self, icon};
use tracing::warn;

const BUTTON: &str = "px-4 py-2 border border-gray-300 rounded-md shadow-sm text-sm font-medium";

#[derive(Debug, Clone, PartialEq)]
pub struct BlockPage {
    pub blocks: Vec<Block>,
    pub pagination: Pagination,
    pub genesis_hash: Option<String>,
}

/// Fetches one page. A page past the end is re-requested at the last
/// valid index.
pub async fn fetch(api: &ApiClient, page: u64, page_size: u64) -> Result<BlockPage> {
    let (listing, genesis) = tokio::join!(api.blocks(page, page_size), api.blocks(0, 1));
    let mut envelope = listing?;
    let mut pagination = Pagination::new(page, page_size, envelope.total_elements(BLOCK_LIST));

    let clamped = pagination.clamped();
    if clamped.page != pagination.page {
        envelope = api.blocks(clamped.page, page_size).await?;
        pagination = Pagination::new(clamped.page, page_size, envelope.total_elements(BLOCK_LIST)).clamped();
    }

    let genesis_hash = match genesis {
        Ok(first) => first
            .items(BLOCK_LIST)
            .iter()
            .find(|block| block.index == 0)
            .map(|block| block.hash.clone()),
        Err(e) => {
            warn!(
                event = "genesis_lookup_error",
                message = "Error fetching genesis block",
                error = %e
            );
            None
        }
    };

    let mut blocks = envelope.into_items(BLOCK_LIST);
    blocks.sort_by(|a, b| b.index.cmp(&a.index));

    Ok(BlockPage {
        blocks,
        pagination,
        genesis_hash,
    })
}

pub async fn load(api: &ApiClient, page: u64, page_size: u64) -> Node {
    match fetch(api, page, page_size).await {
        Ok(data) => view(&data),
        Err(e) => failure(
            "blocks",
            &e,
            "No se pudieron cargar los bloques. Intenta de nuevo más tarde.",
        ),
    }
}

fn top_nav(genesis_hash: Option<&str>) -> Node {
    let genesis = match genesis_hash {
        Some(hash) => el("a")
            .attr("href", format!("/blocks/{}", hash))
            .class("px-4 py-2 bg-gray-200 text-gray-700 rounded-lg shadow-md hover:bg-gray-300 transition-colors inline-flex items-center space-x-2 text-sm"),
        None => el("button")
            .attr("disabled", "disabled")
            .attr("title", "No se encontró el bloque Génesis (Índice 0).")
            .class("px-4 py-2 bg-gray-200 text-gray-700 rounded-lg shadow-md opacity-50 cursor-not-allowed inline-flex items-center space-x-2 text-sm"),
    };
    el("div")
        .class("flex justify-between items-center mb-6")
        .child(el("h2").class("text-2xl font-bold text-gray-900").text("Explorador de Bloques"))
        .child(
            el("div")
                .class("space-x-2")
                .child(genesis.id("genesis-block").child(icon("fas fa-arrow-alt-circle-up")).child(el("span").text("Bloque Génesis")))
                .child(
                    el("a")
                        .id("latest-block")
                        .attr("href", "/blocks/latest")
                        .class("px-4 py-2 bg-blue-600 text-white rounded-lg shadow-md hover:bg-blue-700 transition-colors inline-flex items-center space-x-2 text-sm")
                        .child(icon("fas fa-arrow-alt-circle-down"))
                        .child(el("span").text("Último Bloque")),
                ),
        )
        .into()
}

fn page_control(id: &str, target: Option<u64>, label: Element) -> Element {
    match target {
        Some(page) => el("a")
            .id(id)
            .attr("href", Route::Blocks { page }.path())
            .class(&format!("{} text-gray-700 bg-white hover:bg-gray-50", BUTTON))
            .child(label),
        None => el("button")
            .id(id)
            .attr("disabled", "disabled")
            .class(&format!("{} text-gray-700 bg-white opacity-50 cursor-not-allowed", BUTTON))
            .child(label),
    }
}

pub fn pagination_controls(pagination: &Pagination) -> Node {
    let mut nav = el("nav")
        .id("pagination")
        .class("flex justify-center mt-8 space-x-2")
        .child(page_control("prev-page", pagination.previous(), icon("fas fa-chevron-left")));

    if let Some(window) = pagination.window(PAGE_WINDOW) {
        for page in window {
            let class = if page == pagination.page {
                format!("{} bg-blue-600 text-white border-blue-600", BUTTON)
            } else {
                format!("{} bg-white text-gray-700 hover:bg-blue-50 hover:text-blue-700", BUTTON)
            };
            nav = nav.child(
                el("a")
                    .attr("href", Route::Blocks { page }.path())
                    .class(&class)
                    .attr_if(page == pagination.page, "aria-current", "page")
                    .text((page + 1).to_string()),
            );
        }
    }

    nav.child(page_control("next-page", pagination.next(), icon("fas fa-chevron-right")))
        .into()
}

fn block_row(block: &Block) -> Node {
    layout::row(vec![
        layout::cell(format_count(block.index)),
        layout::id_cell(&block.hash, shorten_id(&block.hash, 10, 10), Some(format!("/blocks/{}", block.hash))),
        layout::cell(format_count(block.data.len() as u64)),
        layout::cell(format_timestamp(block.timestamp)),
    ])
}

pub fn view(data: &BlockPage) -> Node {
    let root = el("div").id("block-list").child(top_nav(data.genesis_hash.as_deref()));

    if data.blocks.is_empty() {
        return root
            .child(
                el("div")
                    .class("bg-white p-6 rounded-lg shadow-md text-center text-gray-600")
                    .child(el("p").text("No hay bloques para mostrar en este momento.")),
            )
            .into();
    }

    root.child(
        el("div").class("bg-white shadow-md rounded-lg overflow-hidden mb-6").child(layout::table(
            &["Índice", "Hash", "Transacciones", "Marca de Tiempo"],
            data.blocks.iter().map(block_row).collect(),
        )),
    )
    .child(pagination_controls(&data.pagination))
    .into()
}
