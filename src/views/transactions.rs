use crate::core::api::ApiClient;
use crate::core::batch::{MAX_GENERATED_BATCH, MAX_GENERATED_TOTAL};
use crate::models::{Transaction, TRANSACTION_LIST};
use crate::render::{el, Element, Node};
use crate::views::block_detail::{transaction_row, TRANSACTION_HEADERS};
use crate::views::failure;
use crate::views::layout::{self, icon};

pub const BATCH_ACTION: &str = "/transactions/batch";
pub const GENERATE_ACTION: &str = "/transactions/generate";

const BATCH_PLACEHOLDER: &str =
    r#"[ { "sender": "addr1", "receiver": "addr2", "amount": 10 }, { "sender": "addr3", "receiver": "addr4", "amount": 25 } ]"#;

pub async fn load(api: &ApiClient, notice: Option<Node>) -> Node {
    match api.pending_transactions().await {
        Ok(envelope) => view(&envelope.into_items(TRANSACTION_LIST), notice),
        Err(e) => failure(
            "transactions",
            &e,
            "No se pudieron cargar las transacciones pendientes. Intenta de nuevo más tarde.",
        ),
    }
}

fn pending_card(pending: &[Transaction]) -> Node {
    let card = layout::card("Transacciones Pendientes").id("pending-transactions");
    if pending.is_empty() {
        return card
            .child(el("p").class("text-gray-600 italic").text("No hay transacciones pendientes en este momento."))
            .into();
    }
    card.child(layout::table(
        &TRANSACTION_HEADERS,
        pending.iter().map(transaction_row).collect(),
    ))
    .into()
}

fn submit_button(class: &str, icon_class: &str, label: &str) -> Element {
    el("button")
        .attr("type", "submit")
        .class(class)
        .child(icon(icon_class))
        .child(el("span").text(label))
}

fn batch_form() -> Node {
    el("div")
        .class("bg-white p-8 rounded-lg shadow-xl")
        .child(el("h3").class("text-2xl font-bold text-gray-900 mb-6 border-b pb-4").text("Enviar Batch de Transacciones"))
        .child(
            el("form")
                .id("batch-form")
                .attr("method", "post")
                .attr("action", BATCH_ACTION)
                .class("space-y-4")
                .child(
                    el("textarea")
                        .id("batch-transactions-textarea")
                        .attr("name", "payload")
                        .attr("rows", "7")
                        .attr("placeholder", BATCH_PLACEHOLDER)
                        .class("w-full p-3 border border-gray-300 rounded-md focus:ring-blue-500 focus:border-blue-500 resize-y font-mono text-sm"),
                )
                .child(submit_button(
                    "w-full px-6 py-3 bg-blue-600 text-white font-semibold rounded-lg shadow-md hover:bg-blue-700 transition-colors flex items-center justify-center space-x-2",
                    "fas fa-paper-plane",
                    "Enviar Batch",
                )),
        )
        .into()
}

fn number_input(id: &str, name: &str, label: &str, value: u64, max: u64) -> Node {
    el("div")
        .class("flex items-center space-x-2")
        .child(el("label").attr("for", id).class("text-gray-700 text-lg").text(label))
        .child(
            el("input")
                .id(id)
                .attr("type", "number")
                .attr("name", name)
                .attr("value", value.to_string())
                .attr("min", "1")
                .attr("max", max.to_string())
                .class("w-24 p-2 border border-gray-300 rounded-md focus:ring-green-500 focus:border-green-500 text-sm"),
        )
        .into()
}

fn generator_form() -> Node {
    el("div")
        .class("bg-white p-8 rounded-lg shadow-xl mt-6")
        .child(
            el("h3")
                .class("text-2xl font-bold text-gray-900 mb-6 border-b pb-4")
                .text("Generar Transacciones Aleatorias por Batch"),
        )
        .child(
            el("form")
                .id("generate-form")
                .attr("method", "post")
                .attr("action", GENERATE_ACTION)
                .child(
                    el("div")
                        .class("grid grid-cols-1 md:grid-cols-2 gap-4 items-center mb-4")
                        .child(number_input("num-random-txs", "total", "Total de TXs:", 10, MAX_GENERATED_TOTAL))
                        .child(number_input("batch-size", "batch_size", "TXs por Batch:", 5, MAX_GENERATED_BATCH)),
                )
                .child(submit_button(
                    "w-full px-6 py-3 bg-green-600 text-white font-semibold rounded-lg shadow-md hover:bg-green-700 transition-colors flex items-center justify-center space-x-2",
                    "fas fa-dice",
                    "Generar y Enviar Batches Aleatorios",
                )),
        )
        .into()
}

pub fn view(pending: &[Transaction], notice: Option<Node>) -> Node {
    el("div")
        .id("transactions")
        .child(el("div").id("transactions-notice").child_opt(notice))
        .child(pending_card(pending))
        .child(batch_form())
        .child(generator_form())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::layout::BannerKind;

    #[test]
    fn empty_pool_still_offers_the_forms() {
        let node = view(&[], None);
        assert!(node.text_content().contains("No hay transacciones pendientes en este momento."));
        assert_eq!(node.find_by_id("batch-form").and_then(|e| e.get_attr("action")), Some(BATCH_ACTION));
        assert_eq!(node.find_by_id("generate-form").and_then(|e| e.get_attr("action")), Some(GENERATE_ACTION));
        assert_eq!(node.find_by_id("num-random-txs").and_then(|e| e.get_attr("max")), Some("1000"));
    }

    #[test]
    fn notice_is_shown_above_the_list() {
        let notice = layout::toast(BannerKind::Success, "Transacciones enviadas con éxito!", 3_000);
        let node = view(&[], Some(notice));
        let container = Node::from(node.find_by_id("transactions-notice").unwrap().clone());
        assert_eq!(container.text_content(), "Transacciones enviadas con éxito!");
    }

    #[test]
    fn pending_rows_link_to_details() {
        let pending = vec![Transaction {
            id: "0123456789abcdef".into(),
            sender: "a".into(),
            receiver: "b".into(),
            amount: 3.0,
            timestamp: 1_700_000_000,
        }];
        let node = view(&pending, None);
        assert!(node
            .find(&|e| e.get_attr("href") == Some("/transactions/0123456789abcdef"))
            .is_some());
    }
}
