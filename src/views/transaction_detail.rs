use crate::core::api::ApiClient;
use crate::models::{Transaction, TRANSACTION_LIST};
use crate::render::{el, Element, Node};
use crate::utils::error::Result;
use crate::utils::format::{format_amount, format_timestamp};
use crate::views::failure;
use crate::views::layout::{self, copy_button, BannerKind};

/// The node has no lookup by id, so the pending pool is searched.
pub async fn fetch(api: &ApiClient, id: &str) -> Result<Option<Transaction>> {
    let pending = api.pending_transactions().await?;
    Ok(pending.into_items(TRANSACTION_LIST).into_iter().find(|tx| tx.id == id))
}

pub async fn load(api: &ApiClient, id: &str) -> Node {
    match fetch(api, id).await {
        Ok(Some(tx)) => view(&tx),
        Ok(None) => missing(id),
        Err(e) => failure(
            "transaction_detail",
            &e,
            &format!("No se pudieron cargar los detalles de la transacción {}. Intenta de nuevo más tarde.", id),
        ),
    }
}

pub fn missing(id: &str) -> Node {
    layout::banner(
        BannerKind::Warning,
        "Advertencia: ",
        &format!(
            "La transacción {} no está entre las transacciones pendientes. Puede que ya se haya incluido en un bloque.",
            id
        ),
    )
}

fn field(label: &str, value: Element) -> Node {
    el("p")
        .class("flex items-center space-x-2")
        .child(el("strong").text(label))
        .child(value)
        .into()
}

fn mono(value: &str) -> Element {
    el("span").class("font-mono break-all text-sm").text(value)
}

pub fn view(tx: &Transaction) -> Node {
    el("div")
        .id("transaction-detail")
        .class("bg-white p-8 rounded-lg shadow-xl mb-6")
        .child(
            el("h2")
                .class("text-3xl font-extrabold text-gray-900 mb-6 border-b pb-4")
                .text("Detalles de la Transacción"),
        )
        .child(
            el("div")
                .class("grid grid-cols-1 md:grid-cols-2 gap-4 text-gray-700")
                .child(field("ID de Transacción:", mono(&tx.id).child(copy_button(&tx.id))))
                .child(field(
                    "Estado:",
                    el("span").id("transaction-status").class("text-sm text-yellow-600 font-semibold").text("Pendiente"),
                ))
                .child(field("Remitente:", mono(&tx.sender)))
                .child(field("Receptor:", mono(&tx.receiver)))
                .child(field("Cantidad:", el("span").class("text-sm").text(format_amount(tx.amount))))
                .child(field("Marca de Tiempo:", el("span").class("text-sm").text(format_timestamp(tx.timestamp)))),
        )
        .into()
}
