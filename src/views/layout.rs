use crate::core::router::{Route, NAV_LINKS};
use crate::render::{el, Element, Node};
use crate::views::status::StatusIndicator;

const CARD: &str = "bg-white p-8 rounded-lg shadow-xl mb-6";
const TH: &str = "px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider";
const TD: &str = "px-6 py-4 whitespace-nowrap text-sm text-gray-900";

/// Copies `data-copy` values and shows the confirmation toast.
const COPY_SCRIPT: &str = r#"
document.addEventListener('click', function (e) {
  var btn = e.target.closest('[data-copy]');
  if (!btn) return;
  e.preventDefault();
  navigator.clipboard.writeText(btn.getAttribute('data-copy')).then(function () {
    var toast = document.createElement('div');
    toast.className = 'fixed bottom-4 right-4 bg-green-500 text-white px-4 py-2 rounded-lg shadow-lg text-sm';
    toast.textContent = 'Copiado al portapapeles!';
    document.body.appendChild(toast);
    setTimeout(function () { toast.remove(); }, 2000);
  }).catch(function (err) { console.error('Failed to copy text: ', err); });
});
document.querySelectorAll('[data-dismiss-after]').forEach(function (node) {
  setTimeout(function () { node.remove(); }, parseInt(node.getAttribute('data-dismiss-after'), 10));
});
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Warning,
    Info,
    Success,
}

impl BannerKind {
    fn classes(self) -> &'static str {
        match self {
            BannerKind::Error => "bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative",
            BannerKind::Warning => "bg-yellow-100 border border-yellow-400 text-yellow-700 px-4 py-3 rounded relative",
            BannerKind::Info => "bg-blue-100 border border-blue-400 text-blue-700 px-4 py-3 rounded relative",
            BannerKind::Success => "bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded relative",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BannerKind::Error => "error",
            BannerKind::Warning => "warning",
            BannerKind::Info => "info",
            BannerKind::Success => "success",
        }
    }
}

/// Inline banner: bold label followed by the message.
pub fn banner(kind: BannerKind, label: &str, message: &str) -> Node {
    el("div")
        .class(kind.classes())
        .attr("role", "alert")
        .attr("data-kind", kind.as_str())
        .child(el("strong").class("font-bold").text(label))
        .child(el("span").class("block sm:inline").text(message))
        .into()
}

pub fn error_banner(message: &str) -> Node {
    banner(BannerKind::Error, "Error: ", message)
}

/// Auto-dismissing message for action outcomes.
pub fn toast(kind: BannerKind, message: &str, dismiss_after_ms: u64) -> Node {
    el("div")
        .class(&format!("{} mt-4", kind.classes()))
        .attr("data-kind", kind.as_str())
        .attr("data-dismiss-after", dismiss_after_ms.to_string())
        .text(message)
        .into()
}

pub fn loading_spinner() -> Node {
    el("div")
        .class("flex justify-center items-center py-8")
        .attr("data-loading", "true")
        .child(el("div").class("animate-spin rounded-full h-12 w-12 border-b-2 border-blue-500"))
        .into()
}

pub fn icon(class: &str) -> Element {
    el("i").class(class)
}

pub fn copy_button(value: &str) -> Node {
    el("button")
        .class("ml-2 text-gray-400 hover:text-gray-600 focus:outline-none")
        .attr("type", "button")
        .attr("data-copy", value)
        .attr("title", "Copiar")
        .child(icon("fas fa-copy text-xs"))
        .into()
}

pub fn card(title: &str) -> Element {
    el("div")
        .class(CARD)
        .child(el("h2").class("text-2xl font-bold text-gray-900 mb-6 border-b pb-4").text(title))
}

/// Metric card with an icon badge. `value_id` lets tests and scripts find
/// the figure.
pub fn stat_card(icon_class: &str, badge: &str, title: &str, value_id: &str, value: &str) -> Element {
    el("div")
        .class("bg-white p-6 rounded-lg shadow-md flex flex-col space-y-3")
        .child(
            el("div")
                .class("flex items-center space-x-3")
                .child(el("div").class(&format!("flex-shrink-0 {} rounded-full p-3", badge)).child(icon(icon_class)))
                .child(el("h3").class("text-lg font-semibold text-gray-700").text(title)),
        )
        .child(el("p").class("text-4xl font-bold text-gray-900").id(value_id).text(value))
}

pub fn table(headers: &[&str], rows: Vec<Node>) -> Node {
    el("div")
        .class("table-responsive")
        .child(
            el("table")
                .class("min-w-full divide-y divide-gray-200")
                .child(
                    el("thead")
                        .class("bg-gray-50")
                        .child(el("tr").children(headers.iter().map(|h| el("th").class(TH).text(*h)))),
                )
                .child(el("tbody").class("bg-white divide-y divide-gray-200").children(rows)),
        )
        .into()
}

pub fn row(cells: Vec<Node>) -> Node {
    el("tr").class("hover:bg-gray-50 transition-colors").children(cells).into()
}

pub fn cell(content: impl Into<Node>) -> Node {
    el("td").class(TD).child(content).into()
}

/// Monospace shortened identifier with a copy button, optionally linked.
pub fn id_cell(full: &str, shown: String, href: Option<String>) -> Node {
    let label = el("span").class("font-mono text-xs md:text-sm").text(shown);
    let content = match href {
        Some(href) => el("a").attr("href", href).class("hover:underline flex items-center text-blue-600").child(label),
        None => el("span").class("flex items-center").child(label),
    };
    el("td").class(TD).child(content.child(copy_button(full))).into()
}

fn nav(route: &Route) -> Node {
    el("nav").id("main-nav").class("space-y-2").children(NAV_LINKS.iter().map(|link| {
        let class = if route.is_active(link) {
            "nav-link flex items-center p-3 rounded-lg bg-blue-600 text-white space-x-3 text-lg"
        } else {
            "nav-link flex items-center p-3 rounded-lg text-gray-300 hover:bg-gray-700 hover:text-white space-x-3 text-lg"
        };
        el("a")
            .class(class)
            .attr("href", format!("/{}", link.segment))
            .attr_if(route.is_active(link), "aria-current", "page")
            .child(icon(link.icon))
            .child(el("span").text(link.name))
    }))
    .into()
}

/// Full document: sidebar, header with title and status, content root.
pub fn page(route: &Route, status: &StatusIndicator, content: Node) -> Node {
    let head = el("head")
        .child(el("meta").attr("charset", "UTF-8"))
        .child(el("meta").attr("name", "viewport").attr("content", "width=device-width, initial-scale=1.0"))
        .child(el("title").text(format!("{} · Blockchain Explorer", route.title())))
        .child(el("script").attr("src", "https://cdn.tailwindcss.com"))
        .child(
            el("link")
                .attr("rel", "stylesheet")
                .attr("href", "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css"),
        );

    let sidebar = el("aside")
        .class("w-64 bg-gray-800 min-h-screen p-4")
        .child(el("div").class("text-white text-2xl font-bold mb-8").text("Blockchain Explorer"))
        .child(nav(route));

    let header = el("header")
        .id("navbar")
        .class("flex justify-between items-center mb-8")
        .child(el("h1").id("header-title").class("text-3xl font-bold text-gray-900").text(route.title()))
        .child(status.to_node());

    let body = el("body")
        .class("bg-gray-100 flex")
        .child(sidebar)
        .child(
            el("div")
                .class("flex-1 p-8")
                .child(header)
                .child(el("main").id("content").child(content)),
        )
        .child(el("script").text(COPY_SCRIPT));

    el("html").attr("lang", "es").child(head).child(body).into()
}

pub fn document(node: &Node) -> String {
    format!("<!DOCTYPE html>\n{}", node.to_html())
}

pub fn not_found(raw: &str) -> Node {
    banner(
        BannerKind::Warning,
        "Página no encontrada: ",
        &format!("La ruta '{}' no existe.", raw),
    )
}
