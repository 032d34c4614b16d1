use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Blocks { page: u64 },
    BlockDetail(String),
    Transactions,
    TransactionDetail(String),
    Statistics,
    MinerPool,
    NotFound(String),
}

/// Sidebar entry: label and the first path segment it activates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub name: &'static str,
    pub segment: &'static str,
    pub icon: &'static str,
}

pub const NAV_LINKS: [NavLink; 5] = [
    NavLink { name: "Dashboard", segment: "dashboard", icon: "fas fa-chart-line" },
    NavLink { name: "Blocks", segment: "blocks", icon: "fas fa-th-large" },
    NavLink { name: "Transactions", segment: "transactions", icon: "fas fa-exchange-alt" },
    NavLink { name: "Statistics", segment: "statistics", icon: "fas fa-chart-bar" },
    NavLink { name: "Miner Pool", segment: "miner-pool", icon: "fas fa-network-wired" },
];

fn page_param(query: &str) -> u64 {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0)
}

impl Route {
    /// Accepts `#blocks/abc`, `/blocks/abc` or `blocks/abc`. Empty input is
    /// the dashboard.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim().trim_start_matches('#').trim_start_matches('/');
        let (path, query) = trimmed.split_once('?').unwrap_or((trimmed, ""));
        let path = path.trim_end_matches('/');

        match path.split_once('/') {
            None => match path {
                "" | "dashboard" => Route::Dashboard,
                "blocks" => Route::Blocks { page: page_param(query) },
                "transactions" => Route::Transactions,
                "statistics" => Route::Statistics,
                "miner-pool" => Route::MinerPool,
                _ => Route::NotFound(path.to_string()),
            },
            Some(("blocks", hash)) if !hash.is_empty() && !hash.contains('/') => {
                Route::BlockDetail(hash.to_string())
            }
            Some(("transactions", id)) if !id.is_empty() && !id.contains('/') => {
                Route::TransactionDetail(id.to_string())
            }
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// First path segment, used for active-link highlighting.
    pub fn segment(&self) -> &str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Blocks { .. } => "blocks",
            Route::BlockDetail(_) => "blocks",
            Route::Transactions => "transactions",
            Route::TransactionDetail(_) => "transactions",
            Route::Statistics => "statistics",
            Route::MinerPool => "miner-pool",
            Route::NotFound(_) => "",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/dashboard".to_string(),
            Route::Blocks { page: 0 } => "/blocks".to_string(),
            Route::Blocks { page } => format!("/blocks?page={}", page),
            Route::BlockDetail(hash) => format!("/blocks/{}", hash),
            Route::Transactions => "/transactions".to_string(),
            Route::TransactionDetail(id) => format!("/transactions/{}", id),
            Route::Statistics => "/statistics".to_string(),
            Route::MinerPool => "/miner-pool".to_string(),
            Route::NotFound(raw) => format!("/{}", raw),
        }
    }

    /// Exact match on the route's first segment, so a detail page lights up
    /// its list's link.
    pub fn is_active(&self, link: &NavLink) -> bool {
        self.segment() == link.segment
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::BlockDetail(_) => "Detalle del Bloque",
            Route::TransactionDetail(_) => "Detalle de Transacción",
            _ => NAV_LINKS
                .iter()
                .find(|link| self.is_active(link))
                .map_or("Página Desconocida", |link| link.name),
        }
    }

    /// Label for metrics and logs.
    pub fn view_name(&self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Blocks { .. } => "blocks",
            Route::BlockDetail(_) => "block_detail",
            Route::Transactions => "transactions",
            Route::TransactionDetail(_) => "transaction_detail",
            Route::Statistics => "statistics",
            Route::MinerPool => "miner_pool",
            Route::NotFound(_) => "not_found",
        }
    }
}

/// Proof that a render was started by a given navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter shared by everything that renders into one root.
/// Each navigation invalidates the tickets handed out before it.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    generation: Arc<AtomicU64>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
