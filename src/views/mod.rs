pub mod block_detail;
pub mod block_list;
pub mod chart;
pub mod dashboard;
pub mod layout;
pub mod miner_pool;
pub mod statistics;
pub mod status;
pub mod transaction_detail;
pub mod transactions;

use crate::core::api::ApiClient;
use crate::core::poller::MinerPoolPoller;
use crate::core::router::Route;
use crate::render::Node;
use crate::utils::error::DashboardError;
use tracing::error;

/// Everything a view loader needs besides its route.
pub struct ViewContext<'a> {
    pub api: &'a ApiClient,
    pub poller: &'a MinerPoolPoller,
    pub page_size: u64,
}

/// Boundary for every view: the error is logged and replaced by a banner.
pub fn failure(view: &'static str, e: &DashboardError, copy: &str) -> Node {
    error!(
        event = "view_error",
        message = "View failed to load",
        view = view,
        error = %e
    );
    layout::error_banner(copy)
}

/// Loads the content for `route`. `notice` is an action outcome shown by
/// views that host forms.
pub async fn load(ctx: &ViewContext<'_>, route: &Route, notice: Option<Node>) -> Node {
    match route {
        Route::Dashboard => dashboard::load(ctx.api).await,
        Route::Blocks { page } => block_list::load(ctx.api, *page, ctx.page_size).await,
        Route::BlockDetail(hash) => block_detail::load(ctx.api, hash).await,
        Route::Transactions => transactions::load(ctx.api, notice).await,
        Route::TransactionDetail(id) => transaction_detail::load(ctx.api, id).await,
        Route::Statistics => statistics::load(ctx.api).await,
        Route::MinerPool => miner_pool::load(ctx.poller, notice).await,
        Route::NotFound(raw) => layout::not_found(raw),
    }
}
