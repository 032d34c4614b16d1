use crate::core::api::ApiClient;
use crate::core::batch::{BatchSubmitter, GeneratorRequest};
use crate::core::poller::MinerPoolPoller;
use crate::core::router::Route;
use crate::core::MetricsCollector;
use crate::render::{Node, ViewHost};
use crate::utils::format::random_address;
use crate::views::layout::{self, BannerKind};
use crate::views::{self, status, ViewContext};
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};
use warp::http::StatusCode;
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};

pub const SESSION_COOKIE: &str = "dash_session";
const MAX_SESSIONS: usize = 1024;
const SESSION_ID_LENGTH: usize = 24;

const SHORT_TOAST_MS: u64 = 3_000;
const LONG_TOAST_MS: u64 = 5_000;

/// One [`ViewHost`] per browser session, so one visitor's navigation never
/// invalidates another's render. Oldest sessions are evicted first.
pub struct Sessions {
    inner: Mutex<SessionTable>,
    metrics: MetricsCollector,
}

#[derive(Default)]
struct SessionTable {
    hosts: HashMap<String, Arc<ViewHost>>,
    order: VecDeque<String>,
}

impl Sessions {
    pub fn new(metrics: MetricsCollector) -> Self {
        Self {
            inner: Mutex::new(SessionTable::default()),
            metrics,
        }
    }

    /// Host for the given session id, creating a session when the id is
    /// missing or unknown.
    pub fn host(&self, id: Option<String>) -> (String, Arc<ViewHost>) {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(id) = id {
            if let Some(host) = table.hosts.get(&id) {
                return (id, host.clone());
            }
        }

        let id = random_address(SESSION_ID_LENGTH);
        let host = Arc::new(ViewHost::new(self.metrics.clone()));
        if table.order.len() >= MAX_SESSIONS {
            if let Some(evicted) = table.order.pop_front() {
                table.hosts.remove(&evicted);
                debug!(event = "session_evicted", message = "Dropped oldest session");
            }
        }
        table.order.push_back(id.clone());
        table.hosts.insert(id.clone(), host.clone());
        (id, host)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub poller: Arc<MinerPoolPoller>,
    pub submitter: BatchSubmitter,
    pub sessions: Arc<Sessions>,
    pub metrics: MetricsCollector,
    pub page_size: u64,
}

#[derive(Debug, Deserialize)]
pub struct BatchForm {
    pub payload: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub batch_size: String,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyForm {
    pub difficulty: String,
}

fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// Renders `route` through the session's host and wraps it in the page shell.
/// A render overtaken by a newer navigation of the same session answers 409.
async fn render_page(
    state: AppState,
    route: Route,
    session: Option<String>,
    notice: Option<Node>,
) -> Result<warp::reply::Response, Infallible> {
    let (session_id, host) = state.sessions.host(session);
    let view = route.view_name();
    let ctx = ViewContext {
        api: &state.api,
        poller: &state.poller,
        page_size: state.page_size,
    };

    let (indicator, content) = tokio::join!(
        status::load(&state.api),
        host.render(view, views::load(&ctx, &route, notice))
    );

    let (code, body) = match content {
        Some(content) => {
            state.metrics.record_render(view, "ok");
            let status = if matches!(route, Route::NotFound(_)) {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            (status, layout::document(&layout::page(&route, &indicator, content)))
        }
        None => {
            state.metrics.record_render(view, "stale");
            let banner = layout::banner(
                BannerKind::Info,
                "Información: ",
                "Esta vista fue reemplazada por una navegación más reciente.",
            );
            (StatusCode::CONFLICT, layout::document(&layout::page(&route, &indicator, banner)))
        }
    };

    let reply = warp::reply::with_status(warp::reply::html(body), code);
    let reply = warp::reply::with_header(reply, "set-cookie", session_cookie(&session_id));
    Ok(reply.into_response())
}

async fn page(
    path: FullPath,
    query: String,
    session: Option<String>,
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    let raw = if query.is_empty() {
        path.as_str().to_string()
    } else {
        format!("{}?{}", path.as_str(), query)
    };
    let route = Route::parse(&raw);
    debug!(event = "page_request", message = "Rendering route", route = %raw);
    render_page(state, route, session, None).await
}

async fn submit_batch(
    form: BatchForm,
    session: Option<String>,
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    let notice = match state.submitter.submit_json(&form.payload).await {
        Ok(report) => {
            info!(
                event = "batch_submitted",
                message = "Batch form submitted",
                sent = report.sent
            );
            layout::toast(BannerKind::Success, "Transacciones enviadas con éxito!", SHORT_TOAST_MS)
        }
        Err(e) => {
            warn!(event = "batch_rejected", message = "Batch form failed", error = %e);
            layout::toast(
                BannerKind::Error,
                &format!("Error al enviar transacciones: {}", e.user_message()),
                LONG_TOAST_MS,
            )
        }
    };
    render_page(state, Route::Transactions, session, Some(notice)).await
}

async fn generate_batches(
    form: GenerateForm,
    session: Option<String>,
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    let notice = match GeneratorRequest::from_form(&form.total, &form.batch_size) {
        Err(e) => layout::toast(BannerKind::Error, &e.user_message(), SHORT_TOAST_MS),
        Ok(request) => match state.submitter.generate(request).await {
            Ok(report) => layout::toast(
                BannerKind::Success,
                &format!(
                    "Se generaron y enviaron {} transacciones en {} batches.",
                    report.sent, report.batches
                ),
                LONG_TOAST_MS,
            ),
            Err(e) => layout::toast(
                BannerKind::Error,
                &format!("Error al enviar transacciones aleatorias: {}", e.user_message()),
                LONG_TOAST_MS,
            ),
        },
    };
    render_page(state, Route::Transactions, session, Some(notice)).await
}

async fn update_difficulty(
    form: DifficultyForm,
    session: Option<String>,
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    let difficulty = form.difficulty.trim();
    let notice = if difficulty.is_empty() {
        layout::toast(BannerKind::Error, "La dificultad no puede estar vacía.", SHORT_TOAST_MS)
    } else {
        match state.api.set_difficulty(difficulty).await {
            Ok(answer) => {
                info!(
                    event = "difficulty_updated",
                    message = "Difficulty changed from the dashboard",
                    difficulty = difficulty
                );
                if let Err(e) = state.poller.refresh_if_running().await {
                    warn!(event = "miner_refresh_error", message = "Error refreshing miner pool", error = %e);
                }
                let message = if answer.is_empty() {
                    format!("Dificultad actualizada a {}.", difficulty)
                } else {
                    answer
                };
                layout::toast(BannerKind::Success, &message, LONG_TOAST_MS)
            }
            Err(e) => layout::toast(
                BannerKind::Error,
                &format!("Error al actualizar la dificultad: {}", e.user_message()),
                LONG_TOAST_MS,
            ),
        }
    };
    render_page(state, Route::MinerPool, session, Some(notice)).await
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn session() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE)
}

pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    let batch = warp::path!("transactions" / "batch")
        .and(warp::post())
        .and(warp::body::form::<BatchForm>())
        .and(session())
        .and(with_state(state.clone()))
        .and_then(submit_batch);

    let generate = warp::path!("transactions" / "generate")
        .and(warp::post())
        .and(warp::body::form::<GenerateForm>())
        .and(session())
        .and(with_state(state.clone()))
        .and_then(generate_batches);

    let difficulty = warp::path!("miner-pool" / "difficulty")
        .and(warp::post())
        .and(warp::body::form::<DifficultyForm>())
        .and(session())
        .and(with_state(state.clone()))
        .and_then(update_difficulty);

    let pages = warp::get()
        .and(warp::path::full())
        .and(warp::query::raw().or(warp::any().map(String::new)).unify())
        .and(session())
        .and(with_state(state))
        .and_then(page);

    health.or(batch).or(generate).or(difficulty).or(pages)
}

pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let (bound, server) = warp::serve(routes(state)).try_bind_with_graceful_shutdown(addr, shutdown)?;
    info!(
        event = "server_listening",
        message = "Dashboard listening",
        addr = %bound
    );
    server.await;
    info!(event = "server_stopped", message = "Dashboard server shut down");
    Ok(())
}
