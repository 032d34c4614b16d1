use super::diff::{diff, Patch};
use super::node::Node;
use crate::core::router::{Navigator, Ticket};
use crate::core::MetricsCollector;
use crate::views::layout;
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Result of committing a tree into a host.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Applied(Vec<Patch>),
    /// A newer navigation started after this render; the tree was dropped.
    Stale,
}

/// Owns the tree shown in one content root. Renders go through
/// [`ViewHost::render`]: the loading placeholder is committed first and
/// the loaded view only replaces it while its ticket is still current.
pub struct ViewHost {
    navigator: Navigator,
    current: Mutex<Node>,
    metrics: MetricsCollector,
}

impl ViewHost {
    pub fn new(metrics: MetricsCollector) -> Self {
        Self {
            navigator: Navigator::new(),
            current: Mutex::new(layout::loading_spinner()),
            metrics,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub async fn current(&self) -> Node {
        self.current.lock().await.clone()
    }

    /// Starts a navigation and shows the loading placeholder.
    pub async fn begin(&self) -> Ticket {
        let ticket = self.navigator.navigate();
        *self.current.lock().await = layout::loading_spinner();
        ticket
    }

    pub async fn commit(&self, ticket: Ticket, view: &'static str, node: Node) -> Commit {
        let mut current = self.current.lock().await;
        if !self.navigator.is_current(ticket) {
            self.metrics.record_stale_render();
            info!(
                event = "stale_render_discarded",
                message = "Dropping render superseded by a newer navigation",
                view = view,
                generation = self.navigator.generation()
            );
            return Commit::Stale;
        }
        let patches = diff(&current, &node);
        debug!(
            event = "render_committed",
            message = "Committed view tree",
            view = view,
            patches = patches.len()
        );
        *current = node;
        Commit::Applied(patches)
    }

    /// Full render cycle. `None` when the result arrived after a newer
    /// navigation.
    pub async fn render<F>(&self, view: &'static str, load: F) -> Option<Node>
    where
        F: Future<Output = Node>,
    {
        let ticket = self.begin().await;
        let node = load.await;
        match self.commit(ticket, view, node.clone()).await {
            Commit::Applied(_) => Some(node),
            Commit::Stale => None,
        }
    }
}
