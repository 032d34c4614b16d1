use crate::core::api::ApiClient;
use crate::models::StatusResponse;
use crate::render::{el, Node};
use crate::utils::error::Result;
use tracing::error;

/// Coordinator health as shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Online,
    Offline,
    Error,
}

impl StatusIndicator {
    /// Online only when the coordinator's message reports itself healthy.
    pub fn from_response(response: Result<StatusResponse>) -> Self {
        match response {
            Ok(status) if status.message().is_some_and(|m| m.contains("healthy")) => StatusIndicator::Online,
            Ok(_) => StatusIndicator::Offline,
            Err(e) => {
                error!(
                    event = "status_error",
                    message = "Error fetching coordinator status",
                    error = %e
                );
                StatusIndicator::Error
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusIndicator::Online => "Online",
            StatusIndicator::Offline => "Offline",
            StatusIndicator::Error => "Error",
        }
    }

    pub fn to_node(self) -> Node {
        let color = match self {
            StatusIndicator::Online => "text-green-500",
            StatusIndicator::Offline | StatusIndicator::Error => "text-red-500",
        };
        el("div")
            .id("status-indicator")
            .class("flex items-center text-sm font-semibold")
            .child(el("i").class(&format!("fas fa-circle mr-2 {}", color)))
            .child(el("span").text(self.label()))
            .into()
    }
}

pub async fn load(api: &ApiClient) -> StatusIndicator {
    StatusIndicator::from_response(api.status().await)
}
