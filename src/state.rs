use crate::chat::ChatClient;
use crate::storage::HydrationRepository;
use crate::views::ViewRenderer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn HydrationRepository>,
    pub chat: ChatClient,
    pub views: ViewRenderer,
    /// Where add and repeat results are posted.
    pub result_channel: String,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn HydrationRepository>,
        chat: ChatClient,
        views: ViewRenderer,
        result_channel: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            chat,
            views,
            result_channel: result_channel.into(),
        }
    }
}
