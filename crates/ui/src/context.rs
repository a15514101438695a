use std::sync::Arc;

use client::{SyncService, ToggleService};
use prep_core::model::{Problem, TopicId};

/// Everything the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn topic_id(&self) -> TopicId;
    fn topic_title(&self) -> String;

    /// The problems listed on the current page, in row order.
    fn roster(&self) -> Vec<Problem>;

    fn toggle_service(&self) -> Arc<ToggleService>;
    fn sync_service(&self) -> Arc<SyncService>;
}

#[derive(Clone)]
pub struct AppContext {
    topic_id: TopicId,
    topic_title: String,
    roster: Vec<Problem>,

    toggles: Arc<ToggleService>,
    sync: Arc<SyncService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            topic_id: app.topic_id(),
            topic_title: app.topic_title(),
            roster: app.roster(),
            toggles: app.toggle_service(),
            sync: app.sync_service(),
        }
    }

    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    #[must_use]
    pub fn topic_title(&self) -> &str {
        &self.topic_title
    }

    #[must_use]
    pub fn roster(&self) -> Vec<Problem> {
        self.roster.clone()
    }

    #[must_use]
    pub fn toggle_service(&self) -> Arc<ToggleService> {
        Arc::clone(&self.toggles)
    }

    #[must_use]
    pub fn sync_service(&self) -> Arc<SyncService> {
        Arc::clone(&self.sync)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
