//! Application state: both stores over one shared API client.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::session::SessionStore;
use crate::tasks::TaskStore;
use crate::token::TokenStore;

/// Composition root owning the session and task stores. There is no global
/// state; embedders construct one of these and pass it where needed.
pub struct App {
    pub session: SessionStore,
    pub tasks: TaskStore,
}

impl App {
    /// Build the stores over a shared client for the service at `base_url`,
    /// persisting the session token through the given store.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        let client = Arc::new(ApiClient::new(base_url, tokens));
        Self {
            session: SessionStore::new(Arc::clone(&client)),
            tasks: TaskStore::new(client),
        }
    }

    /// Log out and drop the local task list.
    pub fn logout(&mut self) {
        self.session.logout();
        self.tasks.clear_local();
    }
}
