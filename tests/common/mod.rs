//! Shared test infrastructure for Taskline integration tests.
//!
//! Provides a TestEnv wiring the stores to a wiremock server with an
//! in-memory token store.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use taskline::{App, MemoryTokenStore, TokenStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test environment: stores wired to a mock task service.
pub struct TestEnv {
    pub server: MockServer,
    pub app: App,
    pub tokens: Arc<MemoryTokenStore>,
}

impl TestEnv {
    /// Start a mock server and build the stores against it.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let tokens = Arc::new(MemoryTokenStore::new());
        let app = App::new(server.uri(), Arc::clone(&tokens) as Arc<dyn TokenStore>);
        Self {
            server,
            app,
            tokens,
        }
    }

    /// Start with a persisted token already in place.
    pub async fn authenticated(token: &str) -> Self {
        let env = Self::new().await;
        env.tokens.save(token).expect("Failed to seed token");
        env
    }

    /// The currently persisted token, if any.
    pub fn token(&self) -> Option<String> {
        self.tokens.load().expect("Failed to load token")
    }

    /// Mount GET /tasks returning the given list.
    pub async fn mock_task_list(&self, tasks: &[Value]) {
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(tasks)))
            .mount(&self.server)
            .await;
    }

    /// Fetch the given list into the local store.
    pub async fn seed_tasks(&mut self, tasks: &[Value]) {
        self.mock_task_list(tasks).await;
        self.app.tasks.fetch_all().await;
        assert_eq!(self.app.tasks.error(), None, "seeding tasks failed");
        assert_eq!(self.app.tasks.tasks().len(), tasks.len());
    }
}

/// Minimal task JSON in the service's wire format.
pub fn task_json(id: &str, title: &str, status: &str) -> Value {
    json!({ "_id": id, "title": title, "status": status })
}

/// Task JSON with description and due date.
pub fn full_task_json(
    id: &str,
    title: &str,
    description: &str,
    due_date: &str,
    status: &str,
) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": description,
        "dueDate": due_date,
        "status": status,
    })
}

/// User JSON in the service's wire format.
pub fn user_json(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "email": format!("{}@example.com", name.to_lowercase()) })
}

/// `{token, user}` body returned by login and registration.
pub fn auth_json(token: &str, user: Value) -> Value {
    json!({ "token": token, "user": user })
}

/// `{"message": ...}` error body used by the service.
pub fn error_json(message: &str) -> Value {
    json!({ "message": message })
}
