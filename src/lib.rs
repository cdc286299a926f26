//! Taskline: a client library for a remote task service.
//!
//! Taskline keeps an in-memory mirror of one user's tasks, synchronized
//! against the service's HTTP API, plus the session (user identity and
//! persisted bearer token) that authorizes it. Local state only ever
//! reflects confirmed server responses; failures are surfaced as messages,
//! and a 401 from any endpoint evicts the stored token.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskline::{App, MemoryTokenStore, TaskDraft};
//!
//! async fn demo() -> eyre::Result<()> {
//!     let mut app = App::new("http://localhost:5000/api", Arc::new(MemoryTokenStore::new()));
//!
//!     // Authenticate; the token is persisted through the store.
//!     app.session.login_with_credentials("a@b.com", "hunter2").await?;
//!
//!     // Mirror the server's task list, then create a task.
//!     app.tasks.fetch_all().await;
//!     app.tasks.create(TaskDraft::new("Ship the release")).await;
//!
//!     if let Some(message) = app.tasks.error() {
//!         eprintln!("{}", message);
//!     }
//!     Ok(())
//! }
//! ```

mod app;
mod session;
mod tasks;
mod token;
mod types;

pub mod api;

// Re-export public API
pub use api::{ApiClient, ApiError, AuthResponse};
pub use app::App;
pub use session::SessionStore;
pub use tasks::{StatusFilter, TaskStats, TaskStore};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, mask_token};
pub use types::{Status, Task, TaskDraft, User, ValidationError};
