//! Task list state, synchronized with the task service.
//!
//! The local list is a mirror of confirmed server responses: every mutation
//! goes through a round trip and the list is only touched with what the
//! server returned. Remote failures are captured as a message in
//! [`error`](TaskStore::error), never propagated to the caller.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::debug;

use crate::api::{ApiClient, ApiError, surface};
use crate::types::{Status, Task, TaskDraft};

/// Status filter for client-side list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Open,
    Complete,
}

impl StatusFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => task.status == Status::Open,
            StatusFilter::Complete => task.status == Status::Complete,
        }
    }
}

/// Open/Complete/overdue counts over the local list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub open: usize,
    pub complete: usize,
    pub overdue: usize,
}

/// In-memory task list for the current user.
pub struct TaskStore {
    client: Arc<ApiClient>,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl TaskStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// The current local task list, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Find a local task by identifier.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// True while a remote operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed operation, cleared on the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the local list with the server's full list.
    pub async fn fetch_all(&mut self) {
        self.begin();
        match self.client.get_json::<Vec<Task>>("/tasks").await {
            Ok(tasks) => {
                debug!("fetched {} tasks", tasks.len());
                self.tasks = tasks;
                self.finish(None);
            }
            Err(e) => self.finish(Some(surface(&e, "Failed to fetch tasks"))),
        }
    }

    /// Create a task from a draft and prepend the server's representation.
    /// An empty title is rejected before any network call; the list is left
    /// untouched.
    pub async fn create(&mut self, draft: TaskDraft) {
        if let Err(e) = draft.validate() {
            self.error = Some(ApiError::Validation(e).to_string());
            return;
        }

        self.begin();
        match self.client.post_json::<_, Task>("/tasks", &draft).await {
            Ok(task) => {
                debug!("created task {}", task.id);
                self.tasks.insert(0, task);
                self.finish(None);
            }
            Err(e) => self.finish(Some(surface(&e, "Failed to create task"))),
        }
    }

    /// Replace the task with `id` by PUTting the full representation and
    /// mirroring the server response. No-op when `id` is not in the local
    /// list.
    pub async fn update(&mut self, id: &str, draft: TaskDraft) {
        if self.get(id).is_none() {
            debug!("update skipped, {} not in local list", id);
            return;
        }
        if let Err(e) = draft.validate() {
            self.error = Some(ApiError::Validation(e).to_string());
            return;
        }

        self.begin();
        match self
            .client
            .put_json::<_, Task>(&format!("/tasks/{}", id), &draft)
            .await
        {
            Ok(task) => {
                debug!("updated task {}", task.id);
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *slot = task;
                }
                self.finish(None);
            }
            Err(e) => self.finish(Some(surface(&e, "Failed to update task"))),
        }
    }

    /// Delete the task remotely and drop it from the local list. Deleting an
    /// identifier the server no longer knows is not an error here.
    pub async fn remove(&mut self, id: &str) {
        self.begin();
        match self.client.delete(&format!("/tasks/{}", id)).await {
            Ok(()) => {
                debug!("removed task {}", id);
                self.tasks.retain(|t| t.id != id);
                self.finish(None);
            }
            Err(e) => self.finish(Some(surface(&e, "Failed to delete task"))),
        }
    }

    /// Flip a task between Open and Complete without touching other fields.
    /// No-op when `id` is not in the local list.
    pub async fn toggle_status(&mut self, id: &str) {
        let Some(task) = self.get(id) else {
            debug!("toggle skipped, {} not in local list", id);
            return;
        };

        let mut draft = task.to_draft();
        draft.status = draft.status.toggled();
        self.update(id, draft).await;
    }

    /// Drop the local list without touching the server (logout path).
    pub fn clear_local(&mut self) {
        self.tasks.clear();
        self.error = None;
    }

    /// Counts over the local list, with overdue judged against today.
    pub fn stats(&self) -> TaskStats {
        self.stats_at(Utc::now().date_naive())
    }

    /// Counts over the local list, with overdue judged against `today`.
    pub fn stats_at(&self, today: NaiveDate) -> TaskStats {
        let mut stats = TaskStats::default();
        for task in &self.tasks {
            match task.status {
                Status::Open => stats.open += 1,
                Status::Complete => stats.complete += 1,
            }
            if task.is_overdue(today) {
                stats.overdue += 1;
            }
        }
        stats
    }

    /// Local view filtered by a case-insensitive title/description search
    /// and a status filter.
    pub fn filtered(&self, query: &str, filter: StatusFilter) -> Vec<&Task> {
        let query = query.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| filter.matches(t))
            .filter(|t| {
                query.is_empty()
                    || t.title.to_lowercase().contains(&query)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&query))
            })
            .collect()
    }

    fn begin(&mut self) {
        self.loading = true;
    }

    fn finish(&mut self, error: Option<String>) {
        self.loading = false;
        self.error = error;
    }
}
