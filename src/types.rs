//! Core data types for the Taskline client.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user-owned unit of work, as returned by the task service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Server-generated identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Short description of the work (required, non-empty)
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional due date (date only, no time component)
    #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Current state
    pub status: Status,

    /// When created (server clock)
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification (server clock)
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// True if the task is still open and its due date is strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == Status::Open && self.due_date.is_some_and(|due| due < today)
    }

    /// Full representation of this task as a draft, for PUT round trips.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            status: self.status,
        }
    }
}

/// Task completion states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Open,
    Complete,
}

impl Status {
    /// The opposite status (Open↔Complete).
    pub fn toggled(&self) -> Status {
        match self {
            Status::Open => Status::Complete,
            Status::Complete => Status::Open,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Open => write!(f, "Open"),
            Status::Complete => write!(f, "Complete"),
        }
    }
}

/// Body for creating or fully replacing a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDraft {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    pub status: Status,
}

impl TaskDraft {
    /// A new open draft with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            status: Status::Open,
        }
    }

    /// Validate the draft's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self::new("")
    }
}

/// The authenticated user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Avatar URL, set for OAuth accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Client-side validation errors, raised before any network call.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyTitle,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}
