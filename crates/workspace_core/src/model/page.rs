//! Page domain model.
//!
//! # Responsibility
//! - Define the canonical record covering note/task/doc pages.
//! - Provide db-string conversions for the closed enumerations.
//! - Express the enum leniency policy: out-of-range values normalize to
//!   absent instead of failing the write.
//!
//! # Invariants
//! - `id` is stable and never reused for another page.
//! - `kind` is immutable after creation.
//! - Task/doc fields are meaningful only for the matching `kind`, but the
//!   store persists them for any page and must tolerate that on read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every page in the store.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PageId = Uuid;

/// Category of a page. Immutable once the page is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    /// Free-form markdown note.
    Note,
    /// Status-tracked task with due date and priority metadata.
    Task,
    /// Versioned document with owner and approval metadata.
    Doc,
}

impl PageType {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Task => "task",
            Self::Doc => "doc",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "note" => Some(Self::Note),
            "task" => Some(Self::Task),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }
}

/// Task lifecycle state for `PageType::Task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Backlog,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "backlog" => Some(Self::Backlog),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Task priority for `PageType::Task`. Ordering for the priority sort is
/// high first, then med, then low, then pages without a priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Med,
    High,
}

impl TaskPriority {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "med" => Some(Self::Med),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Sort modes for page listing. Pinned pages always sort first regardless
/// of the chosen mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most recently updated first.
    #[default]
    UpdatedAt,
    /// Most recently created first.
    CreatedAt,
    /// Earliest due date first; pages without a due date sort last.
    DueDate,
    /// Highest priority first; pages without a priority sort last.
    Priority,
}

/// Canonical page record as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Stable global ID.
    pub id: PageId,
    /// Serialized as `type` to match the storage schema naming.
    #[serde(rename = "type")]
    pub kind: PageType,
    /// Display title. Required, but may be the empty string.
    pub title: String,
    /// Free-form formatted text. The core never parses it.
    pub content: String,
    /// Ordered tag list. The store does not deduplicate entries.
    pub tags: Vec<String>,
    /// Pinned pages sort before unpinned pages in every sort mode.
    pub pinned: bool,
    /// Unix epoch milliseconds. Set once at creation.
    pub created_at: i64,
    /// Unix epoch milliseconds. Bumped on every update; never below
    /// `created_at`.
    pub updated_at: i64,
    /// Meaningful only when `kind == PageType::Task`.
    pub task_status: Option<TaskStatus>,
    /// Due date in epoch milliseconds. Task pages only.
    pub task_due_date: Option<i64>,
    /// Meaningful only when `kind == PageType::Task`.
    pub task_priority: Option<TaskPriority>,
    /// Responsible person. Doc pages only.
    pub doc_owner: Option<String>,
    /// Document version label. Doc pages only.
    pub doc_version: Option<String>,
    /// Approval state. Doc pages only.
    pub doc_approved: Option<bool>,
}

/// Creation payload. Omitted optional fields default to absent; `content`
/// defaults to empty and `tags` to the empty list.
///
/// The `task_status`/`task_priority` fields carry raw caller input and are
/// normalized at the write boundary: anything outside the enumeration is
/// stored as absent, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePageData {
    #[serde(rename = "type")]
    pub kind: PageType,
    pub title: String,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub task_status: Option<String>,
    pub task_due_date: Option<i64>,
    pub task_priority: Option<String>,
    pub doc_owner: Option<String>,
    pub doc_version: Option<String>,
    pub doc_approved: Option<bool>,
}

impl CreatePageData {
    /// Creates a payload with every optional field absent.
    pub fn new(kind: PageType, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: None,
            tags: None,
            task_status: None,
            task_due_date: None,
            task_priority: None,
            doc_owner: None,
            doc_version: None,
            doc_approved: None,
        }
    }
}

/// Partial update payload. `None` means "leave the field untouched".
///
/// Enum fields carry raw caller input; a present-but-invalid value is
/// normalized to absent in storage (leniency policy, not an error).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePageData {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
    pub task_status: Option<String>,
    pub task_due_date: Option<i64>,
    pub task_priority: Option<String>,
    pub doc_owner: Option<String>,
    pub doc_version: Option<String>,
    pub doc_approved: Option<bool>,
}

/// Normalizes a raw task status string per the leniency policy.
pub fn normalize_task_status(raw: &str) -> Option<TaskStatus> {
    TaskStatus::from_db_str(raw)
}

/// Normalizes a raw task priority string per the leniency policy.
pub fn normalize_task_priority(raw: &str) -> Option<TaskPriority> {
    TaskPriority::from_db_str(raw)
}
