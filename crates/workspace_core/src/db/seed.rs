//! First-run example content.
//!
//! # Responsibility
//! - Insert the welcome doc and the example task when the page table is
//!   empty, so the store is never blank on first open.
//!
//! # Invariants
//! - Seeding runs only against an empty `pages` table; reopening a
//!   non-empty store inserts nothing.

use super::{now_epoch_ms, DbResult};
use log::info;
use rusqlite::{params, Connection};
use uuid::Uuid;

const WELCOME_DOC_TITLE: &str = "Welcome to Workspace Lite";
const WELCOME_DOC_CONTENT: &str = "\
# Welcome to Workspace Lite!

This is your personal offline workspace for notes, tasks and documentation.

## Notes

Capture ideas and reference material with Markdown formatting.

## Tasks

Track work with statuses (Backlog, In progress, Done), due dates and
priorities (Low, Med, High).

## Docs

Keep working documentation with an owner, a version label and an approval
state.

## Organization

Use **tags** to categorize pages and **pinning** to keep important pages at
the top of every list.

---

*All data stays local on this machine. Nothing syncs to the cloud.*";

const EXAMPLE_TASK_TITLE: &str = "Explore Workspace Lite";
const EXAMPLE_TASK_CONTENT: &str = "\
## Description

Get familiar with the basic features:

- [ ] Create a new note
- [ ] Add tags to a page
- [ ] Try the search
- [ ] Change this task's status

## Notes

Workspace Lite is fully offline. Everything lives in a local SQLite
database.";

/// Seeds fixed example content into an empty store.
pub(crate) fn seed_initial_pages(conn: &Connection) -> DbResult<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM pages;", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    let now = now_epoch_ms();

    conn.execute(
        "INSERT INTO pages (
            id, type, title, content, tags, pinned, created_at, updated_at,
            doc_owner, doc_version, doc_approved
         ) VALUES (?1, 'doc', ?2, ?3, ?4, 1, ?5, ?5, 'System', '1.0', 1);",
        params![
            Uuid::new_v4().to_string(),
            WELCOME_DOC_TITLE,
            WELCOME_DOC_CONTENT,
            serde_json::to_string(&["guide", "getting-started"]).unwrap_or_else(|_| "[]".into()),
            now,
        ],
    )?;

    // The task is created one second earlier so the pinned welcome doc leads
    // the default listing even before any tie-break.
    conn.execute(
        "INSERT INTO pages (
            id, type, title, content, tags, pinned, created_at, updated_at,
            task_status, task_priority
         ) VALUES (?1, 'task', ?2, ?3, ?4, 0, ?5, ?5, 'in_progress', 'high');",
        params![
            Uuid::new_v4().to_string(),
            EXAMPLE_TASK_TITLE,
            EXAMPLE_TASK_CONTENT,
            serde_json::to_string(&["example", "onboarding"]).unwrap_or_else(|_| "[]".into()),
            now - 1000,
        ],
    )?;

    info!("event=db_seed module=db status=ok pages=2");
    Ok(())
}
