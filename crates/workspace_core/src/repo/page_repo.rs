//! Page repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `pages` storage.
//! - Compose filter predicates and sort orders for listing.
//! - Derive the tag catalogue from the persisted collection.
//!
//! # Invariants
//! - Enum payload fields are normalized at this write boundary: values
//!   outside the enumeration are stored as NULL, never rejected.
//! - `updated_at` strictly increases on every update of a page.
//! - Tag filtering is an exact membership test against the decoded tag
//!   list, never a substring test on the encoded column.

use crate::db::migrations::latest_version;
use crate::db::{now_epoch_ms, DbError};
use crate::model::page::{
    normalize_task_priority, normalize_task_status, CreatePageData, Page, PageId, PageType,
    SortBy, TaskPriority, TaskStatus, UpdatePageData,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PAGE_SELECT_SQL: &str = "SELECT
    id,
    type,
    title,
    content,
    tags,
    pinned,
    created_at,
    updated_at,
    task_status,
    task_due_date,
    task_priority,
    doc_owner,
    doc_version,
    doc_approved
FROM pages";

const REQUIRED_PAGE_COLUMNS: &[&str] = &[
    "id",
    "type",
    "title",
    "content",
    "tags",
    "pinned",
    "created_at",
    "updated_at",
    "task_status",
    "task_due_date",
    "task_priority",
    "doc_owner",
    "doc_version",
    "doc_approved",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for page persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(PageId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "page not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted page data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and sort options for listing pages.
///
/// All filter conditions are ANDed together; within `tags`, a page matches
/// when any requested tag is present (OR semantics across the list).
#[derive(Debug, Clone, Default)]
pub struct PageListQuery {
    pub kind: Option<PageType>,
    pub task_status: Option<TaskStatus>,
    pub tags: Vec<String>,
    pub sort: SortBy,
}

/// Repository interface for page CRUD, listing and tag derivation.
pub trait PageRepository {
    /// Creates a page and returns its fresh stable id.
    fn create_page(&self, data: &CreatePageData) -> RepoResult<PageId>;
    /// Gets one page by id. Absence is not an error.
    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>>;
    /// Lists pages using composed filters and the requested sort order.
    fn list_pages(&self, query: &PageListQuery) -> RepoResult<Vec<Page>>;
    /// Merges the fields present in `data` into an existing page.
    fn update_page(&self, id: PageId, data: &UpdatePageData) -> RepoResult<()>;
    /// Removes a page unconditionally. Deleting a missing id is a no-op.
    fn delete_page(&self, id: PageId) -> RepoResult<()>;
    /// Returns the distinct tags in use, alphabetically sorted.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed page repository.
pub struct SqlitePageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePageRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections that were not opened through `db::open_db`, so
    /// callers cannot reach page data before migrations succeed.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PageRepository for SqlitePageRepository<'_> {
    fn create_page(&self, data: &CreatePageData) -> RepoResult<PageId> {
        let id = Uuid::new_v4();
        let now = now_epoch_ms();
        let tags = encode_tags(data.tags.as_deref().unwrap_or(&[]))?;

        self.conn.execute(
            "INSERT INTO pages (
                id, type, title, content, tags, pinned, created_at, updated_at,
                task_status, task_due_date, task_priority,
                doc_owner, doc_version, doc_approved
             ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                id.to_string(),
                data.kind.as_db_str(),
                data.title.as_str(),
                data.content.as_deref().unwrap_or(""),
                tags,
                now,
                data.task_status
                    .as_deref()
                    .and_then(normalize_task_status)
                    .map(TaskStatus::as_db_str),
                data.task_due_date,
                data.task_priority
                    .as_deref()
                    .and_then(normalize_task_priority)
                    .map(|priority| priority.as_db_str()),
                data.doc_owner.as_deref(),
                data.doc_version.as_deref(),
                data.doc_approved.map(i64::from),
            ],
        )?;

        Ok(id)
    }

    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAGE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_page_row(row)?));
        }

        Ok(None)
    }

    fn list_pages(&self, query: &PageListQuery) -> RepoResult<Vec<Page>> {
        let mut sql = format!("{PAGE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.kind {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(kind.as_db_str().to_string()));
        }

        if let Some(status) = query.task_status {
            sql.push_str(" AND task_status = ?");
            bind_values.push(Value::Text(status.as_db_str().to_string()));
        }

        if !query.tags.is_empty() {
            // json_each gives an exact-token membership test over the decoded
            // tag array; substring matching on the encoded column would admit
            // partial-tag false positives.
            let placeholders = vec!["?"; query.tags.len()].join(", ");
            sql.push_str(&format!(
                " AND EXISTS (
                    SELECT 1 FROM json_each(pages.tags)
                    WHERE json_each.value IN ({placeholders})
                )"
            ));
            for tag in &query.tags {
                bind_values.push(Value::Text(tag.clone()));
            }
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(order_clause(query.sort));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pages = Vec::new();

        while let Some(row) = rows.next()? {
            pages.push(parse_page_row(row)?);
        }

        Ok(pages)
    }

    fn update_page(&self, id: PageId, data: &UpdatePageData) -> RepoResult<()> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = data.title.as_deref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.to_string()));
        }
        if let Some(content) = data.content.as_deref() {
            assignments.push("content = ?");
            bind_values.push(Value::Text(content.to_string()));
        }
        if let Some(tags) = data.tags.as_deref() {
            assignments.push("tags = ?");
            bind_values.push(Value::Text(encode_tags(tags)?));
        }
        if let Some(pinned) = data.pinned {
            assignments.push("pinned = ?");
            bind_values.push(Value::Integer(i64::from(pinned)));
        }
        if let Some(raw) = data.task_status.as_deref() {
            assignments.push("task_status = ?");
            bind_values.push(optional_text(
                normalize_task_status(raw).map(TaskStatus::as_db_str),
            ));
        }
        if let Some(due_date) = data.task_due_date {
            assignments.push("task_due_date = ?");
            bind_values.push(Value::Integer(due_date));
        }
        if let Some(raw) = data.task_priority.as_deref() {
            assignments.push("task_priority = ?");
            bind_values.push(optional_text(
                normalize_task_priority(raw).map(|priority| priority.as_db_str()),
            ));
        }
        if let Some(owner) = data.doc_owner.as_deref() {
            assignments.push("doc_owner = ?");
            bind_values.push(Value::Text(owner.to_string()));
        }
        if let Some(version) = data.doc_version.as_deref() {
            assignments.push("doc_version = ?");
            bind_values.push(Value::Text(version.to_string()));
        }
        if let Some(approved) = data.doc_approved {
            assignments.push("doc_approved = ?");
            bind_values.push(Value::Integer(i64::from(approved)));
        }

        // MAX against the previous value keeps updated_at strictly
        // increasing even when two updates land in the same millisecond.
        assignments.push("updated_at = MAX(?, updated_at + 1)");
        bind_values.push(Value::Integer(now_epoch_ms()));

        bind_values.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE pages SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_page(&self, id: PageId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM pages WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT tags FROM pages;")?;
        let mut rows = stmt.query([])?;
        let mut unique = BTreeSet::new();

        while let Some(row) = rows.next()? {
            let encoded: String = row.get(0)?;
            for tag in decode_tags(&encoded)? {
                unique.insert(tag);
            }
        }

        Ok(unique.into_iter().collect())
    }
}

fn order_clause(sort: SortBy) -> &'static str {
    // Pinned-first is the unconditional primary key in every mode; the
    // trailing id keeps equal rows in a stable order.
    match sort {
        SortBy::UpdatedAt => "pinned DESC, updated_at DESC, id ASC",
        SortBy::CreatedAt => "pinned DESC, created_at DESC, id ASC",
        SortBy::DueDate => {
            "pinned DESC, task_due_date ASC NULLS LAST, updated_at DESC, id ASC"
        }
        SortBy::Priority => {
            "pinned DESC,
             CASE task_priority
                WHEN 'high' THEN 1
                WHEN 'med' THEN 2
                WHEN 'low' THEN 3
                ELSE 4
             END ASC,
             updated_at DESC, id ASC"
        }
    }
}

fn optional_text(value: Option<&'static str>) -> Value {
    match value {
        Some(text) => Value::Text(text.to_string()),
        None => Value::Null,
    }
}

/// Encodes an ordered tag list into the JSON column representation.
pub fn encode_tags(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("unencodable tag list: {err}")))
}

/// Decodes the JSON tag column back into an ordered tag list.
pub fn decode_tags(encoded: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(encoded)
        .map_err(|err| RepoError::InvalidData(format!("invalid tags value `{encoded}`: {err}")))
}

fn parse_page_row(row: &Row<'_>) -> RepoResult<Page> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{id_text}` in pages.id")))?;

    let type_text: String = row.get("type")?;
    let kind = PageType::from_db_str(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid page type `{type_text}` in pages.type"))
    })?;

    let encoded_tags: String = row.get("tags")?;

    Ok(Page {
        id,
        kind,
        title: row.get("title")?,
        content: row.get("content")?,
        tags: decode_tags(&encoded_tags)?,
        pinned: row.get::<_, i64>("pinned")? != 0,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        // Stored enum columns are not trusted to be constrained; anything
        // out of range reads back as absent, mirroring the write boundary.
        task_status: row
            .get::<_, Option<String>>("task_status")?
            .as_deref()
            .and_then(TaskStatus::from_db_str),
        task_due_date: row.get("task_due_date")?,
        task_priority: row
            .get::<_, Option<String>>("task_priority")?
            .as_deref()
            .and_then(TaskPriority::from_db_str),
        doc_owner: row.get("doc_owner")?,
        doc_version: row.get("doc_version")?,
        doc_approved: row
            .get::<_, Option<i64>>("doc_approved")?
            .map(|value| value != 0),
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(|err| RepoError::Db(DbError::Sqlite(err)))?;
    let expected_version = latest_version();

    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "pages")? {
        return Err(RepoError::MissingRequiredTable("pages"));
    }

    for column in REQUIRED_PAGE_COLUMNS.iter().copied() {
        if !table_has_column(conn, "pages", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "pages",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
