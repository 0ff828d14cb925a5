//! Case-insensitive substring search with highlighted snippets.
//!
//! # Responsibility
//! - Match the query against page titles and content.
//! - Rank title matches ahead of content-only matches.
//! - Build a bounded excerpt around the first content match with every
//!   occurrence of the query wrapped in a highlight marker.
//!
//! # Invariants
//! - Queries shorter than 2 characters (after trimming) return no hits.
//! - The result set is capped at 20 entries.
//! - Within a rank, hits are ordered by `updated_at` descending.
//!
//! Matching, ranking and highlighting all go through one case-insensitive
//! matcher so SQL `LOWER()` ASCII folding cannot disagree with the
//! highlight pass.

use crate::db::DbError;
use crate::model::page::{PageId, PageType};
use regex::{Regex, RegexBuilder};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MIN_QUERY_CHARS: usize = 2;
const RESULT_LIMIT: usize = 20;
const SNIPPET_CONTEXT_CHARS: usize = 30;
const TITLE_ONLY_SNIPPET_CHARS: usize = 100;
const ELLIPSIS: &str = "...";
const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for matcher construction, DB interaction and result
/// decoding.
#[derive(Debug)]
pub enum SearchError {
    /// The query cannot be compiled into a matcher (e.g. over the size
    /// limit).
    InvalidQuery { query: String, message: String },
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid search query `{query}`: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid search row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for SearchError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Single search hit returned by [`search_pages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub page_id: PageId,
    pub title: String,
    pub kind: PageType,
    pub snippet: String,
}

/// Searches pages by case-insensitive substring containment over title and
/// content.
///
/// Title matches rank ahead of content-only matches; within each rank the
/// order is `updated_at` descending. Returns an empty list for queries
/// shorter than 2 characters after trimming.
pub fn search_pages(conn: &Connection, query: &str) -> SearchResult<Vec<SearchHit>> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return Ok(Vec::new());
    }

    let matcher = build_matcher(trimmed)?;

    let mut stmt = conn.prepare(
        "SELECT id, type, title, content
         FROM pages
         ORDER BY updated_at DESC, id ASC;",
    )?;
    let mut rows = stmt.query([])?;

    // Rows already arrive in updated_at order; a stable sort on rank alone
    // keeps that order inside each rank. Snippets are built only for the
    // rows that survive the cap.
    let mut ranked: Vec<(u8, PageId, PageType, String, String)> = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get("id")?;
        let page_id = Uuid::parse_str(&id_text)
            .map_err(|_| SearchError::InvalidData(format!("invalid id `{id_text}`")))?;

        let type_text: String = row.get("type")?;
        let kind = PageType::from_db_str(&type_text)
            .ok_or_else(|| SearchError::InvalidData(format!("invalid type `{type_text}`")))?;

        let title: String = row.get("title")?;
        let content: String = row.get("content")?;

        let title_match = matcher.is_match(&title);
        if !title_match && !matcher.is_match(&content) {
            continue;
        }

        let rank = if title_match { 0 } else { 1 };
        ranked.push((rank, page_id, kind, title, content));
    }

    ranked.sort_by_key(|(rank, ..)| *rank);
    ranked.truncate(RESULT_LIMIT);

    Ok(ranked
        .into_iter()
        .map(|(_, page_id, kind, title, content)| SearchHit {
            page_id,
            title,
            kind,
            snippet: build_snippet(&content, &matcher),
        })
        .collect())
}

fn build_matcher(query: &str) -> SearchResult<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|err| SearchError::InvalidQuery {
            query: query.to_string(),
            message: err.to_string(),
        })
}

/// Builds the excerpt for one hit.
///
/// With a content match: a window of up to 30 characters before the match
/// and 30 after it, ellipsized at clipped edges, with every occurrence of
/// the query inside the window wrapped in the highlight marker. Without
/// one (title-only hit): the first 100 characters of content, ellipsized
/// when longer.
fn build_snippet(content: &str, matcher: &Regex) -> String {
    let Some(found) = matcher.find(content) else {
        return leading_excerpt(content);
    };

    let total_chars = content.chars().count();
    let match_start = content[..found.start()].chars().count();
    let match_chars = found.as_str().chars().count();

    let window_start = match_start.saturating_sub(SNIPPET_CONTEXT_CHARS);
    let window_end = (match_start + match_chars + SNIPPET_CONTEXT_CHARS).min(total_chars);

    let window: String = content
        .chars()
        .skip(window_start)
        .take(window_end - window_start)
        .collect();
    let replacement = format!("{MARK_OPEN}${{0}}{MARK_CLOSE}");
    let highlighted = matcher.replace_all(&window, replacement.as_str());

    let mut snippet = String::new();
    if window_start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&highlighted);
    if window_end < total_chars {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

fn leading_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(TITLE_ONLY_SNIPPET_CHARS).collect();
    if content.chars().count() > TITLE_ONLY_SNIPPET_CHARS {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt
}
