//! Core domain logic for Workspace Lite.
//! This crate is the single source of truth for page store invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::page::{
    CreatePageData, Page, PageId, PageType, SortBy, TaskPriority, TaskStatus, UpdatePageData,
};
pub use repo::page_repo::{
    PageListQuery, PageRepository, RepoError, RepoResult, SqlitePageRepository,
};
pub use search::substring::{search_pages, SearchError, SearchHit, SearchResult};
pub use service::page_service::{PageService, PageServiceError};
pub use service::template::TEMPLATE_TAG;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
