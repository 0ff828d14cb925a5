//! Page use-case service.
//!
//! # Responsibility
//! - Provide the create/get/list/update/delete call contract for hosts.
//! - Resolve template instantiation on top of the repository.
//!
//! # Invariants
//! - Service APIs never bypass the repository's normalization boundary.
//! - Mutations return the full stored record via read-back.

use crate::model::page::{CreatePageData, Page, PageId, PageType, UpdatePageData};
use crate::repo::page_repo::{PageListQuery, PageRepository, RepoError, RepoResult};
use crate::service::template::{default_payload, is_template, payload_from_template, TEMPLATE_TAG};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for page use-cases.
#[derive(Debug)]
pub enum PageServiceError {
    /// Target page does not exist.
    PageNotFound(PageId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for PageServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageNotFound(id) => write!(f, "page not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent page state: {details}"),
        }
    }
}

impl Error for PageServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PageServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PageNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Page service facade over repository implementations.
pub struct PageService<R: PageRepository> {
    repo: R,
}

impl<R: PageRepository> PageService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a page and returns the full stored record.
    pub fn create_page(&self, data: &CreatePageData) -> Result<Page, PageServiceError> {
        let id = self.repo.create_page(data)?;
        info!(
            "event=page_create module=service status=ok page_id={} kind={}",
            id,
            data.kind.as_db_str()
        );
        self.repo
            .get_page(id)?
            .ok_or(PageServiceError::InconsistentState(
                "created page not found in read-back",
            ))
    }

    /// Gets one page by stable ID. Absence is a normal outcome.
    pub fn get_page(&self, id: PageId) -> RepoResult<Option<Page>> {
        self.repo.get_page(id)
    }

    /// Lists pages using composed filters and the requested sort order.
    pub fn list_pages(&self, query: &PageListQuery) -> RepoResult<Vec<Page>> {
        self.repo.list_pages(query)
    }

    /// Merges the provided fields into an existing page and returns the
    /// full updated record. Fails with `PageNotFound` for unknown ids.
    pub fn update_page(
        &self,
        id: PageId,
        data: &UpdatePageData,
    ) -> Result<Page, PageServiceError> {
        self.repo.update_page(id, data)?;
        info!("event=page_update module=service status=ok page_id={id}");
        self.repo
            .get_page(id)?
            .ok_or(PageServiceError::InconsistentState(
                "updated page not found in read-back",
            ))
    }

    /// Deletes a page. Deleting a missing id is a no-op, not an error.
    pub fn delete_page(&self, id: PageId) -> RepoResult<()> {
        self.repo.delete_page(id)?;
        info!("event=page_delete module=service status=ok page_id={id}");
        Ok(())
    }

    /// Returns the distinct tags in use, alphabetically sorted.
    pub fn list_tags(&self) -> RepoResult<Vec<String>> {
        self.repo.list_tags()
    }

    /// Lists pages carrying the template sentinel tag, newest-updated
    /// first, optionally restricted to one page type.
    pub fn list_templates(&self, kind: Option<PageType>) -> RepoResult<Vec<Page>> {
        self.repo.list_pages(&PageListQuery {
            kind,
            tags: vec![TEMPLATE_TAG.to_string()],
            ..PageListQuery::default()
        })
    }

    /// Creates a new page from a template.
    ///
    /// Resolution order: the referenced template when it exists, is a
    /// template and matches `kind`; otherwise the first stored template of
    /// that type; otherwise the built-in default payload. The template page
    /// itself is never mutated.
    pub fn create_from_template(
        &self,
        kind: PageType,
        template_id: Option<PageId>,
    ) -> Result<Page, PageServiceError> {
        if let Some(id) = template_id {
            if let Some(template) = self.repo.get_page(id)? {
                if is_template(&template) && template.kind == kind {
                    return self.create_page(&payload_from_template(&template));
                }
            }
        }

        let saved = self.list_templates(Some(kind))?;
        if let Some(template) = saved.first() {
            return self.create_page(&payload_from_template(template));
        }

        self.create_page(&default_payload(kind))
    }
}
