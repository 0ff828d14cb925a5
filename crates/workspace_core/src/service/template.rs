//! Template derivation over sentinel-tagged pages.
//!
//! # Responsibility
//! - Define the reserved sentinel tag marking a page as a template.
//! - Turn a template page into a creation payload (sentinel stripped).
//! - Provide the built-in default payload per page type.
//!
//! # Invariants
//! - Instantiating a template never mutates the template page.
//! - The sentinel tag never survives into an instantiated page.

use crate::model::page::{CreatePageData, Page, PageType, TaskPriority, TaskStatus};

/// Reserved tag marking a page as a reusable template.
pub const TEMPLATE_TAG: &str = "_template";

/// Whether the page carries the template sentinel tag.
pub fn is_template(page: &Page) -> bool {
    page.tags.iter().any(|tag| tag == TEMPLATE_TAG)
}

/// Builds a creation payload copying a template page's title, content,
/// tags (minus the sentinel) and type-specific fields.
pub fn payload_from_template(template: &Page) -> CreatePageData {
    CreatePageData {
        kind: template.kind,
        title: template.title.clone(),
        content: Some(template.content.clone()),
        tags: Some(
            template
                .tags
                .iter()
                .filter(|tag| tag.as_str() != TEMPLATE_TAG)
                .cloned()
                .collect(),
        ),
        task_status: template.task_status.map(|status| status.as_db_str().to_string()),
        task_due_date: template.task_due_date,
        task_priority: template
            .task_priority
            .map(|priority| priority.as_db_str().to_string()),
        doc_owner: template.doc_owner.clone(),
        doc_version: template.doc_version.clone(),
        doc_approved: template.doc_approved,
    }
}

/// Built-in skeleton payload used when no stored template matches.
///
/// Resolved through a compile-time match on the page type rather than any
/// runtime lookup.
pub fn default_payload(kind: PageType) -> CreatePageData {
    match kind {
        PageType::Note => CreatePageData {
            content: Some("# Heading\n\nStart writing...".to_string()),
            ..CreatePageData::new(PageType::Note, "New note")
        },
        PageType::Task => CreatePageData {
            content: Some(
                "## Description\n\n...\n\n## Checklist\n\n- [ ] Item 1\n- [ ] Item 2"
                    .to_string(),
            ),
            task_status: Some(TaskStatus::Backlog.as_db_str().to_string()),
            task_priority: Some(TaskPriority::Med.as_db_str().to_string()),
            ..CreatePageData::new(PageType::Task, "New task")
        },
        PageType::Doc => CreatePageData {
            content: Some(
                "# Document title\n\n## Description\n\n...\n\n## Procedure\n\n1. Step 1\n2. Step 2"
                    .to_string(),
            ),
            doc_version: Some("1.0".to_string()),
            doc_approved: Some(false),
            ..CreatePageData::new(PageType::Doc, "New doc")
        },
    }
}
