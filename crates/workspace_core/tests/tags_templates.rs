use workspace_core::db::open_db_in_memory;
use workspace_core::{
    CreatePageData, PageRepository, PageService, PageType, SqlitePageRepository, TaskStatus,
    TEMPLATE_TAG,
};
use rusqlite::Connection;
use uuid::Uuid;

fn fresh_store() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute("DELETE FROM pages;", []).unwrap();
    conn
}

fn service(conn: &Connection) -> PageService<SqlitePageRepository<'_>> {
    PageService::new(SqlitePageRepository::try_new(conn).unwrap())
}

#[test]
fn tag_registry_is_deduplicated_and_sorted() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    repo.create_page(&CreatePageData {
        tags: Some(vec!["a".to_string(), "b".to_string()]),
        ..CreatePageData::new(PageType::Note, "one")
    })
    .unwrap();
    repo.create_page(&CreatePageData {
        tags: Some(vec!["b".to_string(), "c".to_string()]),
        ..CreatePageData::new(PageType::Note, "two")
    })
    .unwrap();

    assert_eq!(
        repo.list_tags().unwrap(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[test]
fn template_instantiation_strips_sentinel_and_assigns_fresh_id() {
    let conn = fresh_store();
    let service = service(&conn);

    let template = service
        .create_page(&CreatePageData {
            content: Some("template body".to_string()),
            tags: Some(vec!["work".to_string(), TEMPLATE_TAG.to_string()]),
            ..CreatePageData::new(PageType::Note, "weekly review")
        })
        .unwrap();

    let created = service
        .create_from_template(PageType::Note, Some(template.id))
        .unwrap();

    assert_ne!(created.id, template.id);
    assert_eq!(created.title, "weekly review");
    assert_eq!(created.content, "template body");
    assert_eq!(created.tags, vec!["work".to_string()]);

    // The template itself is untouched.
    let stored_template = service.get_page(template.id).unwrap().unwrap();
    assert_eq!(stored_template.tags, template.tags);
}

#[test]
fn mismatched_template_reference_falls_through() {
    let conn = fresh_store();
    let service = service(&conn);

    // A note-type template cannot satisfy a task-type request; with no
    // stored task template the built-in default applies.
    let note_template = service
        .create_page(&CreatePageData {
            tags: Some(vec![TEMPLATE_TAG.to_string()]),
            ..CreatePageData::new(PageType::Note, "note template")
        })
        .unwrap();

    let created = service
        .create_from_template(PageType::Task, Some(note_template.id))
        .unwrap();

    assert_eq!(created.kind, PageType::Task);
    assert_eq!(created.task_status, Some(TaskStatus::Backlog));
}

#[test]
fn missing_template_id_uses_first_stored_template_of_type() {
    let conn = fresh_store();
    let service = service(&conn);

    service
        .create_page(&CreatePageData {
            content: Some("stored task template".to_string()),
            tags: Some(vec![TEMPLATE_TAG.to_string()]),
            task_priority: Some("high".to_string()),
            ..CreatePageData::new(PageType::Task, "triage")
        })
        .unwrap();

    let created = service
        .create_from_template(PageType::Task, Some(Uuid::new_v4()))
        .unwrap();

    assert_eq!(created.title, "triage");
    assert_eq!(created.content, "stored task template");
    assert!(created.tags.is_empty());
}

#[test]
fn default_payloads_apply_when_no_template_exists() {
    let conn = fresh_store();
    let service = service(&conn);

    let task = service.create_from_template(PageType::Task, None).unwrap();
    assert_eq!(task.task_status, Some(TaskStatus::Backlog));
    assert_eq!(
        task.task_priority.map(|priority| priority.as_db_str()),
        Some("med")
    );

    let doc = service.create_from_template(PageType::Doc, None).unwrap();
    assert_eq!(doc.doc_version.as_deref(), Some("1.0"));
    assert_eq!(doc.doc_approved, Some(false));

    let note = service.create_from_template(PageType::Note, None).unwrap();
    assert_eq!(note.kind, PageType::Note);
    assert!(note.task_status.is_none());
}

#[test]
fn list_templates_honors_type_filter() {
    let conn = fresh_store();
    let service = service(&conn);

    let note_template = service
        .create_page(&CreatePageData {
            tags: Some(vec![TEMPLATE_TAG.to_string()]),
            ..CreatePageData::new(PageType::Note, "note template")
        })
        .unwrap();
    service
        .create_page(&CreatePageData {
            tags: Some(vec![TEMPLATE_TAG.to_string()]),
            ..CreatePageData::new(PageType::Task, "task template")
        })
        .unwrap();
    service
        .create_page(&CreatePageData::new(PageType::Note, "ordinary note"))
        .unwrap();

    let all = service.list_templates(None).unwrap();
    assert_eq!(all.len(), 2);

    let notes_only = service.list_templates(Some(PageType::Note)).unwrap();
    assert_eq!(notes_only.len(), 1);
    assert_eq!(notes_only[0].id, note_template.id);
}
