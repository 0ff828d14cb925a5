use workspace_core::db::open_db_in_memory;
use workspace_core::{
    CreatePageData, PageId, PageListQuery, PageRepository, PageType, SortBy,
    SqlitePageRepository, TaskStatus, UpdatePageData,
};
use rusqlite::{params, Connection};

fn fresh_store() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute("DELETE FROM pages;", []).unwrap();
    conn
}

fn set_updated_at(conn: &Connection, id: PageId, value: i64) {
    conn.execute(
        "UPDATE pages SET updated_at = ?1 WHERE id = ?2;",
        params![value, id.to_string()],
    )
    .unwrap();
}

#[test]
fn type_filter_returns_exactly_matching_pages() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    repo.create_page(&CreatePageData::new(PageType::Note, "note"))
        .unwrap();
    let task_id = repo
        .create_page(&CreatePageData::new(PageType::Task, "task"))
        .unwrap();
    repo.create_page(&CreatePageData::new(PageType::Doc, "doc"))
        .unwrap();

    let tasks = repo
        .list_pages(&PageListQuery {
            kind: Some(PageType::Task),
            ..PageListQuery::default()
        })
        .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id);
}

#[test]
fn task_status_filter_composes_with_type_filter() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let done_id = repo
        .create_page(&CreatePageData {
            task_status: Some("done".to_string()),
            ..CreatePageData::new(PageType::Task, "done task")
        })
        .unwrap();
    repo.create_page(&CreatePageData {
        task_status: Some("backlog".to_string()),
        ..CreatePageData::new(PageType::Task, "open task")
    })
    .unwrap();

    let done = repo
        .list_pages(&PageListQuery {
            kind: Some(PageType::Task),
            task_status: Some(TaskStatus::Done),
            ..PageListQuery::default()
        })
        .unwrap();

    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, done_id);
}

#[test]
fn tag_filter_uses_or_semantics_and_exact_membership() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let work_id = repo
        .create_page(&CreatePageData {
            tags: Some(vec!["work".to_string()]),
            ..CreatePageData::new(PageType::Note, "work note")
        })
        .unwrap();
    let home_id = repo
        .create_page(&CreatePageData {
            tags: Some(vec!["home".to_string()]),
            ..CreatePageData::new(PageType::Note, "home note")
        })
        .unwrap();
    // "workshop" contains "work" as a substring; an exact membership test
    // must not match it.
    repo.create_page(&CreatePageData {
        tags: Some(vec!["workshop".to_string()]),
        ..CreatePageData::new(PageType::Note, "workshop note")
    })
    .unwrap();

    let matched = repo
        .list_pages(&PageListQuery {
            tags: vec!["work".to_string(), "home".to_string()],
            ..PageListQuery::default()
        })
        .unwrap();

    let ids: Vec<PageId> = matched.iter().map(|page| page.id).collect();
    assert_eq!(matched.len(), 2);
    assert!(ids.contains(&work_id));
    assert!(ids.contains(&home_id));
}

#[test]
fn priority_sort_orders_high_med_low() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let mut ids = Vec::new();
    for priority in ["high", "low", "med"] {
        let id = repo
            .create_page(&CreatePageData {
                task_priority: Some(priority.to_string()),
                ..CreatePageData::new(PageType::Task, priority)
            })
            .unwrap();
        ids.push(id);
    }

    let sorted = repo
        .list_pages(&PageListQuery {
            sort: SortBy::Priority,
            ..PageListQuery::default()
        })
        .unwrap();

    let titles: Vec<&str> = sorted.iter().map(|page| page.title.as_str()).collect();
    assert_eq!(titles, vec!["high", "med", "low"]);
}

#[test]
fn priority_sort_places_missing_priority_last() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    repo.create_page(&CreatePageData::new(PageType::Task, "no priority"))
        .unwrap();
    repo.create_page(&CreatePageData {
        task_priority: Some("low".to_string()),
        ..CreatePageData::new(PageType::Task, "low")
    })
    .unwrap();

    let sorted = repo
        .list_pages(&PageListQuery {
            sort: SortBy::Priority,
            ..PageListQuery::default()
        })
        .unwrap();

    assert_eq!(sorted[0].title, "low");
    assert_eq!(sorted[1].title, "no priority");
}

#[test]
fn due_date_sort_ascending_with_missing_dates_last() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    repo.create_page(&CreatePageData {
        task_due_date: Some(3000),
        ..CreatePageData::new(PageType::Task, "later")
    })
    .unwrap();
    repo.create_page(&CreatePageData {
        task_due_date: Some(1000),
        ..CreatePageData::new(PageType::Task, "sooner")
    })
    .unwrap();
    repo.create_page(&CreatePageData::new(PageType::Task, "undated"))
        .unwrap();

    let sorted = repo
        .list_pages(&PageListQuery {
            sort: SortBy::DueDate,
            ..PageListQuery::default()
        })
        .unwrap();

    let titles: Vec<&str> = sorted.iter().map(|page| page.title.as_str()).collect();
    assert_eq!(titles, vec!["sooner", "later", "undated"]);
}

#[test]
fn due_date_sort_breaks_ties_by_updated_at_descending() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let stale_id = repo
        .create_page(&CreatePageData {
            task_due_date: Some(5000),
            ..CreatePageData::new(PageType::Task, "stale")
        })
        .unwrap();
    let fresh_id = repo
        .create_page(&CreatePageData {
            task_due_date: Some(5000),
            ..CreatePageData::new(PageType::Task, "fresh")
        })
        .unwrap();
    set_updated_at(&conn, stale_id, 1000);
    set_updated_at(&conn, fresh_id, 2000);

    let sorted = repo
        .list_pages(&PageListQuery {
            sort: SortBy::DueDate,
            ..PageListQuery::default()
        })
        .unwrap();

    assert_eq!(sorted[0].id, fresh_id);
    assert_eq!(sorted[1].id, stale_id);
}

#[test]
fn priority_sort_breaks_ties_by_updated_at_descending() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let stale_id = repo
        .create_page(&CreatePageData {
            task_priority: Some("high".to_string()),
            ..CreatePageData::new(PageType::Task, "stale high")
        })
        .unwrap();
    let fresh_id = repo
        .create_page(&CreatePageData {
            task_priority: Some("high".to_string()),
            ..CreatePageData::new(PageType::Task, "fresh high")
        })
        .unwrap();
    set_updated_at(&conn, stale_id, 1000);
    set_updated_at(&conn, fresh_id, 2000);

    let sorted = repo
        .list_pages(&PageListQuery {
            sort: SortBy::Priority,
            ..PageListQuery::default()
        })
        .unwrap();

    assert_eq!(sorted[0].id, fresh_id);
    assert_eq!(sorted[1].id, stale_id);
}

#[test]
fn pinned_pages_sort_first_in_every_mode() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let pinned_id = repo
        .create_page(&CreatePageData::new(PageType::Note, "pinned"))
        .unwrap();
    repo.update_page(
        pinned_id,
        &UpdatePageData {
            pinned: Some(true),
            ..UpdatePageData::default()
        },
    )
    .unwrap();

    let recent_id = repo
        .create_page(&CreatePageData::new(PageType::Note, "recent"))
        .unwrap();
    // The unpinned page is touched last and so carries the newest
    // updated_at; pinning must still win.
    set_updated_at(&conn, pinned_id, 1000);
    set_updated_at(&conn, recent_id, 2000);

    for sort in [SortBy::UpdatedAt, SortBy::CreatedAt, SortBy::DueDate, SortBy::Priority] {
        let sorted = repo
            .list_pages(&PageListQuery {
                sort,
                ..PageListQuery::default()
            })
            .unwrap();
        assert_eq!(sorted[0].id, pinned_id, "pinned page must lead {sort:?}");
    }
}

#[test]
fn updated_at_sort_is_descending() {
    let conn = fresh_store();
    let repo = SqlitePageRepository::try_new(&conn).unwrap();

    let older_id = repo
        .create_page(&CreatePageData::new(PageType::Note, "older"))
        .unwrap();
    let newer_id = repo
        .create_page(&CreatePageData::new(PageType::Note, "newer"))
        .unwrap();
    set_updated_at(&conn, older_id, 1000);
    set_updated_at(&conn, newer_id, 2000);

    let sorted = repo.list_pages(&PageListQuery::default()).unwrap();
    assert_eq!(sorted[0].id, newer_id);
    assert_eq!(sorted[1].id, older_id);
}
