//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `workspace_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use workspace_core::db::open_db_in_memory;
use workspace_core::{PageListQuery, PageRepository, SqlitePageRepository};

fn main() {
    println!("workspace_core version={}", workspace_core::core_version());

    // Open a throwaway in-memory store to confirm schema bootstrap and the
    // first-run seed end to end.
    match open_db_in_memory() {
        Ok(conn) => match SqlitePageRepository::try_new(&conn)
            .and_then(|repo| repo.list_pages(&PageListQuery::default()))
        {
            Ok(pages) => println!("workspace_core seeded_pages={}", pages.len()),
            Err(err) => eprintln!("workspace_core store_error={err}"),
        },
        Err(err) => eprintln!("workspace_core open_error={err}"),
    }
}
