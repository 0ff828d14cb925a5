//! Domain model for the Workspace Lite page store.
//!
//! # Responsibility
//! - Define the canonical `Page` record shared by note/task/doc views.
//! - Define write payloads and the enum leniency policy applied at the
//!   write boundary.
//!
//! # Invariants
//! - Every page is identified by a stable `PageId`.
//! - `updated_at >= created_at` at all times; `created_at` never changes.

pub mod page;
