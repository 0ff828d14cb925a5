//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the page store.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes normalize enum fields before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod page_repo;
