//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep host layers decoupled from storage details.

pub mod page_service;
pub mod template;
