//! Search entry points.
//!
//! # Responsibility
//! - Expose substring search over page titles and content.
//! - Keep snippet shaping and highlight wrapping inside core.

pub mod substring;
