//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for articles.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod article_repo;
