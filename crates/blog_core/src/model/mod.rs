//! Domain model for blog articles.
//!
//! # Responsibility
//! - Define the candidate and persisted article shapes.
//! - Own the required-field validation rules.
//!
//! # Invariants
//! - `title` and `body` must be present before anything is persisted.
//! - `active` is always a concrete boolean; absence defaults to `true`.

pub mod article;
