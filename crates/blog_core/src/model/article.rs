//! Article domain model and validation.
//!
//! # Responsibility
//! - Define `NewArticle` (candidate), `Article` (persisted) and
//!   `ArticleParams` (submitted form fields).
//! - Validate presence of `title` and `body`.
//!
//! # Invariants
//! - A value is present when it is non-empty after trimming whitespace.
//! - Validation messages read `"<Field> can't be blank"`.
//! - Defaults are applied before validation runs.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-generated article identifier.
pub type ArticleId = i64;

/// Validated article fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleField {
    Title,
    Body,
}

impl ArticleField {
    /// Form/column name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
        }
    }

    /// Human-readable label used in messages and form labels.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Body => "Body",
        }
    }
}

/// One failed check on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ArticleField,
    pub message: String,
}

/// Structured validation failure, keyed by field.
///
/// Errors are kept in field declaration order (title before body) so that
/// rendered messages are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleValidationError {
    errors: Vec<FieldError>,
}

impl ArticleValidationError {
    fn blank(&mut self, field: ArticleField) {
        self.errors.push(FieldError {
            field,
            message: format!("{} can't be blank", field.label()),
        });
    }

    /// Messages recorded for one field.
    pub fn on(&self, field: ArticleField) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.message.as_str())
            .collect()
    }

    /// All messages in field order.
    pub fn full_messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .map(|error| error.message.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Display for ArticleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl Error for ArticleValidationError {}

/// Checks the required-field rules shared by candidates and persisted rows.
pub fn validate_presence(title: &str, body: &str) -> Result<(), ArticleValidationError> {
    let mut error = ArticleValidationError::default();
    if is_blank(title) {
        error.blank(ArticleField::Title);
    }
    if is_blank(body) {
        error.blank(ArticleField::Body);
    }

    if error.is_empty() {
        Ok(())
    } else {
        Err(error)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Candidate article that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub body: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewArticle {
    /// Creates an active candidate.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            active: default_active(),
        }
    }

    pub fn validate(&self) -> Result<(), ArticleValidationError> {
        validate_presence(&self.title, &self.body)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Persisted article row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub body: String,
    pub active: bool,
    /// Unix epoch milliseconds, set by storage on insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by storage on update.
    pub updated_at: i64,
}

impl Article {
    pub fn validate(&self) -> Result<(), ArticleValidationError> {
        validate_presence(&self.title, &self.body)
    }
}

/// Submitted article fields, as they arrive from a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleParams {
    pub title: Option<String>,
    pub body: Option<String>,
    pub active: Option<bool>,
}

impl ArticleParams {
    /// Builds a candidate; missing text fields become empty, missing
    /// `active` becomes `true`.
    pub fn into_new_article(self) -> NewArticle {
        NewArticle {
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            active: self.active.unwrap_or_else(default_active),
        }
    }

    /// Applies a full-record update. Missing text fields are written as
    /// empty so that validation rejects them; a missing `active` keeps the
    /// stored value.
    pub fn apply_to(self, article: &mut Article) {
        article.title = self.title.unwrap_or_default();
        article.body = self.body.unwrap_or_default();
        if let Some(active) = self.active {
            article.active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_presence, ArticleField, ArticleParams};

    #[test]
    fn whitespace_only_values_are_blank() {
        let err = validate_presence("  \t", "\n").unwrap_err();
        assert_eq!(
            err.full_messages(),
            vec!["Title can't be blank", "Body can't be blank"]
        );
    }

    #[test]
    fn on_returns_messages_for_one_field() {
        let err = validate_presence("title", "").unwrap_err();
        assert!(err.on(ArticleField::Title).is_empty());
        assert_eq!(err.on(ArticleField::Body), vec!["Body can't be blank"]);
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn params_default_active_to_true() {
        let candidate = ArticleParams {
            title: Some("t".to_string()),
            body: Some("b".to_string()),
            active: None,
        }
        .into_new_article();
        assert!(candidate.active);
    }
}
