//! Article use-case service.
//!
//! # Responsibility
//! - Provide create/update/destroy/read entry points for articles.
//! - Apply form defaults before validation.
//! - Expose the `active`/`inactive` scopes.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Created and updated articles are returned as read back from storage.
//! - Log events carry ids only, never titles or bodies.

use crate::model::article::{Article, ArticleId, ArticleParams, ArticleValidationError};
use crate::repo::article_repo::{ArticleRepository, ArticleScope, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for article use-cases.
#[derive(Debug)]
pub enum ArticleServiceError {
    /// Submitted fields failed required-field checks.
    Invalid(ArticleValidationError),
    /// Target article does not exist.
    NotFound(ArticleId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ArticleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "article not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent article state: {details}"),
        }
    }
}

impl Error for ArticleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ArticleServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ArticleServiceError>;

/// Article service facade over repository implementations.
pub struct ArticleService<R: ArticleRepository> {
    repo: R,
}

impl<R: ArticleRepository> ArticleService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one article from submitted fields.
    ///
    /// # Contract
    /// - Missing `active` defaults to `true`.
    /// - Validation failure persists nothing and returns `Invalid`.
    pub fn create(&self, params: ArticleParams) -> ServiceResult<Article> {
        let candidate = params.into_new_article();
        if let Err(err) = candidate.validate() {
            warn!(
                "event=article_create module=service status=invalid error_count={}",
                err.len()
            );
            return Err(ArticleServiceError::Invalid(err));
        }

        let id = self.repo.create_article(&candidate)?;
        info!("event=article_create module=service status=ok article_id={id}");
        self.repo
            .get_article(id)?
            .ok_or(ArticleServiceError::InconsistentState(
                "created article not found in read-back",
            ))
    }

    /// Applies submitted fields to an existing article (full replacement).
    pub fn update(&self, id: ArticleId, params: ArticleParams) -> ServiceResult<Article> {
        let mut article = self.find(id)?;
        params.apply_to(&mut article);
        if let Err(err) = article.validate() {
            warn!(
                "event=article_update module=service status=invalid article_id={id} error_count={}",
                err.len()
            );
            return Err(ArticleServiceError::Invalid(err));
        }

        self.repo.update_article(&article)?;
        info!("event=article_update module=service status=ok article_id={id}");
        self.repo
            .get_article(id)?
            .ok_or(ArticleServiceError::InconsistentState(
                "updated article not found in read-back",
            ))
    }

    /// Deletes one article.
    pub fn destroy(&self, id: ArticleId) -> ServiceResult<()> {
        self.repo.delete_article(id)?;
        info!("event=article_destroy module=service status=ok article_id={id}");
        Ok(())
    }

    /// Gets one article, `None` when it does not exist.
    pub fn get(&self, id: ArticleId) -> ServiceResult<Option<Article>> {
        Ok(self.repo.get_article(id)?)
    }

    /// Gets one article, `NotFound` when it does not exist.
    pub fn find(&self, id: ArticleId) -> ServiceResult<Article> {
        self.get(id)?.ok_or(ArticleServiceError::NotFound(id))
    }

    pub fn list(&self) -> ServiceResult<Vec<Article>> {
        Ok(self.repo.list_articles(ArticleScope::All)?)
    }

    /// Articles with `active = true`.
    pub fn active(&self) -> ServiceResult<Vec<Article>> {
        Ok(self.repo.list_articles(ArticleScope::Active)?)
    }

    /// Articles with `active = false`.
    pub fn inactive(&self) -> ServiceResult<Vec<Article>> {
        Ok(self.repo.list_articles(ArticleScope::Inactive)?)
    }

    pub fn count(&self, scope: ArticleScope) -> ServiceResult<u64> {
        Ok(self.repo.count_articles(scope)?)
    }
}
