//! Article controller actions.
//!
//! # Responsibility
//! - Turn service results into pages or redirects with notices.
//! - Re-present forms with submitted values when validation fails.
//!
//! # Invariants
//! - Successful writes always answer with a redirect and a notice.
//! - Missing articles render 404; other failures render 500 and are logged.

use super::routes::{article_path, articles_path};
use super::views::{ArticleForm, Page};
use crate::model::article::{ArticleId, ArticleParams, NewArticle};
use crate::repo::article_repo::ArticleRepository;
use crate::service::article_service::{ArticleService, ArticleServiceError};
use log::error;

pub const ARTICLE_CREATED_NOTICE: &str = "Article was successfully created";
pub const ARTICLE_UPDATED_NOTICE: &str = "Article was successfully updated";
pub const ARTICLE_DESTROYED_NOTICE: &str = "Article was successfully destroyed";

/// Outcome of one controller action.
#[derive(Debug, Clone)]
pub enum Response {
    Page(Page),
    Redirect { location: String, notice: String },
}

impl Response {
    fn redirect(location: String, notice: &str) -> Self {
        Self::Redirect {
            location,
            notice: notice.to_string(),
        }
    }
}

/// Controller for the `articles` resource.
pub struct ArticlesController<R: ArticleRepository> {
    service: ArticleService<R>,
}

impl<R: ArticleRepository> ArticlesController<R> {
    pub fn new(service: ArticleService<R>) -> Self {
        Self { service }
    }

    pub fn index(&self) -> Response {
        match self.service.list() {
            Ok(articles) => Response::Page(Page::index(&articles)),
            Err(err) => failure("index", err),
        }
    }

    /// Renders one article; unknown ids render 404.
    pub fn show(&self, id: ArticleId) -> Response {
        match self.service.find(id) {
            Ok(article) => Response::Page(Page::show(&article)),
            Err(err) => failure("show", err),
        }
    }

    /// Renders an empty form; the checkbox starts checked.
    pub fn new_article(&self) -> Response {
        let form = ArticleForm::from(NewArticle::new("", ""));
        Response::Page(Page::new_article(&form, None))
    }

    pub fn create(&self, params: ArticleParams) -> Response {
        match self.service.create(params.clone()) {
            Ok(article) => Response::redirect(article_path(article.id), ARTICLE_CREATED_NOTICE),
            Err(ArticleServiceError::Invalid(errors)) => {
                let form = ArticleForm::from(params.into_new_article());
                Response::Page(Page::new_article(&form, Some(&errors)))
            }
            Err(err) => failure("create", err),
        }
    }

    pub fn edit(&self, id: ArticleId) -> Response {
        match self.service.find(id) {
            Ok(article) => Response::Page(Page::edit_article(
                id,
                &ArticleForm::from(article),
                None,
            )),
            Err(err) => failure("edit", err),
        }
    }

    pub fn update(&self, id: ArticleId, params: ArticleParams) -> Response {
        match self.service.update(id, params.clone()) {
            Ok(article) => Response::redirect(article_path(article.id), ARTICLE_UPDATED_NOTICE),
            Err(ArticleServiceError::Invalid(errors)) => {
                let mut submitted = match self.service.find(id) {
                    Ok(article) => article,
                    Err(err) => return failure("update", err),
                };
                params.apply_to(&mut submitted);
                Response::Page(Page::edit_article(
                    id,
                    &ArticleForm::from(submitted),
                    Some(&errors),
                ))
            }
            Err(err) => failure("update", err),
        }
    }

    pub fn destroy(&self, id: ArticleId) -> Response {
        match self.service.destroy(id) {
            Ok(()) => Response::redirect(articles_path(), ARTICLE_DESTROYED_NOTICE),
            Err(err) => failure("destroy", err),
        }
    }
}

fn failure(action: &'static str, err: ArticleServiceError) -> Response {
    match err {
        ArticleServiceError::NotFound(_) => Response::Page(Page::not_found()),
        other => {
            error!(
                "event=article_{action} module=web status=error error={}",
                other
            );
            Response::Page(Page::server_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ArticlesController, Response, ARTICLE_CREATED_NOTICE};
    use crate::db::open_db_in_memory;
    use crate::model::article::ArticleParams;
    use crate::repo::article_repo::SqliteArticleRepository;
    use crate::service::article_service::ArticleService;
    use crate::web::Status;
    use rusqlite::Connection;

    fn controller_for(conn: &Connection) -> ArticlesController<SqliteArticleRepository<'_>> {
        ArticlesController::new(ArticleService::new(
            SqliteArticleRepository::try_new(conn).unwrap(),
        ))
    }

    #[test]
    fn create_redirects_to_show_page_with_notice() {
        let conn = open_db_in_memory().unwrap();
        let controller = controller_for(&conn);

        let response = controller.create(ArticleParams {
            title: Some("Test title".to_string()),
            body: Some("Test body".to_string()),
            active: None,
        });

        match response {
            Response::Redirect { location, notice } => {
                assert!(location.starts_with("/articles/"));
                assert_eq!(notice, ARTICLE_CREATED_NOTICE);
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn invalid_update_keeps_submitted_values() {
        let conn = open_db_in_memory().unwrap();
        let controller = controller_for(&conn);
        let Response::Redirect { location, .. } = controller.create(ArticleParams {
            title: Some("Original".to_string()),
            body: Some("Body".to_string()),
            active: None,
        }) else {
            panic!("create should redirect");
        };
        let id: i64 = location.trim_start_matches("/articles/").parse().unwrap();

        let response = controller.update(
            id,
            ArticleParams {
                title: Some("Renamed".to_string()),
                body: Some(String::new()),
                active: Some(false),
            },
        );

        match response {
            Response::Page(page) => {
                let html = page.render(None);
                assert_eq!(page.status, Status::UnprocessableEntity);
                assert!(html.contains("value=\"Renamed\""));
                assert!(html.contains("Body can&#x27;t be blank"));
                assert!(html.contains("Update Article"));
            }
            other => panic!("expected form page, got {other:?}"),
        }
    }
}
