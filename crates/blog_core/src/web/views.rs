//! Page rendering through bundled tera templates.
//!
//! # Responsibility
//! - Compile the `templates/` directory once per process.
//! - Build pages from serializable contexts and render them inside the layout.
//!
//! # Invariants
//! - Template names end in `.html`, so tera autoescapes every interpolation.
//! - Rendering never fails outward; errors are logged and replaced by the
//!   server error page.

use super::Status;
use crate::model::article::{Article, ArticleId, ArticleValidationError, NewArticle};
use log::error;
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

const LAYOUT_TEMPLATE: &str = "layout.html";
const HOME_TEMPLATE: &str = "home.html";
const NOT_FOUND_TEMPLATE: &str = "not_found.html";
const SERVER_ERROR_TEMPLATE: &str = "server_error.html";
const INDEX_TEMPLATE: &str = "articles/index.html";
const SHOW_TEMPLATE: &str = "articles/show.html";
const FORM_TEMPLATE: &str = "articles/form.html";

const LAST_RESORT_PAGE: &str =
    "<!DOCTYPE html>\n<html>\n<body>\n<h1>Something went wrong</h1>\n</body>\n</html>\n";

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (LAYOUT_TEMPLATE, include_str!("../../templates/layout.html")),
        (HOME_TEMPLATE, include_str!("../../templates/home.html")),
        (NOT_FOUND_TEMPLATE, include_str!("../../templates/not_found.html")),
        (
            SERVER_ERROR_TEMPLATE,
            include_str!("../../templates/server_error.html"),
        ),
        (INDEX_TEMPLATE, include_str!("../../templates/articles/index.html")),
        (SHOW_TEMPLATE, include_str!("../../templates/articles/show.html")),
        (FORM_TEMPLATE, include_str!("../../templates/articles/form.html")),
    ])
    .expect("bundled templates are valid");
    tera
});

/// Field values shown in the article form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleForm {
    pub title: String,
    pub body: String,
    pub active: bool,
}

impl From<NewArticle> for ArticleForm {
    fn from(value: NewArticle) -> Self {
        Self {
            title: value.title,
            body: value.body,
            active: value.active,
        }
    }
}

impl From<Article> for ArticleForm {
    fn from(value: Article) -> Self {
        Self {
            title: value.title,
            body: value.body,
            active: value.active,
        }
    }
}

#[derive(Serialize)]
struct IndexContext<'a> {
    articles: &'a [Article],
}

#[derive(Serialize)]
struct ShowContext<'a> {
    article: &'a Article,
}

#[derive(Serialize)]
struct FormContext<'a> {
    heading: &'static str,
    submit_label: &'static str,
    /// Set when editing; the form then submits a PATCH to the article.
    article_id: Option<ArticleId>,
    form: &'a ArticleForm,
    errors: Option<&'a ArticleValidationError>,
}

/// A page waiting to be rendered with the current notice.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: Status,
    pub title: String,
    template: &'static str,
    context: Context,
}

impl Page {
    fn from_context<C: Serialize>(
        status: Status,
        title: impl Into<String>,
        template: &'static str,
        context: &C,
    ) -> Self {
        match Context::from_serialize(context) {
            Ok(context) => Self {
                status,
                title: title.into(),
                template,
                context,
            },
            Err(err) => {
                error!(
                    "event=render module=web status=error template={template} error_code=context_failed error={err}"
                );
                Self::server_error()
            }
        }
    }

    fn bare(status: Status, title: &str, template: &'static str) -> Self {
        Self {
            status,
            title: title.to_string(),
            template,
            context: Context::new(),
        }
    }

    pub fn home() -> Self {
        Self::bare(Status::Ok, "Home", HOME_TEMPLATE)
    }

    pub fn not_found() -> Self {
        Self::bare(Status::NotFound, "Not Found", NOT_FOUND_TEMPLATE)
    }

    pub fn server_error() -> Self {
        Self::bare(Status::InternalServerError, "Error", SERVER_ERROR_TEMPLATE)
    }

    pub fn index(articles: &[Article]) -> Self {
        Self::from_context(
            Status::Ok,
            "Articles",
            INDEX_TEMPLATE,
            &IndexContext { articles },
        )
    }

    pub fn show(article: &Article) -> Self {
        Self::from_context(
            Status::Ok,
            article.title.clone(),
            SHOW_TEMPLATE,
            &ShowContext { article },
        )
    }

    /// Create form; `errors` switches the status to 422.
    pub fn new_article(form: &ArticleForm, errors: Option<&ArticleValidationError>) -> Self {
        Self::from_context(
            form_status(errors),
            "New Article",
            FORM_TEMPLATE,
            &FormContext {
                heading: "New Article",
                submit_label: "Create Article",
                article_id: None,
                form,
                errors,
            },
        )
    }

    /// Edit form; `errors` switches the status to 422.
    pub fn edit_article(
        id: ArticleId,
        form: &ArticleForm,
        errors: Option<&ArticleValidationError>,
    ) -> Self {
        Self::from_context(
            form_status(errors),
            "Editing Article",
            FORM_TEMPLATE,
            &FormContext {
                heading: "Editing Article",
                submit_label: "Update Article",
                article_id: Some(id),
                form,
                errors,
            },
        )
    }

    /// Renders the page inside the layout, showing `notice` when present.
    pub fn render(&self, notice: Option<&str>) -> String {
        let mut context = self.context.clone();
        context.insert("title", &self.title);
        context.insert("notice", &notice);

        match TEMPLATES.render(self.template, &context) {
            Ok(html) => html,
            Err(err) => {
                error!(
                    "event=render module=web status=error template={} error={}",
                    self.template, err
                );
                render_last_resort()
            }
        }
    }
}

fn form_status(errors: Option<&ArticleValidationError>) -> Status {
    match errors {
        Some(errors) if !errors.is_empty() => Status::UnprocessableEntity,
        _ => Status::Ok,
    }
}

fn render_last_resort() -> String {
    let mut context = Context::new();
    context.insert("title", "Error");
    context.insert("notice", &Option::<&str>::None);
    TEMPLATES
        .render(SERVER_ERROR_TEMPLATE, &context)
        .unwrap_or_else(|_| LAST_RESORT_PAGE.to_string())
}
