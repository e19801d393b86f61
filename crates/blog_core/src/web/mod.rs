//! Presentation layer: routing, controller actions and HTML views.
//!
//! # Responsibility
//! - Map method + path pairs onto article actions.
//! - Render pages and carry redirect notices to the next page (flash).
//!
//! `App` is the in-process front end used by the CLI and tests; the HTTP
//! server reuses [`App::perform`] and does its own flash handling.
//!
//! # Invariants
//! - One request is handled at a time against one owned connection.
//! - Handling a request never panics; failures become 404/500 pages.

use log::{debug, error};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};

pub mod controller;
pub mod params;
pub mod routes;
pub mod views;

use crate::model::article::ArticleParams;
use crate::repo::article_repo::SqliteArticleRepository;
use crate::service::article_service::ArticleService;
use controller::{ArticlesController, Response};
use views::Page;
use routes::Route;

/// Request methods understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Parses a method name case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response status codes produced by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Found,
    NotFound,
    UnprocessableEntity,
    InternalServerError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Found => 302,
            Self::NotFound => 404,
            Self::UnprocessableEntity => 422,
            Self::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Found => "Found",
            Self::NotFound => "Not Found",
            Self::UnprocessableEntity => "Unprocessable Entity",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Ok
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// Incoming request: method, path and submitted form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub form: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            form: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends one form field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// Last submitted value for `name`, if any.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Method after applying a `_method` override on POST.
    pub fn effective_method(&self) -> Method {
        if self.method != Method::Post {
            return self.method;
        }
        match self.form_value("_method").and_then(Method::parse) {
            Some(method @ (Method::Put | Method::Patch | Method::Delete)) => method,
            _ => Method::Post,
        }
    }
}

/// Rendered response as seen by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: Status,
    /// Redirect target for `Status::Found`.
    pub location: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_redirect(&self) -> bool {
        self.status == Status::Found && self.location.is_some()
    }
}

/// Blog application bound to one SQLite connection.
pub struct App {
    conn: Connection,
    flash: Option<String>,
}

impl App {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self { conn, flash: None }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Handles one request without following redirects.
    ///
    /// A redirect stores its notice; the next rendered page shows and clears it.
    pub fn handle(&mut self, request: &Request) -> HttpResponse {
        let method = request.effective_method();
        debug!(
            "event=request module=web method={} path={}",
            method, request.path
        );

        let response = match routes::recognize(method, &request.path) {
            Some(route) => self.dispatch(route, request),
            None => Response::Page(Page::not_found()),
        };

        match response {
            Response::Page(page) => {
                let notice = self.flash.take();
                HttpResponse {
                    status: page.status,
                    location: None,
                    body: page.render(notice.as_deref()),
                }
            }
            Response::Redirect { location, notice } => {
                self.flash = Some(notice);
                HttpResponse {
                    status: Status::Found,
                    body: String::new(),
                    location: Some(location),
                }
            }
        }
    }

    /// Handles one request and follows a resulting redirect with a GET.
    pub fn request(&mut self, request: &Request) -> HttpResponse {
        let response = self.handle(request);
        match response.location.clone() {
            Some(location) if response.is_redirect() => self.handle(&Request::get(location)),
            _ => response,
        }
    }

    fn dispatch(&self, route: Route, request: &Request) -> Response {
        let params = match route {
            Route::Create | Route::Update(_) => params::article_params(request),
            _ => ArticleParams::default(),
        };
        self.perform(route, params)
    }

    /// Runs the action for `route`. `params` is only read by create/update.
    pub fn perform(&self, route: Route, params: ArticleParams) -> Response {
        let repo = match SqliteArticleRepository::try_new(&self.conn) {
            Ok(repo) => repo,
            Err(err) => {
                error!(
                    "event=request module=web status=error error_code=repo_unavailable error={}",
                    err
                );
                return Response::Page(Page::server_error());
            }
        };
        let controller = ArticlesController::new(ArticleService::new(repo));

        match route {
            Route::Home => Response::Page(Page::home()),
            Route::Index => controller.index(),
            Route::New => controller.new_article(),
            Route::Create => controller.create(params),
            Route::Show(id) => controller.show(id),
            Route::Edit(id) => controller.edit(id),
            Route::Update(id) => controller.update(id, params),
            Route::Destroy(id) => controller.destroy(id),
        }
    }
}
