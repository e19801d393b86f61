//! Resource routing for `articles`.
//!
//! # Invariants
//! - Paths are matched exactly; a single trailing slash is ignored.
//! - Ids that do not fit `ArticleId` do not match any route.

use super::Method;
use crate::model::article::ArticleId;
use once_cell::sync::Lazy;
use regex::Regex;

static MEMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/articles/(\d+)$").expect("valid member route regex"));
static EDIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/articles/(\d+)/edit$").expect("valid edit route regex"));

/// Recognized application action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Index,
    New,
    Create,
    Show(ArticleId),
    Edit(ArticleId),
    Update(ArticleId),
    Destroy(ArticleId),
}

/// Maps a method and path onto a route.
pub fn recognize(method: Method, path: &str) -> Option<Route> {
    let path = normalize_path(path);

    match (method, path) {
        (Method::Get, "/") => return Some(Route::Home),
        (Method::Get, "/articles") => return Some(Route::Index),
        (Method::Post, "/articles") => return Some(Route::Create),
        (Method::Get, "/articles/new") => return Some(Route::New),
        _ => {}
    }

    if let Some(id) = capture_id(&EDIT_RE, path) {
        return (method == Method::Get).then_some(Route::Edit(id));
    }

    let id = capture_id(&MEMBER_RE, path)?;
    match method {
        Method::Get => Some(Route::Show(id)),
        Method::Put | Method::Patch => Some(Route::Update(id)),
        Method::Delete => Some(Route::Destroy(id)),
        Method::Post => None,
    }
}

fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

fn capture_id(pattern: &Regex, path: &str) -> Option<ArticleId> {
    pattern.captures(path)?.get(1)?.as_str().parse().ok()
}

pub fn articles_path() -> String {
    "/articles".to_string()
}

pub fn article_path(id: ArticleId) -> String {
    format!("/articles/{id}")
}


#[cfg(test)]
mod tests {
    use super::{recognize, Route};
    use crate::web::Method;

    #[test]
    fn recognizes_collection_routes() {
        assert_eq!(recognize(Method::Get, "/"), Some(Route::Home));
        assert_eq!(recognize(Method::Get, "/articles"), Some(Route::Index));
        assert_eq!(recognize(Method::Get, "/articles/"), Some(Route::Index));
        assert_eq!(recognize(Method::Post, "/articles"), Some(Route::Create));
        assert_eq!(recognize(Method::Get, "/articles/new"), Some(Route::New));
    }

    #[test]
    fn recognizes_member_routes() {
        assert_eq!(recognize(Method::Get, "/articles/7"), Some(Route::Show(7)));
        assert_eq!(
            recognize(Method::Get, "/articles/7/edit"),
            Some(Route::Edit(7))
        );
        assert_eq!(
            recognize(Method::Patch, "/articles/7"),
            Some(Route::Update(7))
        );
        assert_eq!(recognize(Method::Put, "/articles/7"), Some(Route::Update(7)));
        assert_eq!(
            recognize(Method::Delete, "/articles/7"),
            Some(Route::Destroy(7))
        );
    }

    #[test]
    fn rejects_unknown_paths_and_methods() {
        assert_eq!(recognize(Method::Post, "/articles/7"), None);
        assert_eq!(recognize(Method::Delete, "/articles"), None);
        assert_eq!(recognize(Method::Post, "/articles/7/edit"), None);
        assert_eq!(recognize(Method::Get, "/articles/abc"), None);
        assert_eq!(recognize(Method::Get, "/articles/99999999999999999999"), None);
        assert_eq!(recognize(Method::Get, "/comments"), None);
    }
}
