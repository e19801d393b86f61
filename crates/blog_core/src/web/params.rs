//! Form field extraction for article submissions.
//!
//! Fields are read either flat (`title`) or nested the way Rails-style forms
//! name them (`article[title]`); the nested name wins when both are sent.
//! Repeated fields resolve to their last value, so a hidden `active=0`
//! followed by a checked `active=1` reads as checked.

use super::Request;
use crate::model::article::{ArticleField, ArticleParams};

const ACTIVE_FIELD: &str = "active";

/// Extracts article fields from a submitted form.
pub fn article_params(request: &Request) -> ArticleParams {
    build_params(
        lookup(request, ArticleField::Title.name()).map(str::to_string),
        lookup(request, ArticleField::Body.name()).map(str::to_string),
        lookup(request, ACTIVE_FIELD),
    )
}

/// Builds params from already-decoded field values.
///
/// `active` is the last submitted checkbox value, if any was sent.
pub fn build_params(
    title: Option<String>,
    body: Option<String>,
    active: Option<&str>,
) -> ArticleParams {
    ArticleParams {
        title,
        body,
        active: active.map(parse_bool),
    }
}

fn lookup<'req>(request: &'req Request, name: &str) -> Option<&'req str> {
    request
        .form_value(&format!("article[{name}]"))
        .or_else(|| request.form_value(name))
}

/// Casts a submitted checkbox value. Empty and the usual falsy spellings are
/// `false`; any other value is `true`.
pub fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "f" | "false" | "off" | "no" | "n"
    )
}
