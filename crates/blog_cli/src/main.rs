//! Command-line driver for the blog.
//!
//! Sends one request through the web layer and prints the final page:
//!
//! ```text
//! blog_cli GET /articles
//! blog_cli POST /articles title="Hello" body="First post"
//! blog_cli PATCH /articles/1 title="Hello" body="Edited" active=0
//! blog_cli DELETE /articles/1
//! ```

use blog_core::db::open_db;
use blog_core::{core_version, init_from_config, App, BlogConfig, Method, Request};
use log::info;
use std::process::ExitCode;

const USAGE: &str = "usage: blog_cli <GET|POST|PUT|PATCH|DELETE> <PATH> [field=value ...]
       blog_cli --version";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--version") {
        println!("blog_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the final response was successful.
fn run(args: &[String]) -> Result<bool, String> {
    let request = parse_request(args)?;

    let config = BlogConfig::from_env().map_err(|err| err.to_string())?;
    init_from_config(&config).map_err(|err| err.to_string())?;

    let conn = open_db(&config.database_path).map_err(|err| {
        format!(
            "failed to open database `{}`: {err}",
            config.database_path.display()
        )
    })?;
    let mut app = App::new(conn);

    let response = app.request(&request);
    info!(
        "event=cli_request module=cli method={} path={} status={}",
        request.method,
        request.path,
        response.status.code()
    );

    println!("{}", response.status);
    println!();
    println!("{}", response.body);
    Ok(response.status.is_success())
}

fn parse_request(args: &[String]) -> Result<Request, String> {
    let [method, path, fields @ ..] = args else {
        return Err(USAGE.to_string());
    };
    let method = Method::parse(method).ok_or_else(|| format!("unknown method `{method}`\n{USAGE}"))?;

    let mut request = Request::new(method, path.as_str());
    for field in fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| format!("expected field=value, got `{field}`"))?;
        request = request.field(name, value);
    }
    Ok(request)
}
