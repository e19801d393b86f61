//! HTTP front end for the blog.
//!
//! Reads the same `BLOG_*` settings as the CLI. Bind address and port come
//! from rocket's own configuration (`ROCKET_ADDRESS`, `ROCKET_PORT` or
//! `Rocket.toml`).

#[macro_use]
extern crate rocket;

use anyhow::{anyhow, Context};
use blog_core::db::open_db;
use blog_core::{init_from_config, App, BlogConfig};
use log::info;

mod webserver;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = BlogConfig::from_env()?;
    init_from_config(&config).map_err(|err| anyhow!("failed to start logging: {err}"))?;

    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    info!(
        "event=server_start module=server status=ok database={}",
        config.database_path.display()
    );

    webserver::rocket_server(App::new(conn))
        .launch()
        .await
        .map_err(|err| anyhow!("server stopped: {err}"))?;
    Ok(())
}
