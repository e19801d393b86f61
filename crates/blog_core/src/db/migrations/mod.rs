//! Article schema migrations.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per entry.
//! - The schema version lives in `PRAGMA user_version`; nothing else records
//!   migration state.
//! - Pending migrations run in a single transaction, so a failed step leaves
//!   the previous version in place.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_articles",
        sql: include_str!("0001_create_articles.sql"),
    },
    Migration {
        version: 2,
        name: "article_active_default",
        sql: include_str!("0002_article_active_default.sql"),
    },
    Migration {
        version: 3,
        name: "article_text_not_null",
        sql: include_str!("0003_article_text_not_null.sql"),
    },
];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the articles schema up to [`latest_version`].
///
/// Returns the versions applied by this call, oldest first; an empty list
/// means the database was already current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<u32>> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        debug!("event=db_migrate module=db status=current version={from_version}");
        return Ok(Vec::new());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        debug!(
            "event=db_migrate module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={latest} applied={}",
        pending.len()
    );
    Ok(pending.iter().map(|migration| migration.version).collect())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, MIGRATIONS};

    #[test]
    fn versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1, "{}", migration.name);
        }
        assert_eq!(latest_version(), 3);
    }
}
