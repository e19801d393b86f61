use blog_core::db::migrations::{apply_migrations, latest_version};
use blog_core::db::{open_db, open_db_in_memory, DbError};
use blog_core::{App, ArticleRepository, ArticleScope, Request, SqliteArticleRepository, Status};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "articles");
}

#[test]
fn active_column_defaults_to_true_and_rejects_null() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO articles (title, body) VALUES ('Title', 'Body');",
        [],
    )
    .unwrap();
    let active: i64 = conn
        .query_row("SELECT active FROM articles;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(active, 1);

    let null_insert = conn.execute(
        "INSERT INTO articles (title, body, active) VALUES ('Title', 'Body', NULL);",
        [],
    );
    assert!(null_insert.is_err());
}

#[test]
fn apply_migrations_reports_versions_it_ran() {
    let mut conn = Connection::open_in_memory().unwrap();

    let applied = apply_migrations(&mut conn).unwrap();
    assert_eq!(applied, (1..=latest_version()).collect::<Vec<_>>());
    assert!(apply_migrations(&mut conn).unwrap().is_empty());
}

#[test]
fn text_columns_reject_null_after_upgrade() {
    let conn = open_db_in_memory().unwrap();

    let null_title = conn.execute(
        "INSERT INTO articles (title, body) VALUES (NULL, 'Body');",
        [],
    );
    assert!(null_title.is_err());
}

#[test]
fn upgrading_from_first_schema_backfills_null_active() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            body TEXT,
            active INTEGER,
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0
        );
        INSERT INTO articles (title, body, active) VALUES ('legacy', 'null flag', NULL);
        INSERT INTO articles (title, body, active) VALUES ('legacy', 'hidden', 0);
        PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let flags: Vec<i64> = {
        let mut stmt = conn
            .prepare("SELECT active FROM articles ORDER BY id;")
            .unwrap();
        let rows = stmt.query_map([], |row| row.get(0)).unwrap();
        rows.collect::<Result<_, _>>().unwrap()
    };
    assert_eq!(flags, vec![1, 0]);

    conn.execute(
        "INSERT INTO articles (title, body) VALUES ('new', 'row');",
        [],
    )
    .unwrap();
    assert_eq!(conn.last_insert_rowid(), 3);
}

#[test]
fn legacy_rows_without_text_still_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("untitled.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            body TEXT,
            active INTEGER,
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0
        );
        INSERT INTO articles (title, body, active) VALUES (NULL, NULL, 1);
        INSERT INTO articles (title, body, active) VALUES ('kept', 'text', 1);
        PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    {
        let repo = SqliteArticleRepository::try_new(&conn).unwrap();
        let articles = repo.list_articles(ArticleScope::All).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "");
        assert_eq!(articles[0].body, "");
        assert_eq!(articles[1].title, "kept");
    }

    let mut app = App::new(conn);
    let response = app.request(&Request::get("/articles"));
    assert_eq!(response.status, Status::Ok);
    assert!(response.body.contains("kept"));
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "articles");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
