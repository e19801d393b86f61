//! Article repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and scoped reads over the `articles` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate required fields before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Reads are ordered by `id ASC`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::article::{Article, ArticleId, ArticleValidationError, NewArticle};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    active,
    created_at,
    updated_at
FROM articles";

const ARTICLE_COLUMNS: [&str; 6] = ["id", "title", "body", "active", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for article persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ArticleValidationError),
    Db(DbError),
    NotFound(ArticleId),
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "article not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted article data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "article repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "article repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "article repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ArticleValidationError> for RepoError {
    fn from(value: ArticleValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named filter over the article collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArticleScope {
    #[default]
    All,
    /// Rows with `active = true`.
    Active,
    /// Rows with `active = false`.
    Inactive,
}

impl ArticleScope {
    fn where_clause(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Active => " WHERE active = 1",
            Self::Inactive => " WHERE active = 0",
        }
    }
}

/// Repository interface for article CRUD operations.
pub trait ArticleRepository {
    /// Inserts a candidate and returns the storage-generated id.
    fn create_article(&self, article: &NewArticle) -> RepoResult<ArticleId>;
    /// Replaces title/body/active of an existing row.
    fn update_article(&self, article: &Article) -> RepoResult<()>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    fn list_articles(&self, scope: ArticleScope) -> RepoResult<Vec<Article>>;
    fn count_articles(&self, scope: ArticleScope) -> RepoResult<u64>;
    /// Hard-deletes one row.
    fn delete_article(&self, id: ArticleId) -> RepoResult<()>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_article_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create_article(&self, article: &NewArticle) -> RepoResult<ArticleId> {
        article.validate()?;

        self.conn.execute(
            "INSERT INTO articles (title, body, active) VALUES (?1, ?2, ?3);",
            params![
                article.title.as_str(),
                article.body.as_str(),
                bool_to_int(article.active),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_article(&self, article: &Article) -> RepoResult<()> {
        article.validate()?;

        let changed = self.conn.execute(
            "UPDATE articles
             SET
                title = ?1,
                body = ?2,
                active = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                article.title.as_str(),
                article.body.as_str(),
                bool_to_int(article.active),
                article.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(article.id));
        }

        Ok(())
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTICLE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_article_row(row)?));
        }

        Ok(None)
    }

    fn list_articles(&self, scope: ArticleScope) -> RepoResult<Vec<Article>> {
        let sql = format!("{ARTICLE_SELECT_SQL}{} ORDER BY id ASC;", scope.where_clause());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut articles = Vec::new();

        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }

        Ok(articles)
    }

    fn count_articles(&self, scope: ArticleScope) -> RepoResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM articles{};", scope.where_clause());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative article count `{count}`")))
    }

    fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

/// Maps one row. Presence rules are enforced on write only, so rows saved
/// before they applied (blank text) still load and can be edited.
fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let id: ArticleId = row.get("id")?;

    let active = match row.get::<_, i64>("active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid active value `{other}` in articles.active for id {id}"
            )));
        }
    };

    Ok(Article {
        id,
        title: row.get("title")?,
        body: row.get("body")?,
        active,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_article_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_sql: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'articles';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if table_sql.is_none() {
        return Err(RepoError::MissingRequiredTable("articles"));
    }

    for column in ARTICLE_COLUMNS {
        if !table_has_column(conn, "articles", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "articles",
                column,
            });
        }
    }

    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
