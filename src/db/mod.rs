mod schema;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const SEARCH_LIMIT: i64 = 200;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status {0:?} (expected draft, tested or prod)")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnippetStatus {
    #[default]
    Draft,
    Tested,
    Prod,
}

impl SnippetStatus {
    pub const ALL: [SnippetStatus; 3] = [Self::Draft, Self::Tested, Self::Prod];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Tested => "tested",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for SnippetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnippetStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

impl ToSql for SnippetStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SnippetStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub language: String,
    pub tags: String,
    pub status: SnippetStatus,
    pub code: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnippetSummary {
    pub id: i64,
    pub title: String,
    pub language: String,
    pub tags: String,
    pub status: SnippetStatus,
}

/// Editable fields of a snippet, already validated by the caller.
#[derive(Debug, Clone, Copy)]
pub struct NewSnippet<'a> {
    pub title: &'a str,
    pub language: &'a str,
    pub tags: &'a str,
    pub status: SnippetStatus,
    pub code: &'a str,
    pub notes: &'a str,
}

pub struct Database {
    conn: Mutex<Connection>,
}

const SNIPPET_COLUMNS: &str = "
    id,
    title,
    language,
    tags,
    status,
    code,
    IFNULL(notes, ''),
    created_at,
    updated_at
";

const SUMMARY_COLUMNS: &str = "id, title, language, tags, status";

impl Database {
    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    pub fn new(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::initialize(&conn)?;
        debug!(path = %path.display(), "opened snippet database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates the backing table and index when absent. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> Result<(), DbError> {
        let conn = self.conn()?;
        Self::initialize(&conn)
    }

    fn initialize(conn: &Connection) -> Result<(), DbError> {
        conn.execute_batch(schema::CREATE_SNIPPETS_TABLE)?;
        conn.execute_batch(schema::CREATE_INDEX_UPDATED_AT)?;
        Ok(())
    }

    pub fn search(&self, keyword: &str) -> Result<Vec<SnippetSummary>, DbError> {
        // SQLite LOWER() folds ASCII only; fold the keyword the same way.
        let like = format!("%{}%", escape_like(&keyword.trim().to_ascii_lowercase()));
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r"
            SELECT {SUMMARY_COLUMNS}
            FROM snippets
            WHERE LOWER(title) LIKE ?1 ESCAPE '\'
               OR LOWER(language) LIKE ?1 ESCAPE '\'
               OR LOWER(tags) LIKE ?1 ESCAPE '\'
               OR LOWER(code) LIKE ?1 ESCAPE '\'
               OR LOWER(IFNULL(notes, '')) LIKE ?1 ESCAPE '\'
            ORDER BY updated_at DESC, id DESC
            LIMIT ?2
            "
        ))?;
        let rows = stmt.query_map(params![like, SEARCH_LIMIT], summary_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    pub fn get(&self, id: i64) -> Result<Option<Snippet>, DbError> {
        let conn = self.conn()?;
        get_snippet_internal(&conn, id)
            .optional()
            .map_err(DbError::from)
    }

    pub fn insert(&self, snippet: NewSnippet<'_>) -> Result<i64, DbError> {
        let conn = self.conn()?;
        conn.execute(
            "
            INSERT INTO snippets (title, language, tags, status, code, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                snippet.title,
                snippet.language,
                snippet.tags,
                snippet.status,
                snippet.code,
                snippet.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "inserted snippet");
        Ok(id)
    }

    /// Replaces every editable field of `id`. Returns `false` when no such row exists.
    pub fn update(&self, id: i64, snippet: NewSnippet<'_>) -> Result<bool, DbError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            &format!(
                "
                UPDATE snippets
                SET title = ?1,
                    language = ?2,
                    tags = ?3,
                    status = ?4,
                    code = ?5,
                    notes = ?6,
                    updated_at = {}
                WHERE id = ?7
                ",
                schema::CURRENT_TIMESTAMP
            ),
            params![
                snippet.title,
                snippet.language,
                snippet.tags,
                snippet.status,
                snippet.code,
                snippet.notes,
                id,
            ],
        )?;
        debug!(id, changed, "updated snippet");
        Ok(changed > 0)
    }

    pub fn delete(&self, id: i64) -> Result<bool, DbError> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM snippets WHERE id = ?1", params![id])?;
        debug!(id, deleted, "deleted snippet");
        Ok(deleted > 0)
    }

    pub fn count(&self) -> Result<i64, DbError> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM snippets", [], |row| row.get(0))
            .map_err(DbError::from)
    }
}

fn get_snippet_internal(conn: &Connection, id: i64) -> Result<Snippet, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT {SNIPPET_COLUMNS} FROM snippets WHERE id = ?1"),
        params![id],
        snippet_from_row,
    )
}

fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn snippet_from_row(row: &Row<'_>) -> Result<Snippet, rusqlite::Error> {
    Ok(Snippet {
        id: row.get(0)?,
        title: row.get(1)?,
        language: row.get(2)?,
        tags: row.get(3)?,
        status: row.get(4)?,
        code: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn summary_from_row(row: &Row<'_>) -> Result<SnippetSummary, rusqlite::Error> {
    Ok(SnippetSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        language: row.get(2)?,
        tags: row.get(3)?,
        status: row.get(4)?,
    })
}
