use crate::models::{
    Author, AuthorId, AuthorName, BirthDate, CreateAuthorError, CreateAuthorRequest,
    DeleteAuthorError, DeleteAuthorRequest, FindAuthorError, FindAuthorRequest, Nationality,
    SearchAuthorsError, SearchAuthorsRequest, UpdateAuthorError, UpdateAuthorRequest,
};
use crate::repositories::AuthorRepository;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn establish_pool(path: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(path)
        .with_context(|| format!("Invalid database path {path}"))?
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    // Every connection to an in-memory URL may see its own database, so such
    // pools hold exactly one connection that is never recycled.
    let max_connections = if is_in_memory(path) {
        1
    } else {
        max_connections
    };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database at {path}"))?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

#[derive(Debug)]
pub struct DefaultAuthorRepository {
    pool: SqlitePool,
}

impl DefaultAuthorRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: Uuid = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let birth_date: NaiveDate = row.try_get("birth_date")?;
        let nationality: String = row.try_get("nationality")?;

        Ok(Self::new(
            AuthorId::from_uuid(id),
            AuthorName::new_unchecked(&name),
            BirthDate::new_unchecked(birth_date),
            Nationality::new_unchecked(&nationality),
        ))
    }
}

#[async_trait]
impl AuthorRepository for DefaultAuthorRepository {
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError> {
        let id = AuthorId::generate();
        let author = sqlx::query_as(
            "INSERT INTO author (id, name, birth_date, nationality) VALUES (?, ?, ?, ?) \
             RETURNING id, name, birth_date, nationality",
        )
        .bind(id.as_uuid())
        .bind(req.name().to_string())
        .bind(req.birth_date().as_date())
        .bind(req.nationality().to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                CreateAuthorError::Duplicate {
                    name: req.name().to_string(),
                }
            } else {
                let err = anyhow!(err).context(format!(
                    r#"Failed to create author with name "{}""#,
                    req.name()
                ));
                CreateAuthorError::Other(err)
            }
        })?;

        Ok(author)
    }

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Option<Author>, FindAuthorError> {
        let author = sqlx::query_as(
            "SELECT id, name, birth_date, nationality FROM author WHERE id = ?",
        )
        .bind(req.id().as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(
                r#"Failed to retrieve author with id "{}""#,
                req.id()
            ));
            FindAuthorError(err)
        })?;

        Ok(author)
    }

    async fn search_authors(
        &self,
        req: &SearchAuthorsRequest,
    ) -> Result<Vec<Author>, SearchAuthorsError> {
        let authors = sqlx::query_as(
            "SELECT id, name, birth_date, nationality FROM author \
             WHERE (?1 IS NULL OR instr(lower(name), lower(?1)) > 0) \
             AND (?2 IS NULL OR instr(lower(nationality), lower(?2)) > 0) \
             ORDER BY name, birth_date",
        )
        .bind(req.name())
        .bind(req.nationality())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context("Failed to search authors");
            SearchAuthorsError(err)
        })?;

        Ok(authors)
    }

    async fn update_author(&self, req: &UpdateAuthorRequest) -> Result<Author, UpdateAuthorError> {
        let author = sqlx::query_as(
            "UPDATE author SET name = ?, birth_date = ?, nationality = ? WHERE id = ? \
             RETURNING id, name, birth_date, nationality",
        )
        .bind(req.name().to_string())
        .bind(req.birth_date().as_date())
        .bind(req.nationality().to_string())
        .bind(req.id().as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                UpdateAuthorError::Duplicate {
                    name: req.name().to_string(),
                }
            } else {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to update author with id "{}""#, req.id()));
                UpdateAuthorError::Other(err)
            }
        })?;

        author.ok_or(UpdateAuthorError::NotFound { id: req.id() })
    }

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
        let result = sqlx::query("DELETE FROM author WHERE id = ?")
            .bind(req.id().as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                anyhow!(err).context(format!(r#"Failed to delete author with id "{}""#, req.id()))
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteAuthorError::NotFound { id: req.id() });
        }

        Ok(())
    }
}

fn is_in_memory(path: &str) -> bool {
    path.contains(":memory:") || path.contains("mode=memory")
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_unique_violation();
    }

    false
}
