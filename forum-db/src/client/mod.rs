use forum_common::model::ModelValidationError;
use sqlx::{PgPool, error::ErrorKind, migrate::MigrateError, postgres::PgPoolOptions};
use thiserror::Error;
use tracing::info;

mod forums;
mod posts;
mod service;
mod threads;
mod users;
mod votes;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("Unique constraint {0} was violated")]
    UniqueViolation(String),
    #[error("Foreign key constraint {0} was violated")]
    ForeignKeyViolation(String),
    #[error("Inserted {expected} rows but the database returned {returned}")]
    InsertCountMismatch { expected: usize, returned: usize },
    #[error("Migrating the database failed: {0}")]
    Migrate(#[from] MigrateError),
    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_owned();
            match db_err.kind() {
                ErrorKind::UniqueViolation => return DbError::UniqueViolation(constraint),
                ErrorKind::ForeignKeyViolation => return DbError::ForeignKeyViolation(constraint),
                _ => {}
            }
        }

        DbError::Sqlx(err)
    }
}

/// Postgres backed implementation of every store trait in [`crate::store`].
#[derive(Clone, Debug)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        let migrator = sqlx::migrate!("./migrations");
        migrator.run(&self.pool).await?;
        info!(migrations = migrator.iter().count(), "Database schema is current");
        Ok(())
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
