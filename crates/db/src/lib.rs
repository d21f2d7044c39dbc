use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

pub mod crud;
pub mod entities;
pub mod error;
pub mod models;
pub mod repo;
pub mod types;

pub use sea_orm;
pub use sea_orm::{DatabaseConnection, DbErr};

const DEFAULT_DATABASE_URL: &str = "sqlite://worklog.sqlite?mode=rwc";

/// Shared database handle. Connecting applies pending migrations, so a
/// fresh database is usable immediately.
#[derive(Clone)]
pub struct DbService {
    pub conn: DatabaseConnection,
}

impl DbService {
    pub async fn new(database_url: &str) -> Result<DbService, DbErr> {
        let conn = Database::connect(database_url).await?;
        db_migration::Migrator::up(&conn, None).await?;
        Ok(DbService { conn })
    }

    /// Reads `DATABASE_URL` from the environment, falling back to a local
    /// SQLite file.
    pub async fn from_env() -> Result<DbService, DbErr> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self::new(&database_url).await
    }
}
