use std::time::Duration;

use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

pub mod entities;
pub mod events;
pub mod models;
pub mod retry;
pub mod types;

pub use sea_orm::{
    ConnectionTrait, DatabaseConnection as DbPool, DatabaseTransaction, DbErr, TransactionTrait,
};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://helpdesk.sqlite?mode=rwc";

#[derive(Clone)]
pub struct DBService {
    pub pool: DbPool,
}

impl DBService {
    /// Connects to `database_url` and brings the schema up to date.
    pub async fn new(database_url: &str) -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options
            .connect_timeout(Duration::from_secs(30))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(false);

        let pool = Database::connect(options).await?;
        db_migration::Migrator::up(&pool, None).await?;
        tracing::debug!(backend = ?pool.get_database_backend(), "Database ready");
        Ok(DBService { pool })
    }
}
