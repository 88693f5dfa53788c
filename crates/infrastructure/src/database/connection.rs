use crate::config::DatabaseConfig;
use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Open the configured database and bring its schema up to date
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options.sqlx_logging(false);

    if config.is_sqlite() {
        options.max_connections(1); // SQLite is single-writer
    } else {
        options.max_connections(config.max_connections);
    }

    info!(backend = if config.is_sqlite() { "sqlite" } else { "postgres" }, "Connecting to database...");
    let db = Database::connect(options).await?;

    if config.run_migrations {
        info!("Running database migrations...");
        Migrator::up(&db, None).await?;
        info!("✅ Migrations applied successfully");
    }

    Ok(db)
}
