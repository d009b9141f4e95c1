use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::errors::InternalError;

/// Connect to the items database.
///
/// Does NOT run migrations; call [`migrate_database`] separately.
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);
    Ok(db)
}

/// Run all pending migrations.
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Database migrations completed");
    Ok(())
}
