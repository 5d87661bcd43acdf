use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Error, Debug)]
pub enum DbSetupError {
    #[error("Failed to connect to database: {0}")]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("Failed to run migrations: {0}")]
    Migration(String),
}

/// Opens the database and brings its schema up to date.
pub fn establish_connection(database_url: &str) -> Result<SqliteConnection, DbSetupError> {
    let mut connection = SqliteConnection::establish(database_url)?;
    run_migrations(&mut connection)?;
    Ok(connection)
}

pub fn run_migrations(connection: &mut SqliteConnection) -> Result<(), DbSetupError> {
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| DbSetupError::Migration(err.to_string()))?;
    Ok(())
}
