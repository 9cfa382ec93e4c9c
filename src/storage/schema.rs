//! Schema initialization, run once at startup before any repository use.
//!
//! Creates the target database (through the server's `postgres` maintenance
//! database) and the car table when they are missing. Repeated runs are no-ops.

use crate::infra::config::{is_valid_ident, DatabaseSettings};
use crate::storage::StoreError;
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{Connection, PgExecutor, PgPool};
use std::time::Duration;

/// SQLSTATE raised when a concurrent CREATE DATABASE won the race.
const DUPLICATE_DATABASE: &str = "42P04";

/// What `initialize` had to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub created_database: bool,
    pub created_table: bool,
}

/// Ensures the database and table exist and returns the pool used for serving.
pub async fn initialize(settings: &DatabaseSettings) -> Result<(PgPool, SchemaReport), StoreError> {
    let created_database = ensure_database(settings).await?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(settings.connect_options())
        .await?;

    let created_table = ensure_table(&pool, &settings.table).await?;

    Ok((
        pool,
        SchemaReport {
            created_database,
            created_table,
        },
    ))
}

/// Returns true when the database had to be created.
pub async fn ensure_database(settings: &DatabaseSettings) -> Result<bool, StoreError> {
    let name = &settings.database;
    if !is_valid_ident(name) {
        return Err(StoreError::InvalidIdentifier(name.clone()));
    }

    let mut conn = PgConnection::connect_with(&settings.maintenance_options()).await?;
    let outcome = create_database_if_missing(&mut conn, name).await;
    conn.close().await?;
    outcome
}

async fn create_database_if_missing(
    conn: &mut PgConnection,
    name: &str,
) -> Result<bool, StoreError> {
    if database_exists(&mut *conn, name).await? {
        return Ok(false);
    }

    match sqlx::query(&format!("CREATE DATABASE {}", name))
        .execute(&mut *conn)
        .await
    {
        Ok(_) => {
            tracing::info!(database = %name, "Database created successfully");
            Ok(true)
        }
        Err(e) if is_duplicate_database(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub async fn database_exists<'e, E>(executor: E, name: &str) -> Result<bool, StoreError>
where
    E: PgExecutor<'e>,
{
    // Unquoted identifiers are folded to lower case by the server.
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(name.to_lowercase())
            .fetch_one(executor)
            .await?;
    Ok(exists)
}

/// Returns true when the table had to be created.
pub async fn ensure_table(pool: &PgPool, table: &str) -> Result<bool, StoreError> {
    if !is_valid_ident(table) {
        return Err(StoreError::InvalidIdentifier(table.to_string()));
    }
    let existed = table_exists(pool, table).await?;

    sqlx::query(&create_table_sql(table)).execute(pool).await?;

    if !existed {
        tracing::info!(table = %table, "Table created successfully");
    }
    Ok(!existed)
}

pub async fn table_exists<'e, E>(executor: E, table: &str) -> Result<bool, StoreError>
where
    E: PgExecutor<'e>,
{
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM information_schema.tables
             WHERE table_schema = current_schema() AND table_name = $1
         )",
    )
    .bind(table.to_lowercase())
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// DDL for the car table. `table` must already be a validated identifier.
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id SERIAL PRIMARY KEY,
            brand VARCHAR(100) NOT NULL,
            model VARCHAR(100) NOT NULL,
            year INTEGER NOT NULL,
            price NUMERIC(10, 2) NOT NULL
        )",
        table
    )
}

fn is_duplicate_database(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == DUPLICATE_DATABASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_uses_if_not_exists_and_expected_columns() {
        let sql = create_table_sql("cars");
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS cars ("));
        for column in [
            "id SERIAL PRIMARY KEY",
            "brand VARCHAR(100) NOT NULL",
            "model VARCHAR(100) NOT NULL",
            "year INTEGER NOT NULL",
            "price NUMERIC(10, 2) NOT NULL",
        ] {
            assert!(sql.contains(column), "missing column definition: {column}");
        }
    }
}
