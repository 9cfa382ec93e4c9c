//! PostgreSQL car repository.
//!
//! The table name comes from configuration and is checked to be a plain
//! identifier before it is ever interpolated; every user-supplied value is bound.

use crate::domain::{Car, CarDraft};
use crate::infra::config::is_valid_ident;
use crate::storage::{CarStore, StoreError, WriteOutcome};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const COLUMNS: &str = "id, brand, model, year, price";

/// Car repository backed by a shared connection pool.
#[derive(Clone)]
pub struct PgCarRepository {
    pool: PgPool,
    table: String,
}

impl PgCarRepository {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, StoreError> {
        let table = table.into();
        if !is_valid_ident(&table) {
            return Err(StoreError::InvalidIdentifier(table));
        }
        Ok(Self { pool, table })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

/// Wraps a search term in `%..%`, escaping LIKE metacharacters so the term
/// matches literally. The empty term becomes `%%`, which matches every row.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn car_from_row(row: &PgRow) -> Result<Car, sqlx::Error> {
    Ok(Car {
        id: row.try_get("id")?,
        brand: row.try_get("brand")?,
        model: row.try_get("model")?,
        year: row.try_get("year")?,
        price: row.try_get("price")?,
    })
}

fn to_i64_limit(limit: u32) -> i64 {
    i64::from(limit)
}

fn to_i64_offset(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

#[async_trait]
impl CarStore for PgCarRepository {
    async fn insert(&self, draft: &CarDraft) -> Result<i32, StoreError> {
        let sql = format!(
            "INSERT INTO {} (brand, model, year, price) VALUES ($1, $2, $3, $4) RETURNING id",
            self.table
        );
        let id: i32 = sqlx::query_scalar(&sql)
            .bind(&draft.brand)
            .bind(&draft.model)
            .bind(draft.year)
            .bind(draft.price)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn list(&self, limit: u32, offset: u64) -> Result<Vec<Car>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id ASC LIMIT $1 OFFSET $2",
            COLUMNS, self.table
        );
        let rows = sqlx::query(&sql)
            .bind(to_i64_limit(limit))
            .bind(to_i64_offset(offset))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| car_from_row(r).map_err(StoreError::from))
            .collect()
    }

    async fn search(&self, term: &str, limit: u32, offset: u64) -> Result<Vec<Car>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {}
             WHERE brand ILIKE $1 ESCAPE '\\' OR model ILIKE $1 ESCAPE '\\'
             ORDER BY id ASC LIMIT $2 OFFSET $3",
            COLUMNS, self.table
        );
        let rows = sqlx::query(&sql)
            .bind(like_pattern(term))
            .bind(to_i64_limit(limit))
            .bind(to_i64_offset(offset))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| car_from_row(r).map_err(StoreError::from))
            .collect()
    }

    async fn update(&self, id: i32, draft: &CarDraft) -> Result<WriteOutcome, StoreError> {
        let sql = format!(
            "UPDATE {} SET brand = $1, model = $2, year = $3, price = $4 WHERE id = $5",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(&draft.brand)
            .bind(&draft.model)
            .bind(draft.year)
            .bind(draft.price)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
        })
    }

    async fn delete(&self, id: i32) -> Result<WriteOutcome, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
        })
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let n: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn count_matching(&self, term: &str) -> Result<u64, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE brand ILIKE $1 ESCAPE '\\' OR model ILIKE $1 ESCAPE '\\'",
            self.table
        );
        let n: i64 = sqlx::query_scalar(&sql)
            .bind(like_pattern(term))
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Car>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, self.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(car_from_row).transpose()?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
