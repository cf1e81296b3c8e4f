//! # Stock Entry Repository
//!
//! The append-only log of stock additions.
//!
//! Rows are written by [`crate::ledger::Ledger::add_stock`] and the one-shot
//! [`crate::backfill`] job, read by the weekly history view, and never
//! updated or deleted. Brand name/type/price are snapshots frozen at insert
//! time, so this log stays truthful after catalog prices move.

use sqlx::sqlite::Sqlite;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use theka_core::StockEntry;

const ENTRY_COLUMNS: &str = "id, brand_id, brand_name, brand_type, quantity, price_paise, \
                             total_value_paise, added_date, week_of_year, created_at";

/// Repository for the stock addition log.
#[derive(Debug, Clone)]
pub struct StockEntryRepository {
    pool: SqlitePool,
}

impl StockEntryRepository {
    /// Creates a new StockEntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockEntryRepository { pool }
    }

    /// Lists all stock entries, newest week first, newest entry first
    /// within a week.
    ///
    /// This is the exact order the weekly history view consumes, so the
    /// grouping pass can walk the rows once.
    pub async fn list_all(&self) -> DbResult<Vec<StockEntry>> {
        let entries = sqlx::query_as::<_, StockEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM stock_entries \
             ORDER BY week_of_year DESC, added_date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Lists stock entries for one brand, newest first.
    pub async fn list_for_brand(&self, brand_id: &str) -> DbResult<Vec<StockEntry>> {
        let entries = sqlx::query_as::<_, StockEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM stock_entries \
             WHERE brand_id = ?1 \
             ORDER BY added_date DESC"
        ))
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Counts stock entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_entries")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new stock entry ID.
pub fn generate_entry_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Query functions (shared between repository and ledger transactions)
// =============================================================================

/// Appends a stock entry.
pub(crate) async fn insert<'e, E>(exec: E, entry: &StockEntry) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(
        brand = %entry.brand_name,
        quantity = %entry.quantity,
        week = %entry.week_of_year,
        "Recording stock entry"
    );

    sqlx::query(
        "INSERT INTO stock_entries ( \
             id, brand_id, brand_name, brand_type, quantity, price_paise, \
             total_value_paise, added_date, week_of_year, created_at \
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&entry.id)
    .bind(&entry.brand_id)
    .bind(&entry.brand_name)
    .bind(&entry.brand_type)
    .bind(entry.quantity)
    .bind(entry.price_paise)
    .bind(entry.total_value_paise)
    .bind(entry.added_date)
    .bind(&entry.week_of_year)
    .bind(entry.created_at)
    .execute(exec)
    .await?;

    Ok(())
}

/// Checks whether any stock entry references the given brand.
///
/// Used by the backfill job to find brands that predate the log.
pub(crate) async fn exists_for_brand<'e, E>(exec: E, brand_id: &str) -> DbResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_entries WHERE brand_id = ?1 LIMIT 1")
            .bind(brand_id)
            .fetch_one(exec)
            .await?;

    Ok(count > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::brand;
    use chrono::Utc;
    use theka_core::{week_key, Brand};

    async fn seeded_brand(db: &Database) -> Brand {
        let now = Utc::now();
        let b = Brand {
            id: brand::generate_brand_id(),
            name: "Royal Stag".to_string(),
            brand_type: "750ml".to_string(),
            price_paise: 120_000,
            quantity: 5,
            created_at: now,
            updated_at: now,
        };
        brand::insert(db.pool(), &b).await.unwrap();
        b
    }

    fn entry_for(b: &Brand, quantity: i64) -> StockEntry {
        let now = Utc::now();
        StockEntry {
            id: generate_entry_id(),
            brand_id: b.id.clone(),
            brand_name: b.name.clone(),
            brand_type: b.brand_type.clone(),
            quantity,
            price_paise: b.price_paise,
            total_value_paise: quantity * b.price_paise,
            added_date: now,
            week_of_year: week_key(now),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let b = seeded_brand(&db).await;

        insert(db.pool(), &entry_for(&b, 5)).await.unwrap();
        insert(db.pool(), &entry_for(&b, 3)).await.unwrap();

        let entries = db.stock_entries().list_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].brand_name, "Royal Stag");

        let for_brand = db.stock_entries().list_for_brand(&b.id).await.unwrap();
        assert_eq!(for_brand.len(), 2);

        assert_eq!(db.stock_entries().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_exists_for_brand() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let b = seeded_brand(&db).await;

        assert!(!exists_for_brand(db.pool(), &b.id).await.unwrap());

        insert(db.pool(), &entry_for(&b, 5)).await.unwrap();

        assert!(exists_for_brand(db.pool(), &b.id).await.unwrap());
    }
}
