//! # Brand Repository
//!
//! Database operations for the brand catalog.
//!
//! ## Stock Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Stock Update Strategy                           │
//! │                                                                     │
//! │  ❌ WRONG: read quantity, compute, write absolute value             │
//! │     (two racing sales can both pass the stock check)                │
//! │                                                                     │
//! │  ✅ CORRECT: conditional decrement                                  │
//! │     UPDATE brands SET quantity = quantity - ?2                      │
//! │     WHERE id = ?1 AND quantity >= ?2                                │
//! │                                                                     │
//! │  rows_affected == 0 means the stock was not there - the caller      │
//! │  rejects the sale instead of driving quantity negative.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The free functions at the bottom are the single home of the brand SQL.
//! They are generic over the executor so the [`crate::ledger`] can run them
//! inside its transactions while the repository methods run them on the pool.

use chrono::{DateTime, Utc};
use sqlx::sqlite::Sqlite;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use theka_core::Brand;

const BRAND_COLUMNS: &str = "id, name, brand_type, price_paise, quantity, created_at, updated_at";

/// Repository for brand catalog reads and simple writes.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.brands();
/// let brand = repo.get_by_id("uuid-here").await?;
/// let matches = repo.search("royal").await?;
/// ```
#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    /// Creates a new BrandRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BrandRepository { pool }
    }

    /// Gets a brand by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Brand))` - Brand found
    /// * `Ok(None)` - Brand not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Brand>> {
        fetch_by_id(&self.pool, id).await
    }

    /// Gets a brand by its exact (name, type) identity.
    pub async fn get_by_name_type(&self, name: &str, brand_type: &str) -> DbResult<Option<Brand>> {
        fetch_by_name_type(&self.pool, name, brand_type).await
    }

    /// Lists all brands ordered by name (stock page order).
    pub async fn list_by_name(&self) -> DbResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands ORDER BY name, brand_type"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    /// Lists all brands, most recently updated first (selling page order).
    pub async fn list_recent(&self) -> DbResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    /// Searches brands by case-insensitive substring over name and type.
    ///
    /// Capped at 10 results - the selling page shows a short pick list, not
    /// a browse view.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Brand>> {
        let term = term.trim().to_lowercase();

        debug!(term = %term, "Searching brands");

        if term.is_empty() {
            return self.list_by_name().await;
        }

        // instr() instead of LIKE: the search term is user input and must
        // not smuggle in wildcard characters.
        let brands = sqlx::query_as::<_, Brand>(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands \
             WHERE instr(lower(name), ?1) > 0 OR instr(lower(brand_type), ?1) > 0 \
             ORDER BY name, brand_type \
             LIMIT 10"
        ))
        .bind(&term)
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    /// Counts catalog rows (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brands")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new brand ID.
pub fn generate_brand_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Query functions (shared between repository and ledger transactions)
// =============================================================================

/// Fetches a brand by ID.
pub(crate) async fn fetch_by_id<'e, E>(exec: E, id: &str) -> DbResult<Option<Brand>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let brand = sqlx::query_as::<_, Brand>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;

    Ok(brand)
}

/// Fetches a brand by its exact (name, type) identity.
pub(crate) async fn fetch_by_name_type<'e, E>(
    exec: E,
    name: &str,
    brand_type: &str,
) -> DbResult<Option<Brand>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let brand = sqlx::query_as::<_, Brand>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE name = ?1 AND brand_type = ?2"
    ))
    .bind(name)
    .bind(brand_type)
    .fetch_optional(exec)
    .await?;

    Ok(brand)
}

/// Inserts a new brand row.
pub(crate) async fn insert<'e, E>(exec: E, brand: &Brand) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(name = %brand.name, brand_type = %brand.brand_type, "Inserting brand");

    sqlx::query(
        "INSERT INTO brands (id, name, brand_type, price_paise, quantity, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&brand.id)
    .bind(&brand.name)
    .bind(&brand.brand_type)
    .bind(brand.price_paise)
    .bind(brand.quantity)
    .bind(brand.created_at)
    .bind(brand.updated_at)
    .execute(exec)
    .await?;

    Ok(())
}

/// Applies a restock: adds to quantity and overwrites the price with the
/// latest purchase price.
///
/// ## Returns
/// `true` if a row was updated, `false` if the brand does not exist.
pub(crate) async fn apply_restock<'e, E>(
    exec: E,
    id: &str,
    added: i64,
    price_paise: i64,
    now: DateTime<Utc>,
) -> DbResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, added = %added, "Restocking brand");

    let result = sqlx::query(
        "UPDATE brands SET quantity = quantity + ?2, price_paise = ?3, updated_at = ?4 \
         WHERE id = ?1",
    )
    .bind(id)
    .bind(added)
    .bind(price_paise)
    .bind(now)
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Conditionally decrements stock: succeeds only if at least `quantity`
/// bottles are on hand, so the stored quantity can never go negative.
///
/// ## Returns
/// `true` if the decrement was applied, `false` if stock was insufficient
/// (or the brand does not exist).
pub(crate) async fn try_decrement<'e, E>(
    exec: E,
    id: &str,
    quantity: i64,
    now: DateTime<Utc>,
) -> DbResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, quantity = %quantity, "Decrementing stock");

    let result = sqlx::query(
        "UPDATE brands SET quantity = quantity - ?2, updated_at = ?3 \
         WHERE id = ?1 AND quantity >= ?2",
    )
    .bind(id)
    .bind(quantity)
    .bind(now)
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Increments stock (transaction deletion restores bottles).
///
/// ## Returns
/// `true` if a row was updated, `false` if the brand no longer exists.
pub(crate) async fn increment<'e, E>(
    exec: E,
    id: &str,
    quantity: i64,
    now: DateTime<Utc>,
) -> DbResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, quantity = %quantity, "Restoring stock");

    let result = sqlx::query(
        "UPDATE brands SET quantity = quantity + ?2, updated_at = ?3 WHERE id = ?1",
    )
    .bind(id)
    .bind(quantity)
    .bind(now)
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Forces a brand's quantity to zero ("remove everything" sentinel).
pub(crate) async fn force_zero<'e, E>(exec: E, id: &str, now: DateTime<Utc>) -> DbResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, "Zeroing brand stock");

    let result = sqlx::query("UPDATE brands SET quantity = 0, updated_at = ?2 WHERE id = ?1")
        .bind(id)
        .bind(now)
        .execute(exec)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================
