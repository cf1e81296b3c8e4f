//! # Stock Entry Backfill
//!
//! One-shot reconciliation for catalogs that predate the stock entry log.
//!
//! ## What It Does
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Backfill Reconciliation                          │
//! │                                                                     │
//! │  For every brand:                                                   │
//! │    ├── has stock entries already? ──► skip                          │
//! │    ├── quantity == 0?             ──► skip                          │
//! │    └── otherwise ──► synthesize ONE entry from the brand's          │
//! │                      current quantity/price, dated to the brand's   │
//! │                      original created_at                            │
//! │                                                                     │
//! │  Guarded by an app_meta marker: the job runs exactly once.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Once
//! A synthesized entry reflects the brand's quantity *now*, not the true
//! addition history. For a brand whose stock already moved, re-running
//! would under- or over-count the history, so the marker makes repeat
//! calls no-ops instead of "safe". This is a best-effort reconstruction,
//! not an authoritative one.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::{brand, stock_entry};
use theka_core::{week_key, Brand, StockEntry};

/// app_meta key recording that the backfill has completed.
const MARKER_KEY: &str = "stock_entry_backfill";

/// Outcome of a backfill run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillReport {
    /// True if the marker was already set and nothing was done.
    pub already_run: bool,
    /// Brands examined.
    pub brands_processed: usize,
    /// Entries synthesized in this run.
    pub entries_created: usize,
    pub message: String,
}

/// Synthesizes missing stock entries for brands that predate the log.
///
/// Idempotent via the completion marker: the first call does the work, any
/// later call reports `already_run` without touching the log.
pub async fn backfill_stock_entries(pool: &SqlitePool) -> DbResult<BackfillReport> {
    info!("Starting stock entry backfill");

    let mut tx = pool.begin().await?;

    let marker: Option<String> =
        sqlx::query_scalar("SELECT value FROM app_meta WHERE key = ?1")
            .bind(MARKER_KEY)
            .fetch_optional(&mut *tx)
            .await?;

    if let Some(completed_at) = marker {
        info!(completed_at = %completed_at, "Backfill already completed, skipping");
        return Ok(BackfillReport {
            already_run: true,
            brands_processed: 0,
            entries_created: 0,
            message: format!("Backfill already completed at {completed_at}"),
        });
    }

    let brands = sqlx::query_as::<_, Brand>(
        "SELECT id, name, brand_type, price_paise, quantity, created_at, updated_at \
         FROM brands ORDER BY created_at",
    )
    .fetch_all(&mut *tx)
    .await?;

    let now = Utc::now();
    let brands_processed = brands.len();
    let mut entries_created = 0;

    for b in brands {
        if b.quantity == 0 {
            continue;
        }
        if stock_entry::exists_for_brand(&mut *tx, &b.id).await? {
            continue;
        }

        debug!(brand = %b.label(), quantity = %b.quantity, "Synthesizing stock entry");

        let entry = StockEntry {
            id: stock_entry::generate_entry_id(),
            brand_id: b.id.clone(),
            brand_name: b.name.clone(),
            brand_type: b.brand_type.clone(),
            quantity: b.quantity,
            price_paise: b.price_paise,
            total_value_paise: b.total_value().paise(),
            // The addition is dated to when the brand entered the catalog;
            // the week key reflects the backfill run itself.
            added_date: b.created_at,
            week_of_year: week_key(now),
            created_at: now,
        };
        stock_entry::insert(&mut *tx, &entry).await?;
        entries_created += 1;
    }

    sqlx::query("INSERT INTO app_meta (key, value, updated_at) VALUES (?1, ?2, ?3)")
        .bind(MARKER_KEY)
        .bind(now.to_rfc3339())
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        brands = %brands_processed,
        created = %entries_created,
        "Backfill complete"
    );

    Ok(BackfillReport {
        already_run: false,
        brands_processed,
        entries_created,
        message: format!(
            "Migration completed successfully. Created {entries_created} stock entries for existing brands."
        ),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
