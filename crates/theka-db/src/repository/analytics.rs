//! # Analytics Repository
//!
//! Read-only aggregation over the catalog and the two logs.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Aggregation Queries                             │
//! │                                                                     │
//! │  brands ───────────────► stock_levels()        (status + value)     │
//! │                                                                     │
//! │  stock_entries ────────► weekly_stock_history() (group by ISO week) │
//! │                                                                     │
//! │  transactions ──┬──────► summary(from, to)                          │
//! │  brands ────────┘        revenue, bottles, payment split,           │
//! │                          stock counters, top sellers                │
//! │                                                                     │
//! │  Pure projections - aggregation never writes.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Revenue math walks both transaction shapes through exhaustive matches
//! on [`TransactionItems`] - a new shape would fail to compile here rather
//! than silently drop out of the numbers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::brand::BrandRepository;
use crate::repository::stock_entry::StockEntryRepository;
use crate::repository::transaction::TransactionRepository;
use theka_core::{Brand, PaymentMethod, StockEntry, StockStatus, TransactionItems};

// =============================================================================
// Result Types
// =============================================================================

/// A brand annotated with its derived stock status and on-hand value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    #[serde(flatten)]
    pub brand: Brand,
    pub stock_status: StockStatus,
    pub total_value_paise: i64,
}

/// One calendar week of stock additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGroup {
    /// ISO week key, e.g. "2026-W32".
    pub week: String,
    /// Sum of entry total values in this week, in paise.
    pub total_value_paise: i64,
    /// The entries, newest first.
    pub entries: Vec<StockEntry>,
}

/// One brand's row in the top-sellers list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBrand {
    pub brand_name: String,
    pub brand_type: String,
    /// Bottles sold across all matching transactions.
    pub quantity: i64,
    /// Revenue across all matching transactions, in paise.
    pub revenue_paise: i64,
}

/// Sales and stock metrics over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_revenue_paise: i64,
    pub total_transactions: i64,
    pub total_bottles_sold: i64,
    pub cash_revenue_paise: i64,
    pub upi_revenue_paise: i64,

    // Stock counters cover the CURRENT catalog, not the date window -
    // "how is my shelf right now" alongside "how did the window sell".
    pub total_brands: i64,
    pub total_stock: i64,
    pub out_of_stock_brands: i64,
    pub low_stock_brands: i64,

    /// Top 5 brands by bottles sold in the window.
    pub top_selling_brands: Vec<TopBrand>,
}

// =============================================================================
// Repository
// =============================================================================

/// Read-only aggregation queries.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// All brands ordered by name, each annotated with stock status and
    /// on-hand value.
    pub async fn stock_levels(&self) -> DbResult<Vec<StockLevel>> {
        let brands = BrandRepository::new(self.pool.clone()).list_by_name().await?;

        Ok(brands
            .into_iter()
            .map(|brand| StockLevel {
                stock_status: brand.stock_status(),
                total_value_paise: brand.total_value().paise(),
                brand,
            })
            .collect())
    }

    /// Stock additions grouped by ISO week, newest week first.
    ///
    /// The sum of group totals always equals the sum over all entries -
    /// grouping only partitions the log.
    pub async fn weekly_stock_history(&self) -> DbResult<Vec<WeekGroup>> {
        let entries = StockEntryRepository::new(self.pool.clone()).list_all().await?;

        // Entries arrive sorted by week key descending, so one pass over
        // consecutive runs builds the groups already in display order.
        let mut groups: Vec<WeekGroup> = Vec::new();

        for entry in entries {
            match groups.last_mut() {
                Some(group) if group.week == entry.week_of_year => {
                    group.total_value_paise += entry.total_value_paise;
                    group.entries.push(entry);
                }
                _ => {
                    groups.push(WeekGroup {
                        week: entry.week_of_year.clone(),
                        total_value_paise: entry.total_value_paise,
                        entries: vec![entry],
                    });
                }
            }
        }

        Ok(groups)
    }

    /// Sales and stock metrics over an inclusive date window (both bounds
    /// optional).
    pub async fn summary(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<AnalyticsSummary> {
        debug!(?from, ?to, "Computing analytics summary");

        let transactions = TransactionRepository::new(self.pool.clone())
            .list_in_range(from, to)
            .await?;
        let brands = BrandRepository::new(self.pool.clone()).list_by_name().await?;

        let total_revenue_paise = transactions.iter().map(|t| t.total_amount_paise).sum();
        let total_transactions = transactions.len() as i64;
        let total_bottles_sold = transactions.iter().map(|t| t.bottles_sold()).sum();

        let revenue_by = |method: PaymentMethod| -> i64 {
            transactions
                .iter()
                .filter(|t| t.payment_method == method)
                .map(|t| t.total_amount_paise)
                .sum()
        };
        let cash_revenue_paise = revenue_by(PaymentMethod::Cash);
        let upi_revenue_paise = revenue_by(PaymentMethod::Upi);

        let total_brands = brands.len() as i64;
        let total_stock = brands.iter().map(|b| b.quantity).sum();
        let out_of_stock_brands = brands
            .iter()
            .filter(|b| b.stock_status() == StockStatus::Out)
            .count() as i64;
        let low_stock_brands = brands
            .iter()
            .filter(|b| b.stock_status() == StockStatus::Low)
            .count() as i64;

        let top_selling_brands = top_sellers(&transactions, 5);

        Ok(AnalyticsSummary {
            total_revenue_paise,
            total_transactions,
            total_bottles_sold,
            cash_revenue_paise,
            upi_revenue_paise,
            total_brands,
            total_stock,
            out_of_stock_brands,
            low_stock_brands,
            top_selling_brands,
        })
    }
}

/// Groups sales by (name, type) across both transaction shapes and returns
/// the `limit` best sellers.
///
/// Ordering: bottles sold descending, then revenue descending, then label
/// ascending - the secondary keys make equal-quantity results stable.
fn top_sellers(transactions: &[theka_core::Transaction], limit: usize) -> Vec<TopBrand> {
    let mut by_brand: HashMap<(String, String), (i64, i64)> = HashMap::new();

    for tx in transactions {
        match &tx.items {
            TransactionItems::Single(line) => {
                let slot = by_brand
                    .entry((line.brand_name.clone(), line.brand_type.clone()))
                    .or_default();
                slot.0 += line.quantity;
                slot.1 += line.line_total_paise;
            }
            TransactionItems::Multi(lines) => {
                for line in lines {
                    let slot = by_brand
                        .entry((line.brand_name.clone(), line.brand_type.clone()))
                        .or_default();
                    slot.0 += line.quantity;
                    slot.1 += line.line_total_paise;
                }
            }
        }
    }

    let mut top: Vec<TopBrand> = by_brand
        .into_iter()
        .map(|((brand_name, brand_type), (quantity, revenue_paise))| TopBrand {
            brand_name,
            brand_type,
            quantity,
            revenue_paise,
        })
        .collect();

    top.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then(b.revenue_paise.cmp(&a.revenue_paise))
            .then_with(|| {
                (a.brand_name.as_str(), a.brand_type.as_str())
                    .cmp(&(b.brand_name.as_str(), b.brand_type.as_str()))
            })
    });
    top.truncate(limit);
    top
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ledger::{CartItem, Ledger};
    use crate::pool::{Database, DbConfig};
    use theka_core::{Money, SaleLine, SharedSecret, Transaction};

    fn line(name: &str, quantity: i64, price_paise: i64) -> SaleLine {
        SaleLine {
            brand_id: format!("id-{name}"),
            brand_name: name.to_string(),
            brand_type: "750ml".to_string(),
            quantity,
            price_paise,
            line_total_paise: quantity * price_paise,
        }
    }

    fn single(name: &str, quantity: i64, price_paise: i64) -> Transaction {
        let l = line(name, quantity, price_paise);
        Transaction {
            id: format!("tx-{name}-{quantity}"),
            total_amount_paise: l.line_total_paise,
            items: TransactionItems::Single(l),
            payment_method: PaymentMethod::Cash,
            customer_name: None,
            customer_phone: None,
            created_at: Utc::now(),
        }
    }

    fn multi(lines: Vec<SaleLine>) -> Transaction {
        let total = lines.iter().map(|l| l.line_total_paise).sum();
        Transaction {
            id: format!("tx-multi-{}", lines.len()),
            items: TransactionItems::Multi(lines),
            total_amount_paise: total,
            payment_method: PaymentMethod::Upi,
            customer_name: None,
            customer_phone: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_top_sellers_merges_both_shapes() {
        let transactions = vec![
            single("Royal Stag", 3, 120_000),
            multi(vec![line("Royal Stag", 2, 120_000), line("Old Monk", 4, 90_000)]),
        ];

        let top = top_sellers(&transactions, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].brand_name, "Royal Stag");
        assert_eq!(top[0].quantity, 5);
        assert_eq!(top[0].revenue_paise, 600_000);
        assert_eq!(top[1].brand_name, "Old Monk");
        assert_eq!(top[1].quantity, 4);
    }

    #[test]
    fn test_top_sellers_tie_break() {
        // Equal quantities: higher revenue wins; equal revenue: name order.
        let transactions = vec![
            single("Blenders Pride", 2, 150_000),
            single("Royal Stag", 2, 120_000),
            single("Imperial Blue", 2, 120_000),
        ];

        let top = top_sellers(&transactions, 5);
        assert_eq!(top[0].brand_name, "Blenders Pride");
        assert_eq!(top[1].brand_name, "Imperial Blue");
        assert_eq!(top[2].brand_name, "Royal Stag");
    }

    #[test]
    fn test_top_sellers_limit() {
        let transactions: Vec<Transaction> = (0..8)
            .map(|i| single(&format!("Brand{i}"), i + 1, 100_000))
            .collect();

        let top = top_sellers(&transactions, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].quantity, 8);
    }

    // -------------------------------------------------------------------------
    // Database-backed tests
    // -------------------------------------------------------------------------

    async fn shop() -> (Database, Ledger) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = db.ledger(Arc::new(SharedSecret::new("theka123")));
        (db, ledger)
    }

    #[tokio::test]
    async fn test_stock_levels_status_and_order() {
        let (db, ledger) = shop().await;
        ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 10)
            .await
            .unwrap();
        ledger
            .add_stock("Old Monk", "1L", Money::from_rupees(900), 3)
            .await
            .unwrap();
        let gone = ledger
            .add_stock("Absolut", "750ml", Money::from_rupees(2400), 2)
            .await
            .unwrap();
        ledger
            .remove_stock(&gone.brand_id, 99_999, "theka123")
            .await
            .unwrap();

        let levels = db.analytics().stock_levels().await.unwrap();
        assert_eq!(levels.len(), 3);

        // Ordered by name.
        assert_eq!(levels[0].brand.name, "Absolut");
        assert_eq!(levels[1].brand.name, "Old Monk");
        assert_eq!(levels[2].brand.name, "Royal Stag");

        assert_eq!(levels[0].stock_status, StockStatus::Out);
        assert_eq!(levels[0].total_value_paise, 0);
        assert_eq!(levels[1].stock_status, StockStatus::Low);
        assert_eq!(levels[2].stock_status, StockStatus::Good);
        assert_eq!(levels[2].total_value_paise, 10 * 120_000);
    }

    #[tokio::test]
    async fn test_weekly_history_partitions_the_log() {
        let (db, ledger) = shop().await;
        ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();
        ledger
            .add_stock("Old Monk", "1L", Money::from_rupees(900), 4)
            .await
            .unwrap();
        ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 2)
            .await
            .unwrap();

        let groups = db.analytics().weekly_stock_history().await.unwrap();

        // All entries land in the current week in this test, but the
        // partition property holds regardless of how many groups exist:
        // group totals sum to the total over all entries.
        let group_total: i64 = groups.iter().map(|g| g.total_value_paise).sum();
        let entry_total: i64 = db
            .stock_entries()
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|e| e.total_value_paise)
            .sum();
        assert_eq!(group_total, entry_total);
        assert_eq!(entry_total, 5 * 120_000 + 4 * 90_000 + 2 * 120_000);

        let entry_count: usize = groups.iter().map(|g| g.entries.len()).sum();
        assert_eq!(entry_count, 3);

        // Groups are sorted strictly descending by week key.
        for pair in groups.windows(2) {
            assert!(pair[0].week > pair[1].week);
        }

        // Per-group total matches its own entries.
        for group in &groups {
            let sum: i64 = group.entries.iter().map(|e| e.total_value_paise).sum();
            assert_eq!(group.total_value_paise, sum);
        }
    }

    #[tokio::test]
    async fn test_summary_merges_shapes_and_splits_payment() {
        let (db, ledger) = shop().await;
        let stag = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 10)
            .await
            .unwrap();
        let monk = ledger
            .add_stock("Old Monk", "1L", Money::from_rupees(900), 8)
            .await
            .unwrap();

        // One single-shape cash sale, one multi-shape UPI cart.
        ledger
            .sell(&stag.brand_id, 3, PaymentMethod::Cash, None, None)
            .await
            .unwrap();
        ledger
            .checkout_cart(
                &[
                    CartItem {
                        brand_id: stag.brand_id.clone(),
                        quantity: 2,
                    },
                    CartItem {
                        brand_id: monk.brand_id.clone(),
                        quantity: 4,
                    },
                ],
                PaymentMethod::Upi,
                None,
                None,
            )
            .await
            .unwrap();

        let summary = db.analytics().summary(None, None).await.unwrap();

        assert_eq!(summary.total_transactions, 2);
        // Bottles: 3 (single) + 2 + 4 (multi).
        assert_eq!(summary.total_bottles_sold, 9);
        assert_eq!(summary.cash_revenue_paise, 360_000);
        assert_eq!(summary.upi_revenue_paise, 240_000 + 360_000);
        assert_eq!(
            summary.total_revenue_paise,
            summary.cash_revenue_paise + summary.upi_revenue_paise
        );

        // Current-catalog stock counters.
        assert_eq!(summary.total_brands, 2);
        assert_eq!(summary.total_stock, 5 + 4);
        assert_eq!(summary.out_of_stock_brands, 0);
        assert_eq!(summary.low_stock_brands, 2);

        // Royal Stag sold 5 across both shapes, Old Monk 4.
        assert_eq!(summary.top_selling_brands.len(), 2);
        assert_eq!(summary.top_selling_brands[0].brand_name, "Royal Stag");
        assert_eq!(summary.top_selling_brands[0].quantity, 5);
        assert_eq!(summary.top_selling_brands[0].revenue_paise, 600_000);
        assert_eq!(summary.top_selling_brands[1].quantity, 4);
    }

    #[tokio::test]
    async fn test_summary_date_window_excludes_sales() {
        let (db, ledger) = shop().await;
        let stag = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 10)
            .await
            .unwrap();
        ledger
            .sell(&stag.brand_id, 1, PaymentMethod::Cash, None, None)
            .await
            .unwrap();

        let future = Utc::now() + chrono::Duration::days(1);
        let summary = db.analytics().summary(Some(future), None).await.unwrap();

        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.total_revenue_paise, 0);
        assert!(summary.top_selling_brands.is_empty());

        // Stock counters still reflect the catalog, not the window.
        assert_eq!(summary.total_brands, 1);
        assert_eq!(summary.total_stock, 9);
    }
}
