//! # Ledger Operations
//!
//! The mutation surface of Theka POS: every write to the catalog and the
//! two logs goes through here.
//!
//! ## Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 One Operation = One Transaction                     │
//! │                                                                     │
//! │  checkout_cart(items, ...)                                          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  BEGIN ──────────────────────────────────────────────┐              │
//! │  │  Phase 1: validate EVERY item                     │              │
//! │  │    ├── brand exists?          → BrandNotFound     │              │
//! │  │    └── stock sufficient?      → InsufficientStock │              │
//! │  │  Phase 2: write                                   │              │
//! │  │    ├── INSERT transaction + line rows             │              │
//! │  │    └── conditional decrement per brand            │              │
//! │  │         (UPDATE ... WHERE quantity >= n)          │              │
//! │  COMMIT ◄─── all succeeded                           │              │
//! │  ROLLBACK ◄─ any step failed (drop the transaction)  │              │
//! │  └───────────────────────────────────────────────────┘              │
//! │                                                                     │
//! │  INVARIANT: no observable state ever shows a negative quantity or   │
//! │  a sale applied to only some of its brands.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Owner Gate
//! Destructive operations (remove_stock, delete_transaction) verify the
//! presented password through [`OwnerAuth`] before touching any state.
//!
//! ## Idempotency
//! None of these operations are idempotent. Retrying a timed-out add_stock
//! or checkout_cart double-applies its effects; retry policy belongs to the
//! caller.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::repository::{brand, stock_entry, transaction};
use theka_core::{
    validation, week_key, Brand, CoreError, Money, OwnerAuth, PaymentMethod, SaleLine,
    StockEntry, Transaction, TransactionItems, REMOVE_ALL_THRESHOLD,
};

// =============================================================================
// Inputs
// =============================================================================

/// One requested cart line: which brand and how many bottles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub brand_id: String,
    pub quantity: i64,
}

// =============================================================================
// Receipts
// =============================================================================

/// Result of a stock addition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStockReceipt {
    pub brand_id: String,
    pub message: String,
    /// Value of the bottles added in this call, in paise.
    pub total_value_paise: i64,
    /// True if this call created the brand.
    pub new_brand: bool,
}

/// Result of a single-item sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub transaction_id: String,
    pub total_amount_paise: i64,
    pub message: String,
    pub remaining_stock: i64,
}

/// Result of a cart checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartReceipt {
    pub transaction_id: String,
    pub total_amount_paise: i64,
    pub item_count: usize,
    pub message: String,
    pub items: Vec<SaleLine>,
}

/// Result of a stock removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveStockReceipt {
    pub message: String,
    /// Bottles actually removed (equals prior stock for sentinel removal).
    pub removed: i64,
    /// Bottles left after the removal.
    pub remaining: i64,
}

/// Result of a transaction deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTransactionReceipt {
    pub message: String,
    /// Bottles returned to the catalog.
    pub restored: i64,
}

// =============================================================================
// Ledger
// =============================================================================

/// The ledger mutation surface.
///
/// Holds the pool plus the owner-auth gate; cheap to clone per call site.
#[derive(Clone)]
pub struct Ledger {
    pool: SqlitePool,
    auth: Arc<dyn OwnerAuth>,
}

impl Ledger {
    /// Creates a new Ledger.
    pub fn new(pool: SqlitePool, auth: Arc<dyn OwnerAuth>) -> Self {
        Ledger { pool, auth }
    }

    /// Records a stock addition.
    ///
    /// Upserts the brand by exact `(name, type)` identity - an existing
    /// brand gains quantity and takes the new price (overwritten, not
    /// averaged); an unknown pair becomes a new brand. Always appends one
    /// [`StockEntry`] so the weekly history sees every delivery.
    ///
    /// This operation is never rejected by business rules once its inputs
    /// are well-formed.
    pub async fn add_stock(
        &self,
        name: &str,
        brand_type: &str,
        price: Money,
        quantity: i64,
    ) -> LedgerResult<AddStockReceipt> {
        validation::validate_label("name", name)?;
        validation::validate_label("type", brand_type)?;
        validation::validate_price(price.paise())?;
        validation::validate_quantity(quantity)?;

        let name = name.trim();
        let brand_type = brand_type.trim();
        let now = Utc::now();
        let total_value = price.multiply_quantity(quantity);

        let mut tx = self.pool.begin().await?;

        let existing = brand::fetch_by_name_type(&mut *tx, name, brand_type).await?;

        let (brand_id, new_brand, message) = match existing {
            Some(found) => {
                brand::apply_restock(&mut *tx, &found.id, quantity, price.paise(), now).await?;
                let new_total = found.quantity + quantity;
                let message =
                    format!("Updated {name} {brand_type}. New quantity: {new_total}");
                (found.id, false, message)
            }
            None => {
                let new = Brand {
                    id: brand::generate_brand_id(),
                    name: name.to_string(),
                    brand_type: brand_type.to_string(),
                    price_paise: price.paise(),
                    quantity,
                    created_at: now,
                    updated_at: now,
                };
                brand::insert(&mut *tx, &new).await?;
                let message =
                    format!("Added new brand: {name} {brand_type} with {quantity} bottles");
                (new.id, true, message)
            }
        };

        let entry = StockEntry {
            id: stock_entry::generate_entry_id(),
            brand_id: brand_id.clone(),
            brand_name: name.to_string(),
            brand_type: brand_type.to_string(),
            quantity,
            price_paise: price.paise(),
            total_value_paise: total_value.paise(),
            added_date: now,
            week_of_year: week_key(now),
            created_at: now,
        };
        stock_entry::insert(&mut *tx, &entry).await?;

        tx.commit().await?;

        info!(brand_id = %brand_id, quantity = %quantity, new_brand = %new_brand, "Stock added");

        Ok(AddStockReceipt {
            brand_id,
            message,
            total_value_paise: total_value.paise(),
            new_brand,
        })
    }

    /// Records a single-item sale at the brand's current price.
    pub async fn sell(
        &self,
        brand_id: &str,
        quantity: i64,
        payment_method: PaymentMethod,
        customer_name: Option<String>,
        customer_phone: Option<String>,
    ) -> LedgerResult<SaleReceipt> {
        validation::validate_quantity(quantity)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let found = brand::fetch_by_id(&mut *tx, brand_id)
            .await?
            .ok_or_else(|| CoreError::BrandNotFound(brand_id.to_string()))?;

        if !found.has_stock(quantity) {
            return Err(insufficient(&found.label(), found.quantity, quantity));
        }

        let total = found.price().multiply_quantity(quantity);
        let line = SaleLine {
            brand_id: found.id.clone(),
            brand_name: found.name.clone(),
            brand_type: found.brand_type.clone(),
            quantity,
            price_paise: found.price_paise,
            line_total_paise: total.paise(),
        };

        let sale = Transaction {
            id: transaction::generate_transaction_id(),
            items: TransactionItems::Single(line),
            total_amount_paise: total.paise(),
            payment_method,
            customer_name,
            customer_phone,
            created_at: now,
        };
        transaction::insert(&mut *tx, &sale).await?;

        if !brand::try_decrement(&mut *tx, &found.id, quantity, now).await? {
            return Err(insufficient(&found.label(), found.quantity, quantity));
        }

        tx.commit().await?;

        let remaining_stock = found.quantity - quantity;
        info!(
            transaction_id = %sale.id,
            brand_id = %found.id,
            quantity = %quantity,
            "Sale recorded"
        );

        Ok(SaleReceipt {
            message: format!(
                "Sale recorded: {} x {} = {}",
                quantity,
                found.label(),
                total
            ),
            transaction_id: sale.id,
            total_amount_paise: total.paise(),
            remaining_stock,
        })
    }

    /// Checks out a multi-item cart.
    ///
    /// Validates every item before writing anything: the whole cart either
    /// commits - one transaction record plus a decrement per brand - or
    /// leaves no trace. A brand appearing twice in the cart is checked per
    /// line and settled by the conditional decrements, which reject the
    /// cart if the combined quantity overdraws the stock.
    pub async fn checkout_cart(
        &self,
        items: &[CartItem],
        payment_method: PaymentMethod,
        customer_name: Option<String>,
        customer_phone: Option<String>,
    ) -> LedgerResult<CartReceipt> {
        if items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validation::validate_cart_size(items.len())?;
        for item in items {
            validation::validate_quantity(item.quantity)?;
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Phase 1: validate everything, snapshot brand data, total the cart.
        let mut lines = Vec::with_capacity(items.len());
        let mut total = Money::zero();

        for item in items {
            let found = brand::fetch_by_id(&mut *tx, &item.brand_id)
                .await?
                .ok_or_else(|| CoreError::BrandNotFound(item.brand_id.clone()))?;

            if !found.has_stock(item.quantity) {
                return Err(insufficient(&found.label(), found.quantity, item.quantity));
            }

            let line_total = found.price().multiply_quantity(item.quantity);
            total += line_total;
            lines.push(SaleLine {
                brand_id: found.id,
                brand_name: found.name,
                brand_type: found.brand_type,
                quantity: item.quantity,
                price_paise: found.price_paise,
                line_total_paise: line_total.paise(),
            });
        }

        // Phase 2: write the sale, then settle stock per brand.
        let sale = Transaction {
            id: transaction::generate_transaction_id(),
            items: TransactionItems::Multi(lines),
            total_amount_paise: total.paise(),
            payment_method,
            customer_name,
            customer_phone,
            created_at: now,
        };
        transaction::insert(&mut *tx, &sale).await?;

        for line in sale.lines() {
            if !brand::try_decrement(&mut *tx, &line.brand_id, line.quantity, now).await? {
                let available = brand::fetch_by_id(&mut *tx, &line.brand_id)
                    .await?
                    .map(|b| b.quantity)
                    .unwrap_or(0);
                return Err(insufficient(&line.label(), available, line.quantity));
            }
        }

        tx.commit().await?;

        let summary = sale
            .lines()
            .iter()
            .map(|l| format!("{} x {} = {}", l.quantity, l.label(), l.line_total()))
            .collect::<Vec<_>>()
            .join(", ");
        let item_count = sale.lines().len();

        info!(
            transaction_id = %sale.id,
            items = %item_count,
            total = %total,
            "Cart checkout recorded"
        );

        Ok(CartReceipt {
            message: format!("Multi-item sale recorded: {summary}. Total: {total}"),
            total_amount_paise: total.paise(),
            item_count,
            items: sale.lines().to_vec(),
            transaction_id: sale.id,
        })
    }

    /// Removes bottles from a brand's stock. Owner-gated.
    ///
    /// A quantity at or above [`REMOVE_ALL_THRESHOLD`] means "remove
    /// everything": the brand's quantity is forced to zero no matter how
    /// many bottles are on hand. This is how brands are retired - the row
    /// stays so history keeps resolving.
    pub async fn remove_stock(
        &self,
        brand_id: &str,
        quantity: i64,
        owner_password: &str,
    ) -> LedgerResult<RemoveStockReceipt> {
        self.auth.require(owner_password)?;
        validation::validate_removal_quantity(quantity)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let found = brand::fetch_by_id(&mut *tx, brand_id)
            .await?
            .ok_or_else(|| CoreError::BrandNotFound(brand_id.to_string()))?;

        let complete_removal = quantity >= REMOVE_ALL_THRESHOLD;

        let (removed, remaining, message) = if complete_removal {
            brand::force_zero(&mut *tx, &found.id, now).await?;
            let removed = found.quantity;
            let message = format!(
                "Completely removed {} from inventory (removed {} bottles)",
                found.label(),
                removed
            );
            (removed, 0, message)
        } else {
            if !found.has_stock(quantity) {
                return Err(insufficient(&found.label(), found.quantity, quantity));
            }
            if !brand::try_decrement(&mut *tx, &found.id, quantity, now).await? {
                return Err(insufficient(&found.label(), found.quantity, quantity));
            }
            let remaining = found.quantity - quantity;
            let message = format!(
                "Removed {} bottles of {}. Remaining: {}",
                quantity,
                found.label(),
                remaining
            );
            (quantity, remaining, message)
        };

        tx.commit().await?;

        info!(
            brand_id = %found.id,
            removed = %removed,
            complete = %complete_removal,
            "Stock removed"
        );

        Ok(RemoveStockReceipt {
            message,
            removed,
            remaining,
        })
    }

    /// Deletes a sale record and restores its stock. Owner-gated.
    ///
    /// Restoration is only defined for the single-item shape: the brand
    /// gets its bottles back (a since-retired brand is tolerated), then the
    /// record is removed. Multi-item sales cannot be deleted - see
    /// [`CoreError::MultiItemDeleteUnsupported`].
    pub async fn delete_transaction(
        &self,
        transaction_id: &str,
        owner_password: &str,
    ) -> LedgerResult<DeleteTransactionReceipt> {
        self.auth.require(owner_password)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let sale = transaction::fetch_with_items(&mut *tx, transaction_id)
            .await?
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;

        let line = match &sale.items {
            TransactionItems::Single(line) => line,
            TransactionItems::Multi(_) => {
                return Err(CoreError::MultiItemDeleteUnsupported(sale.id).into());
            }
        };

        // The brand may have been retired since the sale; restoration is
        // then a no-op rather than an error.
        let restored_to_brand = brand::increment(&mut *tx, &line.brand_id, line.quantity, now).await?;
        transaction::delete(&mut *tx, &sale.id).await?;

        tx.commit().await?;

        info!(
            transaction_id = %sale.id,
            restored = %line.quantity,
            brand_found = %restored_to_brand,
            "Transaction deleted"
        );

        Ok(DeleteTransactionReceipt {
            message: format!(
                "Transaction deleted and {} bottles of {} restored to stock",
                line.quantity,
                line.label()
            ),
            restored: line.quantity,
        })
    }
}

/// Builds the InsufficientStock error with the counts the message must name.
fn insufficient(brand: &str, available: i64, requested: i64) -> LedgerError {
    CoreError::InsufficientStock {
        brand: brand.to_string(),
        available,
        requested,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use theka_core::SharedSecret;

    const OWNER_PASSWORD: &str = "theka123";

    async fn test_ledger() -> (Database, Ledger) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = db.ledger(Arc::new(SharedSecret::new(OWNER_PASSWORD)));
        (db, ledger)
    }

    async fn brand_quantity(db: &Database, id: &str) -> i64 {
        db.brands().get_by_id(id).await.unwrap().unwrap().quantity
    }

    // -------------------------------------------------------------------------
    // add_stock
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_stock_creates_then_accumulates() {
        let (db, ledger) = test_ledger().await;

        let first = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();
        assert!(first.new_brand);
        assert_eq!(
            first.message,
            "Added new brand: Royal Stag 750ml with 5 bottles"
        );
        assert_eq!(first.total_value_paise, 600_000);

        let second = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1250), 3)
            .await
            .unwrap();
        assert!(!second.new_brand);
        assert_eq!(second.brand_id, first.brand_id);
        assert_eq!(second.message, "Updated Royal Stag 750ml. New quantity: 8");

        // Quantity is the sum of additions; price is the latest, not an average.
        let brand = db.brands().get_by_id(&first.brand_id).await.unwrap().unwrap();
        assert_eq!(brand.quantity, 8);
        assert_eq!(brand.price_paise, 125_000);

        // Every call appended one stock entry.
        assert_eq!(db.stock_entries().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_add_stock_same_name_different_type_is_new_brand() {
        let (db, ledger) = test_ledger().await;

        let a = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();
        let b = ledger
            .add_stock("Royal Stag", "375ml", Money::from_rupees(650), 4)
            .await
            .unwrap();

        assert_ne!(a.brand_id, b.brand_id);
        assert!(b.new_brand);
        assert_eq!(db.brands().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_add_stock_rejects_bad_input() {
        let (db, ledger) = test_ledger().await;

        let err = ledger
            .add_stock("", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = ledger
            .add_stock("Royal Stag", "750ml", Money::zero(), 5)
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 0)
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());

        // Nothing was written.
        assert_eq!(db.brands().count().await.unwrap(), 0);
        assert_eq!(db.stock_entries().count().await.unwrap(), 0);
    }

    // -------------------------------------------------------------------------
    // sell (single-item)
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_sell_decrements_and_records() {
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();

        let receipt = ledger
            .sell(&stocked.brand_id, 3, PaymentMethod::Cash, None, None)
            .await
            .unwrap();

        assert_eq!(receipt.total_amount_paise, 360_000);
        assert_eq!(receipt.remaining_stock, 2);
        assert_eq!(
            receipt.message,
            "Sale recorded: 3 x Royal Stag 750ml = ₹3600"
        );
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 2);

        let sale = db
            .transactions()
            .get_by_id(&receipt.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sale.bottles_sold(), 3);
        assert_eq!(sale.total_amount_paise, 360_000);
    }

    #[tokio::test]
    async fn test_sell_insufficient_stock_leaves_no_trace() {
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 2)
            .await
            .unwrap();

        let err = ledger
            .sell(&stocked.brand_id, 5, PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(err.is_insufficient_stock());
        assert_eq!(
            err.to_string(),
            "Not enough stock for Royal Stag 750ml. Available: 2, Requested: 5"
        );

        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 2);
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sell_unknown_brand() {
        let (_db, ledger) = test_ledger().await;

        let err = ledger
            .sell("no-such-brand", 1, PaymentMethod::Upi, None, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    // -------------------------------------------------------------------------
    // checkout_cart
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_checkout_cart_example_scenario() {
        // The canonical flow: stock 5, sell 3 via cart, then a cart of 5
        // must be rejected with the 2 remaining untouched.
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();

        let cart = [CartItem {
            brand_id: stocked.brand_id.clone(),
            quantity: 3,
        }];
        let receipt = ledger
            .checkout_cart(&cart, PaymentMethod::Cash, None, None)
            .await
            .unwrap();
        assert_eq!(receipt.total_amount_paise, 360_000);
        assert_eq!(receipt.item_count, 1);
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 2);

        let cart = [CartItem {
            brand_id: stocked.brand_id.clone(),
            quantity: 5,
        }];
        let err = ledger
            .checkout_cart(&cart, PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(err.is_insufficient_stock());
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 2);
        assert_eq!(db.transactions().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_checkout_cart_total_is_sum_of_lines() {
        let (db, ledger) = test_ledger().await;
        let stag = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 10)
            .await
            .unwrap();
        let monk = ledger
            .add_stock("Old Monk", "1L", Money::from_rupees(900), 10)
            .await
            .unwrap();

        let cart = [
            CartItem {
                brand_id: stag.brand_id.clone(),
                quantity: 2,
            },
            CartItem {
                brand_id: monk.brand_id.clone(),
                quantity: 4,
            },
        ];
        let receipt = ledger
            .checkout_cart(&cart, PaymentMethod::Upi, Some("Sharma".into()), None)
            .await
            .unwrap();

        let line_sum: i64 = receipt.items.iter().map(|l| l.line_total_paise).sum();
        assert_eq!(receipt.total_amount_paise, line_sum);
        assert_eq!(receipt.total_amount_paise, 240_000 + 360_000);
        assert_eq!(receipt.item_count, 2);
        assert_eq!(
            receipt.message,
            "Multi-item sale recorded: 2 x Royal Stag 750ml = ₹2400, \
             4 x Old Monk 1L = ₹3600. Total: ₹6000"
        );

        // Each brand decreased by exactly its requested amount.
        assert_eq!(brand_quantity(&db, &stag.brand_id).await, 8);
        assert_eq!(brand_quantity(&db, &monk.brand_id).await, 6);
    }

    #[tokio::test]
    async fn test_checkout_cart_all_or_nothing() {
        // First item alone would succeed; a later bad item must reject the
        // whole cart with no writes applied.
        let (db, ledger) = test_ledger().await;
        let stag = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 10)
            .await
            .unwrap();
        let monk = ledger
            .add_stock("Old Monk", "1L", Money::from_rupees(900), 2)
            .await
            .unwrap();

        let cart = [
            CartItem {
                brand_id: stag.brand_id.clone(),
                quantity: 2,
            },
            CartItem {
                brand_id: monk.brand_id.clone(),
                quantity: 5,
            },
        ];
        let err = ledger
            .checkout_cart(&cart, PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(err.is_insufficient_stock());
        assert_eq!(
            err.to_string(),
            "Not enough stock for Old Monk 1L. Available: 2, Requested: 5"
        );

        assert_eq!(brand_quantity(&db, &stag.brand_id).await, 10);
        assert_eq!(brand_quantity(&db, &monk.brand_id).await, 2);
        assert_eq!(db.transactions().count().await.unwrap(), 0);

        // Unknown brand anywhere in the cart rejects the same way.
        let cart = [
            CartItem {
                brand_id: stag.brand_id.clone(),
                quantity: 2,
            },
            CartItem {
                brand_id: "no-such-brand".to_string(),
                quantity: 1,
            },
        ];
        let err = ledger
            .checkout_cart(&cart, PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(brand_quantity(&db, &stag.brand_id).await, 10);
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_checkout_cart_duplicate_brand_cannot_overdraw() {
        // Two lines for the same brand pass per-line validation but their
        // combined quantity overdraws the stock; the conditional decrements
        // must reject the cart as a whole.
        let (db, ledger) = test_ledger().await;
        let stag = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 3)
            .await
            .unwrap();

        let cart = [
            CartItem {
                brand_id: stag.brand_id.clone(),
                quantity: 2,
            },
            CartItem {
                brand_id: stag.brand_id.clone(),
                quantity: 2,
            },
        ];
        let err = ledger
            .checkout_cart(&cart, PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(err.is_insufficient_stock());

        assert_eq!(brand_quantity(&db, &stag.brand_id).await, 3);
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_rejected() {
        let (db, ledger) = test_ledger().await;

        let err = ledger
            .checkout_cart(&[], PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Cart cannot be empty");
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    // -------------------------------------------------------------------------
    // remove_stock
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_remove_stock_wrong_password() {
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();

        let err = ledger
            .remove_stock(&stocked.brand_id, 2, "wrong-password")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized: Invalid owner password");

        // Quantity unchanged.
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 5);
    }

    #[tokio::test]
    async fn test_remove_stock_normal() {
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();

        let receipt = ledger
            .remove_stock(&stocked.brand_id, 2, OWNER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(receipt.removed, 2);
        assert_eq!(receipt.remaining, 3);
        assert_eq!(
            receipt.message,
            "Removed 2 bottles of Royal Stag 750ml. Remaining: 3"
        );
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 3);

        // More than available is rejected below the sentinel.
        let err = ledger
            .remove_stock(&stocked.brand_id, 4, OWNER_PASSWORD)
            .await
            .unwrap_err();
        assert!(err.is_insufficient_stock());
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 3);
    }

    #[tokio::test]
    async fn test_remove_stock_sentinel_zeroes_brand() {
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Old Monk", "1L", Money::from_rupees(900), 42)
            .await
            .unwrap();

        let receipt = ledger
            .remove_stock(&stocked.brand_id, REMOVE_ALL_THRESHOLD, OWNER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(receipt.removed, 42);
        assert_eq!(receipt.remaining, 0);
        assert_eq!(
            receipt.message,
            "Completely removed Old Monk 1L from inventory (removed 42 bottles)"
        );

        // The row survives with zero quantity - history still resolves.
        let brand = db.brands().get_by_id(&stocked.brand_id).await.unwrap().unwrap();
        assert_eq!(brand.quantity, 0);
    }

    // -------------------------------------------------------------------------
    // delete_transaction
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_delete_transaction_restores_single_sale() {
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();
        let sale = ledger
            .sell(&stocked.brand_id, 3, PaymentMethod::Cash, None, None)
            .await
            .unwrap();
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 2);

        let receipt = ledger
            .delete_transaction(&sale.transaction_id, OWNER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(receipt.restored, 3);
        assert_eq!(
            receipt.message,
            "Transaction deleted and 3 bottles of Royal Stag 750ml restored to stock"
        );

        // Stock is back to exactly where it was; the record is gone.
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 5);
        assert!(db
            .transactions()
            .get_by_id(&sale.transaction_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_transaction_multi_unsupported() {
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();
        let cart = [CartItem {
            brand_id: stocked.brand_id.clone(),
            quantity: 2,
        }];
        let receipt = ledger
            .checkout_cart(&cart, PaymentMethod::Cash, None, None)
            .await
            .unwrap();

        let err = ledger
            .delete_transaction(&receipt.transaction_id, OWNER_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::MultiItemDeleteUnsupported(_))
        ));

        // Nothing changed: the record remains and no stock came back.
        assert!(db
            .transactions()
            .get_by_id(&receipt.transaction_id)
            .await
            .unwrap()
            .is_some());
        assert_eq!(brand_quantity(&db, &stocked.brand_id).await, 3);
    }

    #[tokio::test]
    async fn test_delete_transaction_wrong_password_and_missing() {
        let (db, ledger) = test_ledger().await;
        let stocked = ledger
            .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
            .await
            .unwrap();
        let sale = ledger
            .sell(&stocked.brand_id, 1, PaymentMethod::Upi, None, None)
            .await
            .unwrap();

        let err = ledger
            .delete_transaction(&sale.transaction_id, "wrong")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(db
            .transactions()
            .get_by_id(&sale.transaction_id)
            .await
            .unwrap()
            .is_some());

        let err = ledger
            .delete_transaction("no-such-transaction", OWNER_PASSWORD)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
