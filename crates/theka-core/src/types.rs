//! # Domain Types
//!
//! Core domain types used throughout Theka POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │     Brand      │   │   StockEntry   │   │  Transaction   │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (UUID)     │      │
//! │  │  (name, type)  │   │  brand_id (FK) │   │  Single | Multi│      │
//! │  │  price_paise   │   │  week_of_year  │   │  total_amount  │      │
//! │  │  quantity      │   │  total_value   │   │  payment_method│      │
//! │  └────────────────┘   └────────────────┘   └────────────────┘      │
//! │                                                                     │
//! │  Brand is the single source of truth for current quantity/price.   │
//! │  StockEntry and Transaction are append-only history and are NEVER  │
//! │  rewritten once created.                                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A brand is identified to humans by its `(name, type)` pair - e.g.
//! ("Johnnie Walker", "Black Label 750ml") - which is unique across the
//! catalog. The UUID `id` exists for stable references from history rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Brand
// =============================================================================

/// A sellable catalog item: one brand+variant of bottle.
///
/// Brands are never physically deleted. "Removing" a brand from inventory
/// zeroes its quantity so that history rows keep a valid reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Brand name, e.g. "Johnnie Walker".
    pub name: String,

    /// Variant/size label, e.g. "Black Label 750ml".
    #[serde(rename = "type")]
    pub brand_type: String,

    /// Price per bottle in paise. Always reflects the most recent stock
    /// addition (overwritten, not averaged).
    pub price_paise: i64,

    /// Bottles currently on hand. Never negative.
    pub quantity: i64,

    /// When the brand first appeared in the catalog.
    pub created_at: DateTime<Utc>,

    /// Last mutation (restock, sale, removal, restoration).
    pub updated_at: DateTime<Utc>,
}

impl Brand {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Value of the bottles currently on hand (quantity × price).
    #[inline]
    pub fn total_value(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }

    /// Checks whether the requested number of bottles can be sold.
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    /// Derived stock status for display and analytics.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::for_quantity(self.quantity)
    }

    /// Human-readable label: "Johnnie Walker Black Label 750ml".
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.brand_type)
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Derived status of a brand's stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// No bottles on hand.
    Out,
    /// Between 1 and [`LOW_STOCK_THRESHOLD`] bottles.
    Low,
    /// More than [`LOW_STOCK_THRESHOLD`] bottles.
    Good,
}

impl StockStatus {
    /// Classifies a quantity.
    pub fn for_quantity(quantity: i64) -> Self {
        if quantity == 0 {
            StockStatus::Out
        } else if quantity <= LOW_STOCK_THRESHOLD {
            StockStatus::Low
        } else {
            StockStatus::Good
        }
    }
}

// =============================================================================
// Stock Entry
// =============================================================================

/// Immutable record of one stock-addition event.
///
/// ## Snapshot Pattern
/// Brand name/type and the price are copied in at insert time, so the weekly
/// history stays truthful even after the catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub id: String,

    /// The brand this entry added stock to.
    pub brand_id: String,

    /// Brand name at time of entry (frozen).
    pub brand_name: String,

    /// Brand type at time of entry (frozen).
    pub brand_type: String,

    /// Bottles added in this entry.
    pub quantity: i64,

    /// Price per bottle at time of entry, in paise.
    pub price_paise: i64,

    /// quantity × price, in paise.
    pub total_value_paise: i64,

    /// When the stock arrived.
    pub added_date: DateTime<Utc>,

    /// ISO week key of `added_date`, e.g. "2026-W32".
    pub week_of_year: String,

    pub created_at: DateTime<Utc>,
}

impl StockEntry {
    /// Returns the entry's total value as Money.
    #[inline]
    pub fn total_value(&self) -> Money {
        Money::from_paise(self.total_value_paise)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// UPI transfer (PhonePe, GPay, etc.).
    Upi,
}

// =============================================================================
// Transaction
// =============================================================================

/// Discriminator distinguishing the two sale shapes.
///
/// Legacy rows predating cart checkout carry no discriminator in storage and
/// load as `Single`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Single,
    Multi,
}

/// One line of a sale: a brand snapshot plus quantity and subtotal.
///
/// ## Snapshot Pattern
/// Name, type and price are frozen at sale time. A later restock at a new
/// price must not rewrite what the customer actually paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub brand_id: String,
    pub brand_name: String,
    pub brand_type: String,
    pub quantity: i64,
    /// Price per bottle at time of sale (frozen).
    pub price_paise: i64,
    /// quantity × price at time of sale, in paise.
    pub line_total_paise: i64,
}

impl SaleLine {
    /// Returns the line subtotal as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise)
    }

    /// Human-readable label: "Royal Stag 750ml".
    pub fn label(&self) -> String {
        format!("{} {}", self.brand_name, self.brand_type)
    }
}

/// The payload of a completed sale: either the legacy single-item shape or
/// a multi-item cart.
///
/// Modeled as a tagged variant so that every consumer is forced to handle
/// both shapes exhaustively - there is no "items might be missing" state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionItems {
    /// Legacy one-brand sale.
    Single(SaleLine),
    /// Cart checkout with one line per brand.
    Multi(Vec<SaleLine>),
}

/// Immutable record of one completed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    /// The sale's line items, tagged by shape.
    pub items: TransactionItems,

    /// Sum of line totals, fixed at creation time. Never recomputed.
    pub total_amount_paise: i64,

    pub payment_method: PaymentMethod,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Which shape this sale has.
    pub fn kind(&self) -> TransactionKind {
        match self.items {
            TransactionItems::Single(_) => TransactionKind::Single,
            TransactionItems::Multi(_) => TransactionKind::Multi,
        }
    }

    /// All line items regardless of shape.
    pub fn lines(&self) -> &[SaleLine] {
        match &self.items {
            TransactionItems::Single(line) => std::slice::from_ref(line),
            TransactionItems::Multi(lines) => lines,
        }
    }

    /// Total bottles sold in this transaction, summed across both shapes.
    pub fn bottles_sold(&self) -> i64 {
        match &self.items {
            TransactionItems::Single(line) => line.quantity,
            TransactionItems::Multi(lines) => lines.iter().map(|l| l.quantity).sum(),
        }
    }

    /// Returns the total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_paise(self.total_amount_paise)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
