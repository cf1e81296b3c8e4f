//! # theka-db: Database Layer for Theka POS
//!
//! This crate provides database access and the ledger mutation surface for
//! Theka POS. It uses SQLite for local storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Theka POS Data Flow                           │
//! │                                                                     │
//! │  Caller (shop UI, test harness)                                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   theka-db (THIS CRATE)                     │   │
//! │  │                                                             │   │
//! │  │   writes                          reads                     │   │
//! │  │   ┌─────────────────┐    ┌──────────────────────────┐      │   │
//! │  │   │     Ledger      │    │ Repositories + Analytics │      │   │
//! │  │   │  add_stock      │    │  brands, stock_entries   │      │   │
//! │  │   │  sell           │    │  transactions            │      │   │
//! │  │   │  checkout_cart  │    │  stock_levels            │      │   │
//! │  │   │  remove_stock   │    │  weekly_stock_history    │      │   │
//! │  │   │  delete_txn     │    │  summary                 │      │   │
//! │  │   └────────┬────────┘    └──────────┬───────────────┘      │   │
//! │  │            │ one SQL transaction    │ pure projections      │   │
//! │  │            ▼ per operation          ▼                       │   │
//! │  │   ┌─────────────────────────────────────────────────┐      │   │
//! │  │   │          SqlitePool (WAL, foreign keys)         │      │   │
//! │  │   └─────────────────────────────────────────────────┘      │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and ledger error types
//! - [`repository`] - Repository implementations (brand, stock entry, ...)
//! - [`ledger`] - The atomic mutation surface
//! - [`backfill`] - One-shot stock entry reconciliation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use theka_core::{Money, PaymentMethod, SharedSecret};
//! use theka_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/theka.db")).await?;
//! let ledger = db.ledger(Arc::new(SharedSecret::new(owner_password)));
//!
//! let stocked = ledger
//!     .add_stock("Royal Stag", "750ml", Money::from_rupees(1200), 5)
//!     .await?;
//! let receipt = ledger
//!     .sell(&stocked.brand_id, 3, PaymentMethod::Cash, None, None)
//!     .await?;
//!
//! let levels = db.analytics().stock_levels().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backfill;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, LedgerError};
pub use pool::{Database, DbConfig};

pub use backfill::{backfill_stock_entries, BackfillReport};
pub use ledger::{
    AddStockReceipt, CartItem, CartReceipt, DeleteTransactionReceipt, Ledger, RemoveStockReceipt,
    SaleReceipt,
};

// Repository re-exports for convenience
pub use repository::analytics::{AnalyticsRepository, AnalyticsSummary, StockLevel, WeekGroup};
pub use repository::brand::BrandRepository;
pub use repository::stock_entry::StockEntryRepository;
pub use repository::transaction::TransactionRepository;
