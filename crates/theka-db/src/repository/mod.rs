//! # Repository Module
//!
//! Database repository implementations for Theka POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Repository Pattern Explained                      │
//! │                                                                     │
//! │  Caller                                                             │
//! │     │  db.brands().search("royal")                                  │
//! │     ▼                                                               │
//! │  BrandRepository                                                    │
//! │  ├── get_by_id(&self, id)                                           │
//! │  ├── search(&self, term)                                            │
//! │  └── ...                                                            │
//! │     │  SQL Query                                                    │
//! │     ▼                                                               │
//! │  SQLite Database                                                    │
//! │                                                                     │
//! │  Each module also exposes pub(crate) query functions generic over   │
//! │  the executor. The ledger runs those same statements inside its     │
//! │  transactions - the SQL lives in exactly one place either way.      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`brand::BrandRepository`] - Catalog reads and search
//! - [`stock_entry::StockEntryRepository`] - Stock addition log
//! - [`transaction::TransactionRepository`] - Sale records
//! - [`analytics::AnalyticsRepository`] - Aggregation queries

pub mod analytics;
pub mod brand;
pub mod stock_entry;
pub mod transaction;
