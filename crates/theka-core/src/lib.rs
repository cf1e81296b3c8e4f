//! # theka-core: Pure Business Logic for Theka POS
//!
//! Theka POS is a point-of-sale and inventory ledger for a liquor shop.
//! This crate is the **heart** of the system: all business rules as pure
//! functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Theka POS Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (out of scope)                 │   │
//! │  │     Stock page ──► Sell page ──► History ──► Analytics      │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                    theka-db (Ledger + Queries)              │   │
//! │  │     add_stock, checkout_cart, remove_stock, analytics       │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ theka-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌────────────┐    │   │
//! │  │   │  types  │  │  money  │  │  week   │  │ validation │    │   │
//! │  │   │  Brand  │  │  Money  │  │ WeekKey │  │   rules    │    │   │
//! │  │   │  Sale   │  │  paise  │  │ ISO8601 │  │   checks   │    │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └────────────┘    │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Brand, StockEntry, Transaction, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`week`] - ISO week keys used to group stock history
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`auth`] - Owner authorization gate for destructive operations
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;
pub mod week;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use theka_core::Money` instead of
// `use theka_core::money::Money`

pub use auth::{OwnerAuth, SharedSecret};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;
pub use week::week_key;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Quantity at or above which a remove-stock call means "remove everything".
///
/// ## Business Reason
/// The shop has no hard-delete for brands. "Delete this stock item" is
/// expressed as a removal with a quantity no real restock would ever reach,
/// which zeroes the brand regardless of how many bottles are on hand.
pub const REMOVE_ALL_THRESHOLD: i64 = 99_999;

/// Stock at or below this count (but above zero) is flagged as low.
///
/// ## Business Reason
/// Five bottles is roughly one busy evening of a popular brand. The stock
/// page and analytics both use this cutoff so the numbers agree.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum distinct items allowed in a single cart checkout.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item per operation.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Deliberately far below [`REMOVE_ALL_THRESHOLD`] so the sentinel can
/// never be produced by a valid sale or restock quantity.
pub const MAX_ITEM_QUANTITY: i64 = 999;
