//! # Validation Module
//!
//! Input validation for ledger operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: Presentation (out of scope)                               │
//! │  ├── Basic format checks, immediate user feedback                   │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Ledger operation boundary                                 │
//! │  └── THIS MODULE: every operation re-validates its inputs           │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL, UNIQUE(name, brand_type)                             │
//! │  └── CHECK (quantity >= 0)                                          │
//! │                                                                     │
//! │  Defense in depth: relying on caller validation alone is fragile,   │
//! │  so the ledger never trusts its inputs.                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, REMOVE_ALL_THRESHOLD};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a brand name or type label.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use theka_core::validation::validate_label;
///
/// assert!(validate_label("name", "Johnnie Walker").is_ok());
/// assert!(validate_label("type", "   ").is_err());
/// ```
pub fn validate_label(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale or restock quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a removal quantity.
///
/// Removal quantities at or above [`REMOVE_ALL_THRESHOLD`] are the
/// "remove everything" sentinel and are valid despite exceeding
/// [`MAX_ITEM_QUANTITY`]; everything else follows the normal quantity rules.
pub fn validate_removal_quantity(qty: i64) -> ValidationResult<()> {
    if qty >= REMOVE_ALL_THRESHOLD {
        return Ok(());
    }
    validate_quantity(qty)
}

/// Validates a price in paise.
///
/// ## Rules
/// - Must be positive (> 0); the shop does not stock free bottles
pub fn validate_price(paise: i64) -> ValidationResult<()> {
    if paise <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines).
pub fn validate_cart_size(items: usize) -> ValidationResult<()> {
    if items > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use theka_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_label() {
        assert!(validate_label("name", "Royal Stag").is_ok());
        assert!(validate_label("type", "750ml").is_ok());

        assert!(validate_label("name", "").is_err());
        assert!(validate_label("name", "   ").is_err());
        assert!(validate_label("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_removal_quantity_allows_sentinel() {
        assert!(validate_removal_quantity(5).is_ok());
        assert!(validate_removal_quantity(99_999).is_ok());
        assert!(validate_removal_quantity(1_000_000).is_ok());

        assert!(validate_removal_quantity(0).is_err());
        // Above the per-operation cap but below the sentinel: rejected.
        assert!(validate_removal_quantity(5000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(120_000).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(-100).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(1).is_ok());
        assert!(validate_cart_size(100).is_ok());
        assert!(validate_cart_size(101).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
