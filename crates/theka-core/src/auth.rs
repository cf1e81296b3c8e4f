//! # Owner Authorization
//!
//! Destructive operations (removing stock, deleting transactions) are gated
//! behind the shop owner's password. The check lives behind a trait so the
//! ledger never touches the secret directly and a future per-user
//! authorization scheme can slot in without changing any operation.
//!
//! ## Current Implementation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  remove_stock(.., owner_password)                                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  OwnerAuth::verify(password) ──► SharedSecret (exact string match)  │
//! │       │                                                             │
//! │       ├── false → CoreError::Unauthorized (nothing else leaked)     │
//! │       └── true  → operation proceeds                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No hashing, rotation, or per-user identity - a single process-wide
//! shared secret is the whole model.

use crate::error::{CoreError, CoreResult};

/// Authorization gate for owner-only operations.
pub trait OwnerAuth: Send + Sync {
    /// Returns true if the presented password grants owner access.
    fn verify(&self, password: &str) -> bool;

    /// Verifies the password, mapping failure to [`CoreError::Unauthorized`].
    fn require(&self, password: &str) -> CoreResult<()> {
        if self.verify(password) {
            Ok(())
        } else {
            Err(CoreError::Unauthorized)
        }
    }
}

/// Shared-secret owner gate: exact string equality against one configured
/// password.
#[derive(Debug, Clone)]
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    /// Creates a gate around the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        SharedSecret {
            secret: secret.into(),
        }
    }
}

impl OwnerAuth for SharedSecret {
    fn verify(&self, password: &str) -> bool {
        password == self.secret
    }
}
