//! # Cart Snapshot Repository
//!
//! Persistence for the shopper's cart between visits.
//!
//! ## Storage Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   cart_snapshots Table                                  │
//! │                                                                         │
//! │  key (PK)      │ payload (JSON)              │ updated_at              │
//! │  ──────────────┼─────────────────────────────┼──────────────────────── │
//! │  "spice-cart"  │ {"lines":[...],"subtotal…"} │ 2026-08-30T10:12:03Z    │
//! │                                                                         │
//! │  A single well-known key holds the whole cart as one JSON document.    │
//! │  Writes are upserts; every cart mutation rewrites the full snapshot.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! - `save` failures are real errors and surface to the caller.
//! - `load` never fails on bad data: an absent row yields an empty cart,
//!   and an unparsable payload is logged and discarded in favor of an
//!   empty cart. Only an actual query failure is an error.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use spicehouse_core::{Cart, CartSnapshot};

use crate::error::StoreResult;
use crate::CART_SNAPSHOT_KEY;

/// Repository for cart snapshot persistence.
#[derive(Debug, Clone)]
pub struct CartSnapshotRepository {
    pool: SqlitePool,
}

impl CartSnapshotRepository {
    /// Creates a new repository with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        CartSnapshotRepository { pool }
    }

    /// Persists the full cart snapshot, replacing any previous one.
    ///
    /// The snapshot is serialized to JSON and upserted under the
    /// well-known cart key.
    pub async fn save(&self, snapshot: &CartSnapshot) -> StoreResult<()> {
        let payload = serde_json::to_string(snapshot)?;
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO cart_snapshots (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(CART_SNAPSHOT_KEY)
        .bind(&payload)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        debug!(bytes = payload.len(), "Cart snapshot saved");
        Ok(())
    }

    /// Loads the persisted cart, falling back to an empty cart.
    ///
    /// Totals are recomputed from the persisted lines, so a stale or
    /// tampered snapshot can never resurrect an outdated discount.
    pub async fn load(&self) -> StoreResult<Cart> {
        let row: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cart_snapshots WHERE key = ?1")
                .bind(CART_SNAPSHOT_KEY)
                .fetch_optional(&self.pool)
                .await?;

        let Some(payload) = row else {
            debug!("No cart snapshot found, starting with empty cart");
            return Ok(Cart::new());
        };

        match serde_json::from_str::<CartSnapshot>(&payload) {
            Ok(snapshot) => Ok(snapshot.into_cart()),
            Err(e) => {
                warn!(error = %e, "Cart snapshot is malformed, discarding it");
                Ok(Cart::new())
            }
        }
    }

    /// Deletes the persisted snapshot, if any.
    pub async fn delete(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM cart_snapshots WHERE key = ?1")
            .bind(CART_SNAPSHOT_KEY)
            .execute(&self.pool)
            .await?;

        debug!("Cart snapshot deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
