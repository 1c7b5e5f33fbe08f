//! Privileged role mutations, reachable only behind the admin gate.
//!
//! Both operations are idempotent merges against the identity store. The
//! default mode mirrors the store's insert-if-absent primitive: elevating an
//! email nobody registered creates a role-only identity. `Strict` is the
//! exact-match alternative for callers that would rather fail on an unknown
//! target.

use serde_json::Value;
use sqlx::PgPool;

use crate::common::entity_ids::User;
use crate::common::error::ApiError;
use crate::domains::users;
use crate::kernel::store::{Document, Fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationMode {
    /// Insert-if-absent: an unknown target becomes a role-only identity.
    Upsert,
    /// Fail with a not-found error when the target does not exist.
    Strict,
}

#[derive(Clone)]
pub struct ElevationService {
    pool: PgPool,
}

impl ElevationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Set the target identity's role to `admin`.
    pub async fn promote_to_admin(
        &self,
        email: &str,
        mode: ElevationMode,
    ) -> Result<Document<User>, ApiError> {
        self.apply(email, mode, "role", "admin").await
    }

    /// Mark the target identity's seller account as verified.
    pub async fn verify_seller(
        &self,
        email: &str,
        mode: ElevationMode,
    ) -> Result<Document<User>, ApiError> {
        self.apply(email, mode, "status", "verified").await
    }

    async fn apply(
        &self,
        email: &str,
        mode: ElevationMode,
        field: &str,
        value: &str,
    ) -> Result<Document<User>, ApiError> {
        let mut fields = Fields::new();
        fields.insert("email".to_string(), Value::String(email.to_string()));
        fields.insert(field.to_string(), Value::String(value.to_string()));

        let collection = users::collection(&self.pool);
        match mode {
            ElevationMode::Upsert => Ok(collection.upsert_by_key(fields).await?),
            ElevationMode::Strict => {
                let mut filter = Fields::new();
                filter.insert("email".to_string(), Value::String(email.to_string()));
                collection
                    .update_one(&filter, fields)
                    .await?
                    .ok_or_else(|| {
                        ApiError::ReferenceNotFound(format!("no user with email {email}"))
                    })
            }
        }
    }
}
