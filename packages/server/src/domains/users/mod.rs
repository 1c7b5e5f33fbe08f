//! User identities, keyed by email.
//!
//! Registration is an upsert: the first write creates the identity, later
//! writes merge profile fields without discarding ones the client did not
//! send. Role and verification status never travel through this path - they
//! are owned by the elevation service.

use serde_json::Value;
use sqlx::PgPool;

use crate::common::entity_ids::User;
use crate::kernel::store::{Collection, Document, Fields, StoreError};

/// Fields only the elevation service may write.
pub const RESERVED_FIELDS: [&str; 2] = ["role", "status"];

/// Roles an identity can hold. Anything else stored in the role field is
/// treated as unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Seller,
    Buyer,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "seller" => Some(Self::Seller),
            "buyer" => Some(Self::Buyer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Seller => "seller",
            Self::Buyer => "buyer",
        }
    }
}

pub fn collection(pool: &PgPool) -> Collection<User> {
    Collection::new(pool.clone(), "users", &["email"])
}

/// Drop fields the public registration path may not set.
fn sanitize_profile(mut profile: Fields) -> Fields {
    for field in RESERVED_FIELDS {
        profile.remove(field);
    }
    profile
}

/// Create or update the identity for `email`, merging the submitted profile
/// fields over whatever is already stored.
pub async fn register(
    pool: &PgPool,
    email: &str,
    profile: Fields,
) -> Result<Document<User>, StoreError> {
    let mut fields = sanitize_profile(profile);
    fields.insert("email".to_string(), Value::String(email.to_string()));
    collection(pool).upsert_by_key(fields).await
}

fn email_filter(email: &str) -> Fields {
    let mut filter = Fields::new();
    filter.insert("email".to_string(), Value::String(email.to_string()));
    filter
}

pub async fn find_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Document<User>>, StoreError> {
    collection(pool).find_one(&email_filter(email)).await
}

/// Current stored role for `email`. One read, no writes; this is the lookup
/// the authorization gate relies on instead of the token's embedded role.
pub async fn role_of(pool: &PgPool, email: &str) -> Result<Option<Role>, StoreError> {
    let user = find_by_email(pool, email).await?;
    Ok(user
        .as_ref()
        .and_then(|doc| doc.get_str("role"))
        .and_then(Role::parse))
}

pub async fn list(pool: &PgPool) -> Result<Vec<Document<User>>, StoreError> {
    collection(pool).find_all().await
}

pub async fn list_by_role(pool: &PgPool, role: &str) -> Result<Vec<Document<User>>, StoreError> {
    let mut filter = Fields::new();
    filter.insert("role".to_string(), Value::String(role.to_string()));
    collection(pool).find(&filter).await
}

pub async fn remove_by_email(pool: &PgPool, email: &str) -> Result<bool, StoreError> {
    collection(pool).delete_one(&email_filter(email)).await
}
