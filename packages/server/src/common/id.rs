//! Typed opaque record identifiers.
//!
//! Every stored record is keyed by a 24-character lowercase hex id: a 4-byte
//! big-endian unix timestamp followed by 8 random bytes, so ids sort roughly
//! by creation time and keep index locality. The type parameter `T` is an
//! entity marker that prevents mixing up ids of different resource families
//! at compile time.
//!
//! Parsing doubles as the identifier-format validator for any operation that
//! accepts a foreign-key-style reference: callers parse the inbound string
//! before touching the store.
//!
//! # Example
//!
//! ```rust
//! use server_core::common::{ProductId, UserId};
//!
//! let product_id = ProductId::new();
//! let user_id = UserId::new();
//!
//! // This would be a compile error:
//! // let wrong: UserId = product_id;
//! ```

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

/// Length of the canonical string form.
pub const ENCODED_LEN: usize = 24;

/// Error returned when an inbound identifier fails format validation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("identifier must be {ENCODED_LEN} characters, got {0}")]
    Length(usize),
    #[error("identifier must be lowercase hex")]
    Alphabet,
}

/// A typed opaque identifier for one resource family.
#[repr(transparent)]
pub struct Id<T>([u8; 12], PhantomData<fn() -> T>);

impl<T> Id<T> {
    /// Generate a fresh id: 4-byte timestamp prefix + 8 random bytes.
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        let seconds = Utc::now().timestamp().max(0) as u32;
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        rand::thread_rng().fill(&mut bytes[4..]);
        Self(bytes, PhantomData)
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes, PhantomData)
    }

    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

impl<T> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ENCODED_LEN {
            return Err(ParseIdError::Length(s.len()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseIdError::Alphabet)?;
        Ok(Self(bytes, PhantomData))
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impls so that `T` is not required to be Clone/Eq/etc itself.

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", hex::encode(self.0))
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
