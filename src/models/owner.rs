//! This file defines the identifier for the authenticated principal that scopes all records.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A newtype wrapper for integer owner IDs.
///
/// Every record in the application belongs to exactly one owner, and the owner
/// of a record never changes after creation. The ID is opaque to this crate:
/// it is minted by whatever identity service issues the bearer tokens.
///
/// The newtype disambiguates owner IDs from record IDs, leading to better
/// compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerID(i64);

impl OwnerID {
    /// Create an owner ID from a raw integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw integer form, e.g. for use in SQL query parameters.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for OwnerID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
