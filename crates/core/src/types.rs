//! Domain types for the people registry.

use crate::error::{RegistryError, RegistryResult};
use alloy_primitives::{Address, U256};
use serde::Serialize;

/// Oldest age a record may carry, inclusive.
pub const MAX_AGE: u32 = 150;

/// Age from which a person counts as senior.
pub const SENIOR_AGE: u32 = 65;

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// One registrant's record.
///
/// Fields are private: `senior` is derived from `age` in [`PersonRecord::new`]
/// and there is no way to build or edit a record around that rule. Records
/// are serialized for output but never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    name: String,
    age: u32,
    height: u32,
    senior: bool,
    owner_identity: Address,
}

impl PersonRecord {
    /// Validates `age` and `height` and derives the senior flag.
    pub fn new(
        owner_identity: Address,
        name: impl Into<String>,
        age: u32,
        height: u32,
    ) -> RegistryResult<Self> {
        if age > MAX_AGE {
            return Err(RegistryError::AgeOutOfRange { age, max: MAX_AGE });
        }
        if height == 0 {
            return Err(RegistryError::InvalidHeight);
        }

        Ok(Self {
            name: name.into(),
            age,
            height,
            senior: age >= SENIOR_AGE,
            owner_identity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn senior(&self) -> bool {
        self.senior
    }

    /// Identity that created the record.
    pub fn owner_identity(&self) -> Address {
        self.owner_identity
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Append-only audit trail of successful mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    PersonCreated {
        identity: Address,
        name: String,
        senior: bool,
    },
    /// Emitted only when a record was actually removed.
    PersonDeleted {
        identity: Address,
        name: String,
        senior: bool,
        deleted_by: Address,
    },
    Withdrawn { to: Address, amount: U256 },
}
