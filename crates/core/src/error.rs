//! Centralized error types for the people registry workspace.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Top-level error enum. Every variant leaves registry state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("age {age} exceeds the maximum of {max}")]
    AgeOutOfRange { age: u32, max: u32 },

    #[error("payment of {paid} wei is below the minimum of {min} wei")]
    InsufficientPayment { paid: U256, min: U256 },

    #[error("height must be positive")]
    InvalidHeight,

    #[error("{caller} is not the registry owner")]
    Unauthorized { caller: Address },

    #[error("no person registered for {0}")]
    NotFound(Address),

    #[error("creator index {index} out of range (len {len})")]
    CreatorIndexOutOfRange { index: usize, len: usize },

    #[error("registry balance cannot absorb a payment of {0} wei")]
    BalanceOverflow(U256),

    #[error("Custody error: {0}")]
    Custody(#[from] CustodyError),
}

impl RegistryError {
    /// Coarse classification used by callers deciding how to react.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AgeOutOfRange { .. } | Self::InsufficientPayment { .. } | Self::InvalidHeight => {
                ErrorKind::Validation
            }
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::NotFound(_) | Self::CreatorIndexOutOfRange { .. } => ErrorKind::NotFound,
            Self::BalanceOverflow(_) | Self::Custody(_) => ErrorKind::Custody,
        }
    }
}

/// Failure taxonomy. `Validation` and `Authorization` are caller-correctable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authorization,
    NotFound,
    Custody,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Custody => "custody",
        }
    }
}

/// Failures of the value-transfer primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CustodyError {
    #[error("{account} holds {available} wei, cannot transfer {requested} wei")]
    InsufficientFunds {
        account: Address,
        available: U256,
        requested: U256,
    },

    #[error("custody holds {held} wei, cannot release {requested} wei")]
    InsufficientCustody { held: U256, requested: U256 },

    #[error("balance overflow")]
    Overflow,

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
pub type CustodyResult<T> = Result<T, CustodyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_caller_correctable() {
        let err = RegistryError::AgeOutOfRange { age: 200, max: 150 };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "age 200 exceeds the maximum of 150");
        assert_eq!(RegistryError::InvalidHeight.kind(), ErrorKind::Validation);
    }

    #[test]
    fn custody_error_converts() {
        let err: RegistryError = CustodyError::Overflow.into();
        assert_eq!(err.kind(), ErrorKind::Custody);
        assert_eq!(err.to_string(), "Custody error: balance overflow");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ErrorKind::Authorization.as_str(), "authorization");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
    }
}
