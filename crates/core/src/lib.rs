//! Domain models, configuration, and error definitions.
//!
//! Foundation crate -- no locking or I/O dependencies.

pub mod config;
pub mod error;
pub mod types;

pub use config::{RegistryConfig, DEFAULT_MIN_PAYMENT, ONE_ETHER};
pub use error::{CustodyError, CustodyResult, ErrorKind, RegistryError, RegistryResult};
pub use types::{PersonRecord, RegistryEvent, MAX_AGE, SENIOR_AGE};
