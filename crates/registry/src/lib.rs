//! Owner-gated people registry and the custody capability it runs on.

pub mod custody;
pub mod registry;

pub use custody::{Custody, InMemoryCustody};
pub use registry::Registry;
