//! Registry configuration.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// 1 ether in wei.
pub const ONE_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Smallest payment `create_person` accepts unless configured otherwise.
pub const DEFAULT_MIN_PAYMENT: U256 = ONE_ETHER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Payment floor in wei, inclusive.
    pub min_payment: U256,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_payment: DEFAULT_MIN_PAYMENT,
        }
    }
}

impl RegistryConfig {
    pub fn with_min_payment(mut self, min_payment: U256) -> Self {
        self.min_payment = min_payment;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_floor_is_one_ether() {
        assert_eq!(
            RegistryConfig::default().min_payment,
            U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RegistryConfig::default());

        let cfg: RegistryConfig = serde_json::from_str(r#"{"min_payment":"0x3e8"}"#).unwrap();
        assert_eq!(cfg.min_payment, U256::from(1000u64));
    }
}
