//! JSON scenarios replayed against a fresh in-memory registry.
//!
//! ```json
//! {
//!   "owner": "0x00000000000000000000000000000000000000aa",
//!   "accounts": [{ "address": "0x...bb", "balance": "5000000000000000000" }],
//!   "steps": [
//!     { "op": "create", "caller": "0x...bb", "name": "Bob", "age": 65, "height": 190,
//!       "payment": "1000000000000000000" },
//!     { "op": "get", "caller": "0x...bb" },
//!     { "op": "delete", "caller": "0x...aa", "target": "0x...bb" },
//!     { "op": "withdraw", "caller": "0x...aa" },
//!     { "op": "balance" }
//!   ]
//! }
//! ```

use alloy_primitives::{Address, U256};
use people_core::{CustodyResult, PersonRecord, RegistryConfig, RegistryError, RegistryEvent};
use people_registry::{Custody, InMemoryCustody, Registry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub owner: Address,
    /// Overrides the default payment floor when present.
    #[serde(default)]
    pub min_payment: Option<U256>,
    #[serde(default)]
    pub accounts: Vec<Funding>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Funding {
    pub address: Address,
    pub balance: U256,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Create {
        caller: Address,
        name: String,
        age: u32,
        height: u32,
        payment: U256,
    },
    Get {
        caller: Address,
    },
    Delete {
        caller: Address,
        target: Address,
    },
    Withdraw {
        caller: Address,
    },
    Balance,
}

impl Step {
    fn op(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Get { .. } => "get",
            Self::Delete { .. } => "delete",
            Self::Withdraw { .. } => "withdraw",
            Self::Balance => "balance",
        }
    }

    fn caller(&self) -> Option<Address> {
        match self {
            Self::Create { caller, .. }
            | Self::Get { caller }
            | Self::Delete { caller, .. }
            | Self::Withdraw { caller } => Some(*caller),
            Self::Balance => None,
        }
    }
}

/// One output row per replayed step.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub step: usize,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<Address>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PersonRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<U256>,
    pub registry_balance: U256,
    pub custody_held: U256,
}

/// Outcome of a full replay.
#[derive(Debug)]
pub struct Replay {
    pub receipts: Vec<Receipt>,
    pub events: Vec<RegistryEvent>,
}

impl Replay {
    pub fn failures(&self) -> usize {
        self.receipts.iter().filter(|r| !r.ok).count()
    }
}

enum Outcome {
    Record(Option<PersonRecord>),
    Amount(U256),
}

/// Replays every step in order. A failed step is recorded and the replay
/// carries on; only unfundable accounts abort it.
pub fn replay(scenario: &Scenario, base: RegistryConfig) -> CustodyResult<Replay> {
    let config = match scenario.min_payment {
        Some(min) => base.with_min_payment(min),
        None => base,
    };
    let custody = InMemoryCustody::with_balances(
        scenario.accounts.iter().map(|f| (f.address, f.balance)),
    )?;
    let registry = Registry::with_config(scenario.owner, custody, config);

    let receipts = scenario
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let result = apply(&registry, step);
            if let Err(ref err) = result {
                tracing::debug!(step = index, op = step.op(), error = %err, "step failed");
            }
            receipt(&registry, index, step, result)
        })
        .collect();

    Ok(Replay {
        receipts,
        events: registry.events(),
    })
}

fn apply(registry: &Registry<InMemoryCustody>, step: &Step) -> Result<Outcome, RegistryError> {
    match step {
        Step::Create {
            caller,
            name,
            age,
            height,
            payment,
        } => registry
            .create_person(*caller, name.as_str(), *age, *height, *payment)
            .map(|r| Outcome::Record(Some(r))),
        Step::Get { caller } => registry
            .get_person(*caller)
            .map(|r| Outcome::Record(Some(r))),
        Step::Delete { caller, target } => {
            registry.delete_person(*target, *caller).map(Outcome::Record)
        }
        Step::Withdraw { caller } => registry.withdraw_all(*caller).map(Outcome::Amount),
        Step::Balance => Ok(Outcome::Amount(registry.balance())),
    }
}

fn receipt(
    registry: &Registry<InMemoryCustody>,
    index: usize,
    step: &Step,
    result: Result<Outcome, RegistryError>,
) -> Receipt {
    let mut receipt = Receipt {
        step: index,
        op: step.op(),
        caller: step.caller(),
        ok: result.is_ok(),
        error_kind: None,
        error: None,
        record: None,
        amount: None,
        registry_balance: registry.balance(),
        custody_held: registry.custody().held(),
    };

    match result {
        Ok(Outcome::Record(record)) => receipt.record = record,
        Ok(Outcome::Amount(amount)) => receipt.amount = Some(amount),
        Err(err) => {
            receipt.error_kind = Some(err.kind().as_str());
            receipt.error = Some(err.to_string());
        }
    }
    receipt
}
