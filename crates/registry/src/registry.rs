//! Owner-gated people registry.
//!
//! One [`Registry`] owns the identity → record map, the owner identity and
//! the ledger balance. Every mutating operation either applies in full or
//! leaves state untouched.

use crate::custody::Custody;
use alloy_primitives::{Address, U256};
use parking_lot::{ReentrantMutex, RwLock};
use people_core::{PersonRecord, RegistryConfig, RegistryError, RegistryEvent, RegistryResult};
use std::collections::HashMap;

/// Ledger state guarded by the registry's lock.
#[derive(Debug, Default)]
struct Ledger {
    records: HashMap<Address, PersonRecord>,
    /// Every successful creator, in call order. Deletions leave it intact.
    creators: Vec<Address>,
    /// Accepted payments minus withdrawals.
    balance: U256,
    /// Set while `withdraw_all` waits on its payout.
    payout_in_flight: bool,
    events: Vec<RegistryEvent>,
}

/// People registry over a [`Custody`] backend.
///
/// Mutating operations run one at a time under `serial`, which stays held
/// across custody calls. It is re-entrant, so a custody backend may call back
/// into the registry from the same thread. The ledger lock is never held
/// across a custody call; readers only wait for it.
#[derive(Debug)]
pub struct Registry<C> {
    owner: Address,
    config: RegistryConfig,
    custody: C,
    serial: ReentrantMutex<()>,
    ledger: RwLock<Ledger>,
}

impl<C: Custody> Registry<C> {
    /// Creates a registry owned by `owner` with the default config.
    pub fn new(owner: Address, custody: C) -> Self {
        Self::with_config(owner, custody, RegistryConfig::default())
    }

    pub fn with_config(owner: Address, custody: C, config: RegistryConfig) -> Self {
        tracing::info!(owner = %owner, min_payment = %config.min_payment, "registry created");
        Self {
            owner,
            config,
            custody,
            serial: ReentrantMutex::new(()),
            ledger: RwLock::new(Ledger::default()),
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Registers `caller`, replacing any record it already has.
    ///
    /// Validation runs before any value moves. The payment is then pulled
    /// into custody and, only once that succeeded, the record and balance
    /// are committed together.
    pub fn create_person(
        &self,
        caller: Address,
        name: impl Into<String>,
        age: u32,
        height: u32,
        payment: U256,
    ) -> RegistryResult<PersonRecord> {
        let record = PersonRecord::new(caller, name, age, height)?;
        if payment < self.config.min_payment {
            return Err(RegistryError::InsufficientPayment {
                paid: payment,
                min: self.config.min_payment,
            });
        }

        let _serial = self.serial.lock();
        self.custody.accept(caller, payment)?;

        let committed = {
            let mut ledger = self.ledger.write();
            match ledger.balance.checked_add(payment) {
                Some(balance) => {
                    ledger.balance = balance;
                    ledger.records.insert(caller, record.clone());
                    ledger.creators.push(caller);
                    ledger.events.push(RegistryEvent::PersonCreated {
                        identity: caller,
                        name: record.name().to_owned(),
                        senior: record.senior(),
                    });
                    true
                }
                None => false,
            }
        };

        if !committed {
            // Refund: custody must not keep value the ledger never booked.
            if let Err(err) = self.custody.release(caller, payment) {
                tracing::warn!(
                    caller = %caller,
                    payment = %payment,
                    error = %err,
                    "refund after balance overflow failed"
                );
            }
            return Err(RegistryError::BalanceOverflow(payment));
        }

        tracing::info!(
            caller = %caller,
            name = record.name(),
            age = record.age(),
            senior = record.senior(),
            payment = %payment,
            "person created"
        );
        Ok(record)
    }

    /// Returns the record stored for `caller`.
    pub fn get_person(&self, caller: Address) -> RegistryResult<PersonRecord> {
        let record = self.ledger.read().records.get(&caller).cloned();
        record.ok_or_else(|| {
            tracing::debug!(caller = %caller, "no person registered");
            RegistryError::NotFound(caller)
        })
    }

    /// Owner-only. Removes `target`'s record; an absent target is a no-op.
    pub fn delete_person(
        &self,
        target: Address,
        caller: Address,
    ) -> RegistryResult<Option<PersonRecord>> {
        self.ensure_owner(caller, "delete_person")?;

        let _serial = self.serial.lock();
        let mut ledger = self.ledger.write();
        let removed = ledger.records.remove(&target);
        match &removed {
            Some(record) => {
                ledger.events.push(RegistryEvent::PersonDeleted {
                    identity: target,
                    name: record.name().to_owned(),
                    senior: record.senior(),
                    deleted_by: caller,
                });
                tracing::info!(identity = %target, name = record.name(), "person deleted");
            }
            None => tracing::debug!(identity = %target, "delete of unregistered identity"),
        }
        Ok(removed)
    }

    /// Owner-only. Pays the whole balance out to the owner and returns it.
    ///
    /// The balance is debited only after the payout succeeded; until then
    /// readers see the full balance and withdrawals from other threads wait.
    /// A withdrawal nested inside the payout finds nothing to take.
    pub fn withdraw_all(&self, caller: Address) -> RegistryResult<U256> {
        self.ensure_owner(caller, "withdraw_all")?;

        let _serial = self.serial.lock();
        let amount = {
            let mut ledger = self.ledger.write();
            if ledger.payout_in_flight || ledger.balance.is_zero() {
                tracing::debug!(in_flight = ledger.payout_in_flight, "nothing to withdraw");
                return Ok(U256::ZERO);
            }
            ledger.payout_in_flight = true;
            ledger.balance
        };

        let result = self.custody.release(self.owner, amount);

        let mut ledger = self.ledger.write();
        ledger.payout_in_flight = false;
        if let Err(err) = result {
            tracing::warn!(amount = %amount, error = %err, "payout failed, balance kept");
            return Err(err.into());
        }

        // Only this call debits the balance, so it still covers `amount`.
        ledger.balance = ledger.balance.checked_sub(amount).unwrap_or_default();
        ledger.events.push(RegistryEvent::Withdrawn {
            to: self.owner,
            amount,
        });
        tracing::info!(owner = %self.owner, amount = %amount, "balance withdrawn");
        Ok(amount)
    }

    /// Owner-only. The `index`-th successful creator.
    pub fn creator_at(&self, caller: Address, index: usize) -> RegistryResult<Address> {
        self.ensure_owner(caller, "creator_at")?;

        let ledger = self.ledger.read();
        ledger
            .creators
            .get(index)
            .copied()
            .ok_or(RegistryError::CreatorIndexOutOfRange {
                index,
                len: ledger.creators.len(),
            })
    }

    fn ensure_owner(&self, caller: Address, op: &'static str) -> RegistryResult<()> {
        if caller != self.owner {
            tracing::warn!(caller = %caller, op, "rejected non-owner call");
            return Err(RegistryError::Unauthorized { caller });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Ledger balance: accepted payments minus withdrawals.
    pub fn balance(&self) -> U256 {
        self.ledger.read().balance
    }

    pub fn creator_count(&self) -> usize {
        self.ledger.read().creators.len()
    }

    /// Number of identities with a record.
    pub fn len(&self) -> usize {
        self.ledger.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.read().records.is_empty()
    }

    /// Snapshot of the event log, oldest first.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.ledger.read().events.clone()
    }
}
