//! Value custody: the transfer primitive the registry is built on.
//!
//! The registry never moves value itself. Payments come in through
//! [`Custody::accept`] and withdrawals go out through [`Custody::release`];
//! the environment decides what backs them.

use alloy_primitives::{Address, U256};
use parking_lot::Mutex;
use people_core::{CustodyError, CustodyResult};
use std::collections::HashMap;

/// Abstraction for holding and moving value on the registry's behalf.
///
/// Each call must be atomic: it either moves the full amount or fails
/// without moving anything.
pub trait Custody: Send + Sync {
    /// Moves `amount` from `from` into registry custody.
    fn accept(&self, from: Address, amount: U256) -> CustodyResult<()>;

    /// Moves `amount` out of registry custody to `to`.
    fn release(&self, to: Address, amount: U256) -> CustodyResult<()>;

    /// Value currently held in registry custody.
    fn held(&self) -> U256;
}

impl<C: Custody + ?Sized> Custody for &C {
    fn accept(&self, from: Address, amount: U256) -> CustodyResult<()> {
        (**self).accept(from, amount)
    }

    fn release(&self, to: Address, amount: U256) -> CustodyResult<()> {
        (**self).release(to, amount)
    }

    fn held(&self) -> U256 {
        (**self).held()
    }
}

impl<C: Custody + ?Sized> Custody for std::sync::Arc<C> {
    fn accept(&self, from: Address, amount: U256) -> CustodyResult<()> {
        (**self).accept(from, amount)
    }

    fn release(&self, to: Address, amount: U256) -> CustodyResult<()> {
        (**self).release(to, amount)
    }

    fn held(&self) -> U256 {
        (**self).held()
    }
}

// ---------------------------------------------------------------------------
// In-memory custody
// ---------------------------------------------------------------------------

/// Wallet-per-account custody kept entirely in memory.
///
/// ```ignore
/// let custody = InMemoryCustody::new();
/// custody.fund(alice, ONE_ETHER * U256::from(5))?;
/// let registry = Registry::new(owner, custody);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    state: Mutex<Wallets>,
}

#[derive(Debug, Default)]
struct Wallets {
    accounts: HashMap<Address, U256>,
    held: U256,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds wallets from `(account, balance)` pairs.
    pub fn with_balances(
        balances: impl IntoIterator<Item = (Address, U256)>,
    ) -> CustodyResult<Self> {
        let custody = Self::new();
        for (account, amount) in balances {
            custody.fund(account, amount)?;
        }
        Ok(custody)
    }

    /// Credits `amount` to `account`'s wallet.
    pub fn fund(&self, account: Address, amount: U256) -> CustodyResult<()> {
        let mut state = self.state.lock();
        let wallet = state.accounts.entry(account).or_default();
        *wallet = wallet.checked_add(amount).ok_or(CustodyError::Overflow)?;
        Ok(())
    }

    /// Wallet balance of `account`; zero for unknown accounts.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.state
            .lock()
            .accounts
            .get(account)
            .copied()
            .unwrap_or_default()
    }
}

impl Custody for InMemoryCustody {
    fn accept(&self, from: Address, amount: U256) -> CustodyResult<()> {
        let mut state = self.state.lock();

        let available = state.accounts.get(&from).copied().unwrap_or_default();
        let remaining = available
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientFunds {
                account: from,
                available,
                requested: amount,
            })?;
        let held = state
            .held
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;

        state.accounts.insert(from, remaining);
        state.held = held;
        Ok(())
    }

    fn release(&self, to: Address, amount: U256) -> CustodyResult<()> {
        let mut state = self.state.lock();

        let held = state
            .held
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientCustody {
                held: state.held,
                requested: amount,
            })?;
        let current = state.accounts.get(&to).copied().unwrap_or_default();
        let credited = current.checked_add(amount).ok_or(CustodyError::Overflow)?;

        state.held = held;
        state.accounts.insert(to, credited);
        Ok(())
    }

    fn held(&self) -> U256 {
        self.state.lock().held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::with_last_byte(1)
    }

    fn bob() -> Address {
        Address::with_last_byte(2)
    }

    #[test]
    fn accept_moves_into_custody() {
        let custody = InMemoryCustody::with_balances([(alice(), U256::from(100u64))]).unwrap();
        custody.accept(alice(), U256::from(40u64)).unwrap();

        assert_eq!(custody.balance_of(&alice()), U256::from(60u64));
        assert_eq!(custody.held(), U256::from(40u64));
    }

    #[test]
    fn accept_without_funds_moves_nothing() {
        let custody = InMemoryCustody::with_balances([(alice(), U256::from(10u64))]).unwrap();
        let err = custody.accept(alice(), U256::from(11u64)).unwrap_err();

        assert_eq!(
            err,
            CustodyError::InsufficientFunds {
                account: alice(),
                available: U256::from(10u64),
                requested: U256::from(11u64),
            }
        );
        assert_eq!(custody.balance_of(&alice()), U256::from(10u64));
        assert_eq!(custody.held(), U256::ZERO);
    }

    #[test]
    fn release_pays_out() {
        let custody = InMemoryCustody::with_balances([(alice(), U256::from(100u64))]).unwrap();
        custody.accept(alice(), U256::from(100u64)).unwrap();
        custody.release(bob(), U256::from(70u64)).unwrap();

        assert_eq!(custody.balance_of(&bob()), U256::from(70u64));
        assert_eq!(custody.held(), U256::from(30u64));
    }

    #[test]
    fn release_more_than_held_fails() {
        let custody = InMemoryCustody::new();
        let err = custody.release(bob(), U256::from(1u64)).unwrap_err();

        assert!(matches!(err, CustodyError::InsufficientCustody { .. }));
        assert_eq!(custody.balance_of(&bob()), U256::ZERO);
    }

    #[test]
    fn fund_overflow_keeps_wallet() {
        let custody = InMemoryCustody::with_balances([(alice(), U256::MAX)]).unwrap();
        assert_eq!(custody.fund(alice(), U256::from(1u64)), Err(CustodyError::Overflow));
        assert_eq!(custody.balance_of(&alice()), U256::MAX);

        let err = InMemoryCustody::with_balances([(bob(), U256::MAX), (bob(), U256::from(1u64))])
            .unwrap_err();
        assert_eq!(err, CustodyError::Overflow);
    }

    #[test]
    fn unknown_account_has_zero_balance() {
        assert_eq!(InMemoryCustody::new().balance_of(&Address::ZERO), U256::ZERO);
    }
}
