//! Value-flow accumulator attached to every bubble.
//!
//! The engine treats this as opaque: it only ever calls [`ValueFlow::merge`].
//! The numbers are plain sums so that folding any set of bubbles into one
//! gives the same result regardless of order.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{AccountId, MsgBody, TxRecord};

/// Net movement for a single account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountFlow {
    /// Net nanotons received (negative when sent).
    pub ton: i64,
    pub fees: i64,
    /// Net jetton amounts keyed by jetton master.
    pub jettons: BTreeMap<AccountId, i128>,
}

impl AccountFlow {
    fn add_ton(&mut self, amount: i64) {
        self.ton = self.ton.saturating_add(amount);
    }

    fn add_fee(&mut self, fee: i64) {
        self.fees = self.fees.saturating_add(fee);
    }

    fn add_jettons(&mut self, master: AccountId, amount: i128) {
        let total = self.jettons.entry(master).or_default();
        *total = total.saturating_add(amount);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueFlow {
    pub accounts: BTreeMap<AccountId, AccountFlow>,
}

impl ValueFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flow of a single transaction: the inbound value moves from the sender
    /// (when known) to the account, and the account pays its fees. Jetton
    /// wallets additionally book the jettons they send or receive when the
    /// decoder resolved their master.
    pub fn from_tx(tx: &TxRecord) -> Self {
        let mut flow = ValueFlow::new();
        flow.add_ton(tx.account.address, tx.input_amount);
        if let Some(from) = &tx.input_from {
            flow.add_ton(from.address, tx.input_amount.saturating_neg());
        }
        if tx.total_fees != 0 {
            flow.add_fee(tx.account.address, tx.total_fees);
        }
        if let (Some(master), Some(body)) = (tx.jetton_master, &tx.decoded_body) {
            match body {
                MsgBody::JettonInternalTransfer { amount, .. } => {
                    flow.add_jettons(tx.account.address, master, i128::try_from(*amount).unwrap_or(i128::MAX));
                }
                MsgBody::JettonTransfer { amount, .. } | MsgBody::JettonBurn { amount, .. } => {
                    flow.add_jettons(tx.account.address, master, i128::try_from(*amount).unwrap_or(i128::MAX).saturating_neg());
                }
                _ => {}
            }
        }
        flow
    }

    pub fn add_ton(&mut self, account: AccountId, amount: i64) {
        self.accounts.entry(account).or_default().add_ton(amount);
    }

    pub fn add_fee(&mut self, account: AccountId, fee: i64) {
        self.accounts.entry(account).or_default().add_fee(fee);
    }

    pub fn add_jettons(&mut self, account: AccountId, master: AccountId, amount: i128) {
        self.accounts.entry(account).or_default().add_jettons(master, amount);
    }

    /// Fold `other` into `self`. Sums saturate at the numeric bounds.
    pub fn merge(&mut self, other: &ValueFlow) {
        for (account, flow) in &other.accounts {
            let entry = self.accounts.entry(*account).or_default();
            entry.add_ton(flow.ton);
            entry.add_fee(flow.fees);
            for (master, amount) in &flow.jettons {
                entry.add_jettons(*master, *amount);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Account;

    fn id(n: u8) -> AccountId {
        AccountId::new(0, [n; 32])
    }

    #[test]
    fn from_tx_moves_value_from_sender() {
        let tx = TxRecord {
            account: Account::new(id(1)),
            input_from: Some(Account::new(id(2))),
            input_amount: 500,
            total_fees: 7,
            ..Default::default()
        };
        let flow = ValueFlow::from_tx(&tx);

        assert_eq!(flow.accounts[&id(1)].ton, 500);
        assert_eq!(flow.accounts[&id(1)].fees, 7);
        assert_eq!(flow.accounts[&id(2)].ton, -500);
    }

    #[test]
    fn from_tx_books_jettons_for_resolved_wallets() {
        let tx = TxRecord {
            account: Account::new(id(3)),
            decoded_body: Some(MsgBody::JettonInternalTransfer {
                query_id: 0,
                amount: 42,
                from: None,
                response_address: None,
                forward_ton_amount: 0,
            }),
            jetton_master: Some(id(9)),
            ..Default::default()
        };
        let flow = ValueFlow::from_tx(&tx);
        assert_eq!(flow.accounts[&id(3)].jettons[&id(9)], 42);
    }

    #[test]
    fn merge_is_order_insensitive() {
        let mut a = ValueFlow::new();
        a.add_ton(id(1), 10);
        a.add_jettons(id(1), id(9), 3);
        let mut b = ValueFlow::new();
        b.add_ton(id(1), -4);
        b.add_fee(id(2), 1);
        b.add_jettons(id(1), id(9), 2);

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert_eq!(ab, ba);
        assert_eq!(ab.accounts[&id(1)].ton, 6);
        assert_eq!(ab.accounts[&id(1)].jettons[&id(9)], 5);
    }

    #[test]
    fn from_tx_saturates_on_most_negative_amount() {
        let tx = TxRecord {
            account: Account::new(id(1)),
            input_from: Some(Account::new(id(2))),
            input_amount: i64::MIN,
            ..Default::default()
        };
        let flow = ValueFlow::from_tx(&tx);

        assert_eq!(flow.accounts[&id(1)].ton, i64::MIN);
        assert_eq!(flow.accounts[&id(2)].ton, i64::MAX);
    }

    #[test]
    fn merge_saturates_instead_of_overflowing() {
        let mut a = ValueFlow::new();
        a.add_ton(id(1), i64::MAX);
        a.add_fee(id(1), i64::MAX);
        a.add_jettons(id(1), id(9), i128::MAX);
        let b = a.clone();

        a.merge(&b);
        assert_eq!(a.accounts[&id(1)].ton, i64::MAX);
        assert_eq!(a.accounts[&id(1)].fees, i64::MAX);
        assert_eq!(a.accounts[&id(1)].jettons[&id(9)], i128::MAX);

        a.add_ton(id(1), i64::MIN);
        assert_eq!(a.accounts[&id(1)].ton, -1);
    }
}
