//! The bubble tree.
//!
//! A trace is a forest of [`Bubble`]s stored in an arena ([`Forest`]). Every
//! bubble is addressed by a stable [`BubbleId`]; children are lists of ids, so
//! identity is an index and never a value comparison.
//!
//! ```text
//! Forest.slots: [Some(b0), Some(b1), None, Some(b3)]
//!                  │  └─ children: [1, 3]
//!                  └─ root
//! ```
//!
//! A merge rewrites one slot in place and turns the slots of the bubbles it
//! swallowed into `None`. Ids of surviving bubbles never move, which keeps the
//! parent's child list valid without touching it.

use std::fmt;

use crate::straws::jettons::{JettonMint, JettonTransfer};
use crate::{AccountId, TxRecord, ValueFlow};

// --- Ids and payloads --------------------------------------------------------

/// Stable index of a bubble inside its [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BubbleId(pub(crate) usize);

impl BubbleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Discriminant of a [`Payload`]; what type checks compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Tx,
    JettonTransfer,
    JettonMint,
}

/// What a bubble carries: a raw record or a recognized action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Tx(TxRecord),
    JettonTransfer(JettonTransfer),
    JettonMint(JettonMint),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Tx(_) => PayloadKind::Tx,
            Payload::JettonTransfer(_) => PayloadKind::JettonTransfer,
            Payload::JettonMint(_) => PayloadKind::JettonMint,
        }
    }

    pub fn as_tx(&self) -> Option<&TxRecord> {
        match self {
            Payload::Tx(tx) => Some(tx),
            _ => None,
        }
    }
}

// --- Bubble ------------------------------------------------------------------

/// One node of the trace tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub payload: Payload,
    /// Accounts touched by this bubble or anything merged into it. May repeat.
    pub accounts: Vec<AccountId>,
    pub children: Vec<BubbleId>,
    pub value_flow: ValueFlow,
}

impl Bubble {
    pub fn new(payload: Payload) -> Self {
        Bubble { payload, accounts: Vec::new(), children: Vec::new(), value_flow: ValueFlow::new() }
    }

    /// Leaf bubble for a raw transaction.
    pub fn from_tx(tx: TxRecord) -> Self {
        let mut accounts = vec![tx.account.address];
        if let Some(from) = &tx.input_from {
            accounts.push(from.address);
        }
        let value_flow = ValueFlow::from_tx(&tx);
        Bubble { payload: Payload::Tx(tx), accounts, children: Vec::new(), value_flow }
    }
}

impl fmt::Display for Bubble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Tx(tx) => {
                write!(f, "tx account={} success={} amount={}", tx.account.address, tx.success, tx.input_amount)?;
                if let Some(op) = tx.op_code {
                    write!(f, " opcode=0x{op:08x}")?;
                }
                if let Some(body) = &tx.decoded_body {
                    write!(f, " body={}", body.op())?;
                }
                write!(f, " utime={}", tx.utime.format("%Y-%m-%dT%H:%M:%SZ"))?;
            }
            other => write!(f, "{:?}", other.kind())?,
        }
        write!(f, " children={}", self.children.len())
    }
}

// --- Forest: arena of bubbles ------------------------------------------------

/// Arena holding every bubble of one trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    slots: Vec<Option<Bubble>>,
    roots: Vec<BubbleId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, bubble: Bubble) -> BubbleId {
        let id = BubbleId(self.slots.len());
        self.slots.push(Some(bubble));
        id
    }

    pub fn add_root(&mut self, bubble: Bubble) -> BubbleId {
        let id = self.push(bubble);
        self.roots.push(id);
        id
    }

    /// Append `bubble` as the last child of `parent`.
    ///
    /// Returns `None` when `parent` is not a live bubble of this forest.
    pub fn add_child(&mut self, parent: BubbleId, bubble: Bubble) -> Option<BubbleId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.push(bubble);
        self.slots[parent.0].as_mut()?.children.push(id);
        Some(id)
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn contains(&self, id: BubbleId) -> bool {
        self.get(id).is_some()
    }

    pub fn children(&self, id: BubbleId) -> &[BubbleId] {
        self.get(id).map(|b| b.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[BubbleId] {
        &self.roots
    }

    /// Number of live bubbles.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live bubbles, parents before children, siblings in order.
    pub fn pre_order(&self) -> Vec<BubbleId> {
        let mut out = Vec::with_capacity(self.slots.len());
        let mut stack: Vec<BubbleId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(bubble) = self.get(id) else { continue };
            out.push(id);
            stack.extend(bubble.children.iter().rev().copied());
        }
        out
    }

    /// Live bubbles, children before parents, siblings in order.
    pub fn post_order(&self) -> Vec<BubbleId> {
        let mut out = Vec::with_capacity(self.slots.len());
        // (id, children already pushed)
        let mut stack: Vec<(BubbleId, bool)> = self.roots.iter().rev().map(|&id| (id, false)).collect();
        while let Some((id, expanded)) = stack.pop() {
            let Some(bubble) = self.get(id) else { continue };
            if expanded {
                out.push(id);
            } else {
                stack.push((id, true));
                stack.extend(bubble.children.iter().rev().map(|&c| (c, false)));
            }
        }
        out
    }

    /// Overwrite a live slot. The bubble keeps its id and thus its place in
    /// the parent's child list.
    pub(crate) fn replace(&mut self, id: BubbleId, bubble: Bubble) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            debug_assert!(slot.is_some(), "replacing a pruned bubble");
            *slot = Some(bubble);
        }
    }

    /// Drop a bubble that was swallowed by a merge.
    pub(crate) fn prune(&mut self, id: BubbleId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = None;
        }
    }
}
