//! Projection of recognized bubbles into external [`Action`]s.

use crate::{Action, Forest, Payload};

/// A recognized payload that has an external representation.
pub trait Actioner {
    fn to_action(&self) -> Action;
}

impl Payload {
    /// `None` for raw records, which never surface as actions.
    pub fn to_action(&self) -> Option<Action> {
        match self {
            Payload::Tx(_) => None,
            Payload::JettonTransfer(transfer) => Some(transfer.to_action()),
            Payload::JettonMint(mint) => Some(mint.to_action()),
        }
    }
}

/// One action per recognized bubble, in forest pre-order.
pub fn project_forest(forest: &Forest) -> Vec<Action> {
    forest.pre_order().into_iter().filter_map(|id| forest.get(id)?.payload.to_action()).collect()
}
