//! Predicate library for straws.
//!
//! Every constructor returns a boxed [`Check`]. Checks that read raw record
//! fields are false on any other payload, so a straw can list them without
//! guarding each one behind [`is_tx`].

use crate::{AccountId, Bubble, Check, Interfaces, MsgBody, MsgOp, Payload, PayloadKind, TxRecord};

fn on_tx(f: impl Fn(&TxRecord) -> bool + Send + Sync + 'static) -> Check {
    Box::new(move |bubble: &Bubble| bubble.payload.as_tx().is_some_and(&f))
}

pub fn is_tx() -> Check {
    is(PayloadKind::Tx)
}

/// Payload is of the given variant.
pub fn is(kind: PayloadKind) -> Check {
    Box::new(move |bubble: &Bubble| bubble.payload.kind() == kind)
}

/// A merged jetton transfer whose recipient implements `iface`.
pub fn is_jetton_receiver(iface: Interfaces) -> Check {
    Box::new(move |bubble: &Bubble| match &bubble.payload {
        Payload::JettonTransfer(transfer) => transfer.recipient.as_ref().is_some_and(|r| r.is(iface)),
        _ => false,
    })
}

pub fn or(first: Check, second: Check) -> Check {
    Box::new(move |bubble: &Bubble| first(bubble) || second(bubble))
}

/// Raw inbound opcode equals `op`, whether or not the body was decoded.
pub fn has_opcode(op: u32) -> Check {
    on_tx(move |tx| tx.op_code == Some(op))
}

/// Decoded body carries the operation `op`.
pub fn has_operation(op: MsgOp) -> Check {
    on_tx(move |tx| tx.operation(op))
}

pub fn is_account(id: AccountId) -> Check {
    on_tx(move |tx| tx.account.address == id)
}

pub fn has_text_comment(comment: impl Into<String>) -> Check {
    let comment = comment.into();
    on_tx(move |tx| matches!(&tx.decoded_body, Some(MsgBody::TextComment { text }) if *text == comment))
}

pub fn has_interface(iface: Interfaces) -> Check {
    on_tx(move |tx| tx.account.is(iface))
}

/// Inbound amount within `min..=max`.
pub fn amount_interval(min: i64, max: i64) -> Check {
    on_tx(move |tx| (min..=max).contains(&tx.input_amount))
}
