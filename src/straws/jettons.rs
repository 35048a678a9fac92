//! Jetton (fungible token) actions and the straws that recognize them.
//!
//! A plain jetton transfer on chain looks like this:
//!
//! ```text
//! sender wallet        JettonTransfer          (owner -> own jetton wallet)
//! └── recipient wallet JettonInternalTransfer  (wallet -> wallet)
//!     ├── recipient    JettonNotify            (optional, forward_ton_amount > 0)
//!     └── sender       Excess                  (optional, leftover gas)
//! ```
//!
//! A mint is the same shape with the master contract in the root position.

use once_cell::sync::Lazy;

use crate::straws::checks::{has_opcode, has_operation, is_tx, or};
use crate::{
    Account, AccountId, Action, ActionKind, Actioner, BuildError, EncryptedComment, JettonMintAction,
    JettonTransferAction, MsgBody, MsgOp, Payload, Straw, TxRecord,
};

/// Opcode a DeDust pool sends to its LP jetton wallet when minting.
pub const DEDUST_MINT_OPCODE: u32 = 0xb56b_9598;
/// Opcode of the standard `mint` message of a jetton master.
pub const JETTON_MINT_OPCODE: u32 = 0x1674_b0a0;

/// Free-form note attached to a transfer through its forward payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Text(String),
    Encrypted(EncryptedComment),
}

impl Note {
    fn from_payload(payload: Option<&MsgBody>) -> Option<Note> {
        match payload? {
            MsgBody::TextComment { text } => Some(Note::Text(text.clone())),
            MsgBody::EncryptedComment(comment) => Some(Note::Encrypted(comment.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JettonTransfer {
    /// Owner of the sending wallet; unknown when the transfer was not
    /// initiated by an inbound message.
    pub sender: Option<Account>,
    pub recipient: Option<Account>,
    pub sender_wallet: AccountId,
    pub recipient_wallet: AccountId,
    pub master: AccountId,
    pub amount: u128,
    pub success: bool,
    pub note: Option<Note>,
}

impl From<JettonTransfer> for Payload {
    fn from(transfer: JettonTransfer) -> Self {
        Payload::JettonTransfer(transfer)
    }
}

impl Actioner for JettonTransfer {
    fn to_action(&self) -> Action {
        let (comment, encrypted_comment) = match &self.note {
            Some(Note::Text(text)) => (Some(text.clone()), None),
            Some(Note::Encrypted(blob)) => (None, Some(blob.clone())),
            None => (None, None),
        };
        Action {
            kind: ActionKind::JettonTransfer,
            success: self.success,
            jetton_transfer: Some(JettonTransferAction {
                jetton: self.master,
                sender: self.sender.as_ref().map(|a| a.address),
                recipient: self.recipient.as_ref().map(|a| a.address),
                senders_wallet: self.sender_wallet,
                recipients_wallet: self.recipient_wallet,
                amount: self.amount,
                comment,
                encrypted_comment,
            }),
            jetton_mint: None,
        }
    }
}

/// Recipient is left as the zero account when no notification was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JettonMint {
    pub recipient: Account,
    pub recipient_wallet: AccountId,
    pub master: AccountId,
    pub amount: u128,
    pub success: bool,
}

impl From<JettonMint> for Payload {
    fn from(mint: JettonMint) -> Self {
        Payload::JettonMint(mint)
    }
}

impl Actioner for JettonMint {
    fn to_action(&self) -> Action {
        Action {
            kind: ActionKind::JettonMint,
            success: self.success,
            jetton_transfer: None,
            jetton_mint: Some(JettonMintAction {
                jetton: self.master,
                recipient: self.recipient.address,
                recipients_wallet: self.recipient_wallet,
                amount: self.amount,
            }),
        }
    }
}

fn unexpected(expected: MsgOp, tx: &TxRecord) -> BuildError {
    BuildError::UnexpectedBody { expected, found: tx.decoded_body.as_ref().map(MsgBody::op) }
}

fn internal_transfer_amount(tx: &TxRecord) -> Result<u128, BuildError> {
    match &tx.decoded_body {
        Some(MsgBody::JettonInternalTransfer { amount, .. }) => Ok(*amount),
        _ => Err(unexpected(MsgOp::JettonInternalTransfer, tx)),
    }
}

fn excess<T>() -> Straw<T> {
    straw! { name: "excess", checks: [is_tx(), has_operation(MsgOp::Excess)], optional: true }
}

pub static JETTON_MINT_STRAW: Lazy<Straw<JettonMint>> = Lazy::new(|| {
    straw! {
        name: "jetton mint",
        checks: [or(has_opcode(DEDUST_MINT_OPCODE), has_opcode(JETTON_MINT_OPCODE))],
        build: |mint: &mut JettonMint, tx: &TxRecord| {
            mint.master = tx.account.address;
            mint.success = tx.success;
            Ok(())
        },
        children: [straw! {
            name: "jetton mint: internal transfer",
            checks: [has_operation(MsgOp::JettonInternalTransfer)],
            build: |mint: &mut JettonMint, tx: &TxRecord| {
                mint.amount = internal_transfer_amount(tx)?;
                mint.recipient_wallet = tx.account.address;
                mint.success &= tx.success;
                Ok(())
            },
            children: [
                straw! {
                    name: "jetton mint: notify",
                    checks: [has_operation(MsgOp::JettonNotify)],
                    build: |mint: &mut JettonMint, tx: &TxRecord| {
                        mint.recipient = tx.account.clone();
                        mint.success &= tx.success;
                        Ok(())
                    },
                    optional: true,
                },
                excess(),
            ],
        }],
    }
});

pub static JETTON_TRANSFER_STRAW: Lazy<Straw<JettonTransfer>> = Lazy::new(|| {
    straw! {
        name: "jetton transfer",
        checks: [has_operation(MsgOp::JettonTransfer)],
        build: |transfer: &mut JettonTransfer, tx: &TxRecord| {
            let Some(MsgBody::JettonTransfer { amount, destination, forward_payload, .. }) = &tx.decoded_body else {
                return Err(unexpected(MsgOp::JettonTransfer, tx));
            };
            transfer.sender = tx.input_from.clone();
            transfer.sender_wallet = tx.account.address;
            transfer.recipient = Some(Account::new(*destination));
            transfer.amount = *amount;
            transfer.success = tx.success;
            transfer.note = Note::from_payload(forward_payload.as_deref());
            if let Some(master) = tx.jetton_master {
                transfer.master = master;
            }
            Ok(())
        },
        children: [straw! {
            name: "jetton transfer: internal transfer",
            checks: [has_operation(MsgOp::JettonInternalTransfer)],
            build: |transfer: &mut JettonTransfer, tx: &TxRecord| {
                transfer.recipient_wallet = tx.account.address;
                transfer.success &= tx.success;
                if transfer.master.is_zero() {
                    transfer.master = tx.jetton_master.ok_or(BuildError::MissingField("jetton master"))?;
                }
                Ok(())
            },
            children: [
                straw! {
                    name: "jetton transfer: notify",
                    checks: [has_operation(MsgOp::JettonNotify)],
                    build: |transfer: &mut JettonTransfer, tx: &TxRecord| {
                        let Some(MsgBody::JettonNotify { forward_payload, .. }) = &tx.decoded_body else {
                            return Err(unexpected(MsgOp::JettonNotify, tx));
                        };
                        transfer.recipient = Some(tx.account.clone());
                        if transfer.note.is_none() {
                            transfer.note = Note::from_payload(forward_payload.as_deref());
                        }
                        Ok(())
                    },
                    optional: true,
                },
                excess(),
            ],
        }],
    }
});
