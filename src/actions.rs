//! External action records.
//!
//! This is what downstream consumers see: a flat, serializable record per
//! recognized event, with exactly one body populated according to `kind`.

use serde::Serialize;

use crate::{AccountId, EncryptedComment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKind {
    JettonTransfer,
    JettonMint,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::JettonTransfer => "JettonTransfer",
            ActionKind::JettonMint => "JettonMint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jetton_transfer: Option<JettonTransferAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jetton_mint: Option<JettonMintAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JettonTransferAction {
    pub jetton: AccountId,
    pub sender: Option<AccountId>,
    pub recipient: Option<AccountId>,
    pub senders_wallet: AccountId,
    pub recipients_wallet: AccountId,
    /// Serialized as a decimal string; jetton amounts overflow JSON numbers.
    #[serde(serialize_with = "as_decimal")]
    pub amount: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_comment: Option<EncryptedComment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JettonMintAction {
    pub jetton: AccountId,
    pub recipient: AccountId,
    pub recipients_wallet: AccountId,
    #[serde(serialize_with = "as_decimal")]
    pub amount: u128,
}

fn as_decimal<S: serde::Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(amount)
}
