//! Raw execution records.
//!
//! These are the leaves of the pipeline: one [`TxRecord`] per transaction in
//! an execution trace, exactly as the external trace decoder hands it over.
//! Nothing in this module knows about straws or actions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TraceError;

// --- Accounts ----------------------------------------------------------------

/// Address of an on-chain account: `<workchain>:<256-bit hash>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    pub workchain: i32,
    pub hash: [u8; 32],
}

impl AccountId {
    pub const fn new(workchain: i32, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// True for the all-zero basechain address, used when a builder never ran.
    pub fn is_zero(&self) -> bool {
        self.workchain == 0 && self.hash.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.workchain)?;
        for byte in &self.hash {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for AccountId {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TraceError::InvalidAddress(s.to_string());
        let caps = regex!(r"^(-?\d{1,10}):([0-9a-fA-F]{64})$").captures(s.trim()).ok_or_else(invalid)?;

        let workchain: i32 = caps[1].parse().map_err(|_| invalid())?;
        let digits = caps[2].as_bytes();
        let mut hash = [0u8; 32];
        for (i, pair) in digits.chunks(2).enumerate() {
            // The regex already guarantees ASCII hex digits.
            let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
            hash[i] = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }

        Ok(AccountId { workchain, hash })
    }
}

impl TryFrom<String> for AccountId {
    type Error = TraceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}

bitflags::bitflags! {
    /// On-chain contract interfaces an account is known to implement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Interfaces: u32 {
        const WALLET        = 1 << 0;
        const JETTON_MASTER = 1 << 1;
        const JETTON_WALLET = 1 << 2;
        const NFT_ITEM      = 1 << 3;
        const DEX_POOL      = 1 << 4;
    }
}

impl Default for Interfaces {
    fn default() -> Self {
        Interfaces::empty()
    }
}

/// An account touched by a transaction, together with what it is known to be.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: AccountId,
    #[serde(default)]
    pub interfaces: Interfaces,
}

impl Account {
    pub fn new(address: AccountId) -> Self {
        Account { address, interfaces: Interfaces::empty() }
    }

    pub fn with_interfaces(mut self, interfaces: Interfaces) -> Self {
        self.interfaces |= interfaces;
        self
    }

    /// Returns true when the account implements every interface in `iface`.
    pub fn is(&self, iface: Interfaces) -> bool {
        self.interfaces.contains(iface)
    }
}

// --- Message bodies ----------------------------------------------------------

/// Canonical names of the message operations the decoder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgOp {
    TextComment,
    EncryptedComment,
    JettonTransfer,
    JettonInternalTransfer,
    JettonNotify,
    Excess,
    JettonBurn,
    Other,
}

impl MsgOp {
    pub fn name(self) -> &'static str {
        match self {
            MsgOp::TextComment => "TextComment",
            MsgOp::EncryptedComment => "EncryptedComment",
            MsgOp::JettonTransfer => "JettonTransfer",
            MsgOp::JettonInternalTransfer => "JettonInternalTransfer",
            MsgOp::JettonNotify => "JettonNotify",
            MsgOp::Excess => "Excess",
            MsgOp::JettonBurn => "JettonBurn",
            MsgOp::Other => "Other",
        }
    }

    /// 32-bit operation prefix of the message body, when it is fixed.
    pub fn opcode(self) -> Option<u32> {
        match self {
            MsgOp::TextComment => Some(0x0000_0000),
            MsgOp::EncryptedComment => Some(0x2167_da4b),
            MsgOp::JettonTransfer => Some(0x0f8a_7ea5),
            MsgOp::JettonInternalTransfer => Some(0x178d_4519),
            MsgOp::JettonNotify => Some(0x7362_d09c),
            MsgOp::Excess => Some(0xd532_76db),
            MsgOp::JettonBurn => Some(0x595f_07bc),
            MsgOp::Other => None,
        }
    }
}

impl fmt::Display for MsgOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comment encrypted for the recipient; the engine only ever carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedComment {
    pub encryption_type: String,
    pub cipher_text: Vec<u8>,
}

/// Decoded inbound message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgBody {
    TextComment {
        text: String,
    },
    EncryptedComment(EncryptedComment),
    JettonTransfer {
        #[serde(default)]
        query_id: u64,
        amount: u128,
        destination: AccountId,
        #[serde(default)]
        response_destination: Option<AccountId>,
        #[serde(default)]
        forward_ton_amount: i64,
        #[serde(default)]
        forward_payload: Option<Box<MsgBody>>,
    },
    JettonInternalTransfer {
        #[serde(default)]
        query_id: u64,
        amount: u128,
        #[serde(default)]
        from: Option<AccountId>,
        #[serde(default)]
        response_address: Option<AccountId>,
        #[serde(default)]
        forward_ton_amount: i64,
    },
    JettonNotify {
        #[serde(default)]
        query_id: u64,
        amount: u128,
        #[serde(default)]
        sender: Option<AccountId>,
        #[serde(default)]
        forward_payload: Option<Box<MsgBody>>,
    },
    Excess {
        #[serde(default)]
        query_id: u64,
    },
    JettonBurn {
        #[serde(default)]
        query_id: u64,
        amount: u128,
        #[serde(default)]
        response_destination: Option<AccountId>,
    },
    Other {
        op_code: u32,
    },
}

impl MsgBody {
    pub fn op(&self) -> MsgOp {
        match self {
            MsgBody::TextComment { .. } => MsgOp::TextComment,
            MsgBody::EncryptedComment(_) => MsgOp::EncryptedComment,
            MsgBody::JettonTransfer { .. } => MsgOp::JettonTransfer,
            MsgBody::JettonInternalTransfer { .. } => MsgOp::JettonInternalTransfer,
            MsgBody::JettonNotify { .. } => MsgOp::JettonNotify,
            MsgBody::Excess { .. } => MsgOp::Excess,
            MsgBody::JettonBurn { .. } => MsgOp::JettonBurn,
            MsgBody::Other { .. } => MsgOp::Other,
        }
    }
}

// --- Transactions ------------------------------------------------------------

/// One transaction of the execution trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    /// Account whose transaction this is.
    pub account: Account,
    /// Sender of the inbound message, if it came from another account.
    #[serde(default)]
    pub input_from: Option<Account>,
    /// Opcode of the inbound message, decoded or not.
    #[serde(default)]
    pub op_code: Option<u32>,
    #[serde(default)]
    pub decoded_body: Option<MsgBody>,
    #[serde(default)]
    pub success: bool,
    /// Value carried by the inbound message, in nanotons.
    #[serde(default)]
    pub input_amount: i64,
    #[serde(default)]
    pub total_fees: i64,
    /// Master of the jetton wallet running this transaction, when the decoder
    /// could resolve it.
    #[serde(default)]
    pub jetton_master: Option<AccountId>,
    #[serde(default)]
    pub utime: DateTime<Utc>,
}

impl TxRecord {
    /// Returns true when the decoded body carries the operation `op`.
    pub fn operation(&self, op: MsgOp) -> bool {
        self.decoded_body.as_ref().is_some_and(|body| body.op() == op)
    }
}
