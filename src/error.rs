//! Error types.
//!
//! Two families live here and they never mix:
//!
//! - [`BuildError`]: a straw matched structurally but one of its builders could
//!   not extract data from a claimed bubble. The reducer reports it to the
//!   injected sink and treats the attempt as "no match".
//! - [`TraceError`]: the input boundary (loading and decoding a JSON trace).
//!
//! A plain "no match" is not an error at all and has no type here.

use thiserror::Error;

use crate::MsgOp;
use crate::bubble::PayloadKind;

/// Failure of a straw builder against a claimed bubble.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("expected a {expected:?} payload, found {found:?}")]
    UnexpectedPayload { expected: PayloadKind, found: PayloadKind },

    #[error("expected a {expected} message body, found {}", op_name(.found))]
    UnexpectedBody { expected: MsgOp, found: Option<MsgOp> },

    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
}

fn op_name(found: &Option<MsgOp>) -> &'static str {
    found.map(|op| op.name()).unwrap_or("none")
}

/// Errors raised while turning external input into a [`crate::Forest`].
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode trace: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid account address '{0}' (expected <workchain>:<64 hex digits>)")]
    InvalidAddress(String),

    #[error("trace contains no transactions")]
    EmptyTrace,
}

pub type TraceResult<T> = std::result::Result<T, TraceError>;
