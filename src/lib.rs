extern crate self as bath;

#[macro_use]
mod macros;
mod actions;
mod api;
mod bubble;
mod engine;
mod error;
mod record;
pub mod straws;
mod trace;
mod value_flow;

pub use actions::{Action, ActionKind, JettonMintAction, JettonTransferAction};
pub use api::{
    FindResult, FindResultVerbose, Options, PassSummary, RunDetails, default_catalog, find_actions,
    find_actions_verbose_with, find_actions_with,
};
pub use bubble::{Bubble, BubbleId, Forest, Payload, PayloadKind};
pub use engine::{
    Actioner, Bath, Builder, Check, Claims, CollectingSink, ErrorSink, Level, LogSink, Merger, NoopSink, PassMetrics,
    Report, RunMetrics, RunResult, SaturationMetrics, Straw, project_forest, with_tx,
};
pub use error::{BuildError, TraceError, TraceResult};
pub use record::{Account, AccountId, EncryptedComment, Interfaces, MsgBody, MsgOp, TxRecord};
pub use trace::{TraceNode, build_forest, load_trace, parse_trace, read_trace};
pub use value_flow::{AccountFlow, ValueFlow};
