//! Loading execution traces from JSON.
//!
//! A trace file holds either one root node or an array of roots:
//!
//! ```json
//! {
//!   "transaction": { "account": { "address": "0:ab..." }, "op_code": 1, "success": true },
//!   "children": [ { "transaction": { ... }, "children": [] } ]
//! }
//! ```
//!
//! Each node becomes one raw-record bubble; children keep their order.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{TraceError, TraceResult};
use crate::{Bubble, BubbleId, Forest, MsgBody, TxRecord};

#[derive(Debug, Clone, Deserialize)]
pub struct TraceNode {
    pub transaction: TxRecord,
    #[serde(default)]
    pub children: Vec<TraceNode>,
}

/// Build a forest from decoded trace roots.
pub fn build_forest(roots: Vec<TraceNode>) -> TraceResult<Forest> {
    if roots.is_empty() {
        return Err(TraceError::EmptyTrace);
    }

    let mut forest = Forest::new();
    let mut stack: Vec<(Option<BubbleId>, TraceNode)> = roots.into_iter().rev().map(|node| (None, node)).collect();
    while let Some((parent, node)) = stack.pop() {
        let bubble = Bubble::from_tx(normalize(node.transaction));
        let id = match parent {
            None => forest.add_root(bubble),
            Some(parent) => match forest.add_child(parent, bubble) {
                Some(id) => id,
                None => continue,
            },
        };
        stack.extend(node.children.into_iter().rev().map(|child| (Some(id), child)));
    }
    Ok(forest)
}

/// Fill the raw opcode from the decoded body when the decoder left it out.
fn normalize(mut tx: TxRecord) -> TxRecord {
    if tx.op_code.is_none() {
        tx.op_code = match &tx.decoded_body {
            Some(MsgBody::Other { op_code }) => Some(*op_code),
            Some(body) => body.op().opcode(),
            None => None,
        };
    }
    tx
}

pub fn parse_trace(json: &str) -> TraceResult<Forest> {
    let roots = if json.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<TraceNode>>(json)?
    } else {
        vec![serde_json::from_str::<TraceNode>(json)?]
    };
    build_forest(roots)
}

pub fn read_trace(mut reader: impl Read) -> TraceResult<Forest> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    parse_trace(&json)
}

pub fn load_trace(path: impl AsRef<Path>) -> TraceResult<Forest> {
    let path = path.as_ref();
    log::debug!("loading trace from {}", path.display());
    parse_trace(&fs::read_to_string(path)?)
}
