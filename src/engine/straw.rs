//! Straws: declarative tree patterns.
//!
//! A [`Straw<T>`] describes one bubble (its `checks`) and, recursively, the
//! children that must (or may) hang below it. Every straw in the tree also
//! carries an optional builder that copies fields out of the bubble it claims
//! into the action under construction (`T`).
//!
//! ```text
//! Straw<JettonMint> "mint"            checks: [is_tx, opcode 0xb56b9598]
//! └── Straw "internal transfer"       checks: [is_tx, JettonInternalTransfer]
//!     ├── Straw "notify"   (optional) checks: [is_tx, JettonNotify]
//!     └── Straw "excess"   (optional) checks: [is_tx, Excess]
//! ```
//!
//! Straws are immutable once built and hold only pure functions, so a single
//! instance is shared by every trace (they are `Send + Sync` and usually live
//! in a `Lazy` static).

use std::fmt;

use super::matcher::Claims;
use crate::error::BuildError;
use crate::{Bubble, BubbleId, Forest, PayloadKind, TxRecord};

/// Boolean predicate over a bubble.
pub type Check = Box<dyn Fn(&Bubble) -> bool + Send + Sync>;

/// Copies data from a claimed bubble into the action being built.
pub type Builder<T> = Box<dyn Fn(&mut T, &Bubble) -> Result<(), BuildError> + Send + Sync>;

/// Adapt a builder that only understands raw transactions.
pub fn with_tx<T, F>(f: F) -> Builder<T>
where
    T: 'static,
    F: Fn(&mut T, &TxRecord) -> Result<(), BuildError> + Send + Sync + 'static,
{
    Box::new(move |action, bubble| {
        let tx = bubble
            .payload
            .as_tx()
            .ok_or(BuildError::UnexpectedPayload { expected: PayloadKind::Tx, found: bubble.payload.kind() })?;
        f(action, tx)
    })
}

/// A pattern over a bubble and its subtree, producing `T` when merged.
pub struct Straw<T> {
    pub name: &'static str,
    /// All must hold, evaluated left to right, stopping at the first failure.
    pub checks: Vec<Check>,
    pub builder: Option<Builder<T>>,
    /// Child patterns, each looked up among the candidate's children.
    pub children: Vec<Straw<T>>,
    /// When set, the parent still matches if no child satisfies this straw.
    pub optional: bool,
}

impl<T> fmt::Debug for Straw<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Straw")
            .field("name", &self.name)
            .field("checks", &self.checks.len())
            .field("builder", &self.builder.as_ref().map(|_| "<function>"))
            .field("children", &self.children)
            .field("optional", &self.optional)
            .finish()
    }
}

impl<T> Straw<T> {
    pub(crate) fn passes_checks(&self, bubble: &Bubble) -> bool {
        self.checks.iter().all(|check| check(bubble))
    }

    /// Run a complete top-level match attempt against `id`.
    ///
    /// Returns the claim-set on success. On failure every tentative claim is
    /// dropped together with the attempt.
    pub fn claim(&self, forest: &Forest, id: BubbleId) -> Option<Claims<'_, T>> {
        let mut claims = Claims::new();
        if self.attempt_match(forest, id, &mut claims) { Some(claims) } else { None }
    }
}
