//! Reduction: collapse a matched subtree into one bubble.
//!
//! ```text
//! before                                   after
//! A (claimed, root)                        A' = Mint { .. }
//! ├── B (claimed)                          ├── X
//! │   ├── C (claimed)                      └── D
//! │   └── X                  ──merge──▶
//! └── D
//! ```
//!
//! The new bubble is computed off to the side first: builders run against a
//! scratch action, participants and value flow are folded into values seeded
//! from the matched root. Every claimed bubble is then folded in, the root
//! included, so the root's accounts and flow count twice.
//! Only when every builder succeeded is the forest touched, by overwriting the
//! root slot and pruning the swallowed descendants. A builder failure leaves
//! the forest exactly as it was.

use super::matcher::Claims;
use super::sink::{ErrorSink, Level, Report};
use super::straw::Straw;
use crate::error::BuildError;
use crate::{AccountId, Bubble, BubbleId, Forest, Payload, ValueFlow};

/// Type-erased face of a [`Straw`], so one catalog can hold straws producing
/// different action types.
pub trait Merger: Send + Sync {
    fn name(&self) -> &'static str;

    /// Match at `id` and, on success, rewrite the bubble in place.
    ///
    /// Returns false when nothing matched or a builder failed; the forest is
    /// unchanged in both cases.
    fn merge(&self, forest: &mut Forest, id: BubbleId, sink: &dyn ErrorSink) -> bool;
}

/// Working state of one merge.
struct Fold<T> {
    action: T,
    accounts: Vec<AccountId>,
    value_flow: ValueFlow,
    children: Vec<BubbleId>,
    swallowed: Vec<BubbleId>,
}

impl<T: Default> Fold<T> {
    fn seeded(root: &Bubble) -> Self {
        Fold {
            action: T::default(),
            accounts: root.accounts.clone(),
            value_flow: root.value_flow.clone(),
            children: Vec::new(),
            swallowed: Vec::new(),
        }
    }

    /// Visit claimed bubbles in pre-order starting at `id`.
    fn visit(&mut self, forest: &Forest, claims: &Claims<'_, T>, root: BubbleId, id: BubbleId) -> Result<(), (BubbleId, BuildError)> {
        let Some(bubble) = forest.get(id) else {
            return Ok(());
        };
        if let Some(builder) = claims.get(id).and_then(|straw| straw.builder.as_ref()) {
            builder(&mut self.action, bubble).map_err(|err| (id, err))?;
        }
        self.value_flow.merge(&bubble.value_flow);
        self.accounts.extend_from_slice(&bubble.accounts);
        if id != root {
            self.swallowed.push(id);
        }
        for &child in &bubble.children {
            if claims.contains(child) {
                self.visit(forest, claims, root, child)?;
            } else {
                self.children.push(child);
            }
        }
        Ok(())
    }
}

impl<T> Straw<T>
where
    T: Default + Into<Payload>,
{
    /// Compute the replacement bubble for a successful claim-set.
    fn reduce(&self, forest: &Forest, root: BubbleId, claims: &Claims<'_, T>) -> Result<(Bubble, Vec<BubbleId>), (BubbleId, BuildError)> {
        let root_bubble = forest.get(root).ok_or((root, BuildError::MissingField("root bubble")))?;
        let mut fold = Fold::seeded(root_bubble);
        fold.visit(forest, claims, root, root)?;

        let bubble = Bubble {
            payload: fold.action.into(),
            accounts: fold.accounts,
            children: fold.children,
            value_flow: fold.value_flow,
        };
        Ok((bubble, fold.swallowed))
    }
}

impl<T> Merger for Straw<T>
where
    T: Default + Into<Payload>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn merge(&self, forest: &mut Forest, id: BubbleId, sink: &dyn ErrorSink) -> bool {
        let Some(claims) = self.claim(forest, id) else {
            return false;
        };

        match self.reduce(forest, id, &claims) {
            Ok((bubble, swallowed)) => {
                log::debug!("straw '{}' merged {} bubbles at {:?}", self.name, claims.len(), id);
                for gone in swallowed {
                    forest.prune(gone);
                }
                forest.replace(id, bubble);
                true
            }
            Err((failed, err)) => {
                let description = forest.get(failed).map(|b| b.to_string()).unwrap_or_default();
                sink.send(
                    Report::new("Straw.Merge", Level::Error)
                        .with("straw", self.name)
                        .with("bubble", description)
                        .with("error", err.to_string()),
                );
                false
            }
        }
    }
}
