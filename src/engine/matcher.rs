//! Greedy, backtracking-free matching of a straw against a bubble subtree.
//!
//! A match attempt walks the straw and the bubble tree in lockstep:
//!
//! ```text
//! attempt_match(straw, bubble)
//!   1. every check holds on bubble?              no -> false
//!   2. for each child straw, in order:
//!        scan bubble.children in order, first success wins
//!        none found and child straw required?    yes -> false
//!   3. bubble already claimed in this attempt?   yes -> false
//!   4. claim bubble for straw                        -> true
//! ```
//!
//! Decisions are never revisited: once a child straw has claimed a child, a
//! later required child straw that finds nothing fails the whole attempt.
//! Each individual candidate, however, is tried transactionally. Claims made
//! while exploring a candidate that ends up failing are rolled back before the
//! next candidate is tried, so they cannot leak into the final claim-set.

use std::collections::HashMap;

use super::straw::Straw;
use crate::{BubbleId, Forest};

/// Bubbles claimed by one top-level attempt, each mapped to its straw.
///
/// Keys are unique: a bubble is claimed at most once per attempt.
pub struct Claims<'s, T> {
    /// Claim order, used for rollback.
    order: Vec<BubbleId>,
    by_bubble: HashMap<BubbleId, &'s Straw<T>>,
}

impl<'s, T> Claims<'s, T> {
    pub fn new() -> Self {
        Claims { order: Vec::new(), by_bubble: HashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: BubbleId) -> bool {
        self.by_bubble.contains_key(&id)
    }

    pub fn get(&self, id: BubbleId) -> Option<&'s Straw<T>> {
        self.by_bubble.get(&id).copied()
    }

    /// Claimed bubbles in the order they were claimed (children before parents).
    pub fn bubbles(&self) -> &[BubbleId] {
        &self.order
    }

    fn mark(&self) -> usize {
        self.order.len()
    }

    fn rollback(&mut self, mark: usize) {
        for id in self.order.drain(mark..) {
            self.by_bubble.remove(&id);
        }
    }

    fn insert(&mut self, id: BubbleId, straw: &'s Straw<T>) {
        self.order.push(id);
        self.by_bubble.insert(id, straw);
    }
}

impl<T> Default for Claims<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Straw<T> {
    /// Try to satisfy this straw at `id`, recording claims on success.
    ///
    /// On `false` the caller owns cleanup: claims recorded by this call may
    /// still be present and must be discarded (or rolled back).
    pub fn attempt_match<'s>(&'s self, forest: &Forest, id: BubbleId, claims: &mut Claims<'s, T>) -> bool {
        let Some(bubble) = forest.get(id) else {
            return false;
        };
        if !self.passes_checks(bubble) {
            return false;
        }

        for child_straw in &self.children {
            let mut found = false;
            for &child in &bubble.children {
                let mark = claims.mark();
                if child_straw.attempt_match(forest, child, claims) {
                    found = true;
                    break;
                }
                claims.rollback(mark);
            }
            if !found && !child_straw.optional {
                return false;
            }
        }

        if claims.contains(id) {
            log::trace!("straw '{}' lost {:?}: already claimed in this attempt", self.name, id);
            return false;
        }

        claims.insert(id, self);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::straws::checks::{has_opcode, is_tx};
    use crate::{Account, AccountId, Bubble, TxRecord};

    fn tx(op: u32) -> Bubble {
        Bubble::from_tx(TxRecord {
            account: Account::new(AccountId::new(0, [op as u8; 32])),
            op_code: Some(op),
            success: true,
            ..Default::default()
        })
    }

    fn leaf(name: &'static str, op: u32, optional: bool) -> Straw<()> {
        straw! { name: name, checks: [is_tx(), has_opcode(op)], optional: optional }
    }

    #[test]
    fn failing_checks_leave_claims_untouched() {
        let mut forest = Forest::new();
        let root = forest.add_root(tx(1));
        let straw = leaf("other", 2, false);

        let mut claims = Claims::new();
        assert!(!straw.attempt_match(&forest, root, &mut claims));
        assert!(claims.is_empty());
    }

    #[test]
    fn optional_child_may_be_absent() {
        let mut forest = Forest::new();
        let root = forest.add_root(tx(1));
        let straw: Straw<()> = straw! { name: "root", checks: [has_opcode(1)], children: [leaf("opt", 2, true)] };

        let claims = straw.claim(&forest, root).expect("optional child should not block the match");
        assert_eq!(claims.bubbles(), &[root]);
    }

    #[test]
    fn required_child_must_be_present() {
        let mut forest = Forest::new();
        let root = forest.add_root(tx(1));
        let straw: Straw<()> = straw! { name: "root", checks: [is_tx(), has_opcode(1)], children: [leaf("req", 2, false)] };

        assert!(straw.claim(&forest, root).is_none());
    }

    #[test]
    fn first_matching_child_wins() {
        let mut forest = Forest::new();
        let root = forest.add_root(tx(1));
        let first = forest.add_child(root, tx(2)).unwrap();
        let _second = forest.add_child(root, tx(2)).unwrap();
        let straw: Straw<()> = straw! { name: "root", checks: [has_opcode(1)], children: [leaf("c", 2, false)] };

        let claims = straw.claim(&forest, root).unwrap();
        assert_eq!(claims.bubbles(), &[first, root]);
    }

    #[test]
    fn one_child_cannot_satisfy_two_required_siblings() {
        let mut forest = Forest::new();
        let root = forest.add_root(tx(1));
        forest.add_child(root, tx(2)).unwrap();
        let straw: Straw<()> = straw! {
            name: "root",
            checks: [has_opcode(1)],
            children: [leaf("a", 2, false), leaf("b", 2, false)],
        };

        assert!(straw.claim(&forest, root).is_none());
    }

    #[test]
    fn two_siblings_take_two_distinct_children() {
        let mut forest = Forest::new();
        let root = forest.add_root(tx(1));
        let c1 = forest.add_child(root, tx(2)).unwrap();
        let c2 = forest.add_child(root, tx(2)).unwrap();
        let straw: Straw<()> = straw! {
            name: "root",
            checks: [has_opcode(1)],
            children: [leaf("a", 2, false), leaf("b", 2, false)],
        };

        let claims = straw.claim(&forest, root).unwrap();
        assert_eq!(claims.len(), 3);
        assert_eq!(claims.get(c1).map(|s| s.name), Some("a"));
        assert_eq!(claims.get(c2).map(|s| s.name), Some("b"));
    }

    #[test]
    fn failed_candidate_does_not_leak_claims() {
        // root(1) -> a(2) -> x(3)      a lacks the required grandchild 4
        //         -> b(2) -> y(4)
        let mut forest = Forest::new();
        let root = forest.add_root(tx(1));
        let a = forest.add_child(root, tx(2)).unwrap();
        let x = forest.add_child(a, tx(3)).unwrap();
        let b = forest.add_child(root, tx(2)).unwrap();
        let y = forest.add_child(b, tx(4)).unwrap();

        let straw: Straw<()> = straw! {
            name: "root",
            checks: [has_opcode(1)],
            children: [straw! {
                name: "mid",
                checks: [has_opcode(2)],
                children: [leaf("opt3", 3, true), leaf("req4", 4, false)],
            }],
        };

        let claims = straw.claim(&forest, root).unwrap();
        assert!(!claims.contains(a));
        assert!(!claims.contains(x), "claim made under a failed candidate leaked");
        assert_eq!(claims.bubbles(), &[y, b, root]);
    }
}
