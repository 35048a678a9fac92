//! The straw catalog.
//!
//! - `checks.rs`: predicate constructors used in straw declarations.
//! - `jettons.rs`: jetton transfer and mint actions with their straws.
//!
//! New action families go in their own file next to `jettons.rs`, add a
//! variant to [`Payload`](crate::Payload), and register their straws in
//! [`catalog`].

#[path = "straws/checks.rs"]
pub mod checks;
#[path = "straws/jettons.rs"]
pub mod jettons;

#[cfg(test)]
#[path = "straws/tests.rs"]
mod tests;

use crate::Merger;

/// Straws applied by [`find_actions`](crate::find_actions), in order.
pub fn catalog() -> Vec<&'static dyn Merger> {
    vec![&*jettons::JETTON_TRANSFER_STRAW as &dyn Merger, &*jettons::JETTON_MINT_STRAW as &dyn Merger]
}
