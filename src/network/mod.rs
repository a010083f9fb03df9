//! Ledger access
//!
//! This module defines the boundary to a ledger node: the [`Ledger`]
//! capability trait every transport implements, and the [`Transactor`] that
//! builds records from the ledger's current state and submits signed ones.
//!
//! The HTTP transport itself lives outside this crate.

pub mod ledger;
pub mod transactor;

pub use ledger::{accept_submission, check_anchor, FeeSchedule, Ledger};
pub use transactor::{Transactor, NO_TRANSFER};
