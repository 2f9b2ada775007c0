//! # tally-roster
//!
//! Read-only, time-ranged lookup of who held which council seat on a date.
//!
//! A [`RosterStore`] is built once from a [`RosterSnapshot`] (usually a TOML
//! file), validated against the membership invariants, and then shared by
//! reference with every component that needs it. Nothing mutates it during
//! extraction, so one store can serve many meetings on many threads.

mod error;
mod snapshot;
mod store;

pub use error::RosterError;
pub use snapshot::RosterSnapshot;
pub use store::{RosterStore, SeatedMember};
