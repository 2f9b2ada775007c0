//! # tally-schema
//!
//! JSON Schemas for everything Tally writes: vote records, extraction
//! reports, unextracted blocks, run and batch summaries, and the roster
//! snapshot format it reads.
//!
//! Types derive `JsonSchema` in `tally-core` and `tally-roster`; this crate
//! collects them into a [`SchemaRegistry`] used by `tally schema` and by
//! tests that check emitted JSON against the published contract.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
