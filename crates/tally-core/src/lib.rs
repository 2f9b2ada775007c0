//! # tally-core
//!
//! Core types shared by every Tally crate.
//!
//! - Entity structs for the council-vote domain (members, terms, meetings,
//!   motions, vote records)
//! - Status and position enums, with transition tables where a lifecycle exists
//! - Identifier newtypes and formatting helpers
//! - Validation warnings attached to vote records
//! - Report types emitted by the extraction engine
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod warnings;
