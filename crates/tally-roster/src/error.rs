//! Roster loading and validation errors.

use std::path::PathBuf;

use chrono::NaiveDate;
use tally_core::ids::MemberId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse roster: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("member '{0}' is defined more than once")]
    DuplicateMember(MemberId),

    #[error("term for seat '{seat}' references unknown member '{member}'")]
    UnknownMember { member: MemberId, seat: String },

    #[error("term for '{member}' ends ({end}) before it starts ({start})")]
    InvalidRange {
        member: MemberId,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("terms for '{member}' starting {first} and {second} overlap")]
    OverlappingTerms {
        member: MemberId,
        first: NaiveDate,
        second: NaiveDate,
    },

    #[error("member '{0}' has more than one open term")]
    MultipleOpenTerms(MemberId),

    #[error("seat '{seat}' is held by both '{first}' and '{second}' on overlapping dates")]
    SeatConflict {
        seat: String,
        first: MemberId,
        second: MemberId,
    },
}
