//! # tally-extract
//!
//! The vote extraction engine. Per meeting, data flows strictly forward:
//!
//! ```text
//! normalize -> segment -> (context tracker <-> pattern extractor) -> resolve -> validate
//! ```
//!
//! The roster and pattern library are read-only inputs. Problems with
//! individual blocks (no matching pattern, unresolved names, failed checks)
//! are values in the [`ExtractionReport`](tally_core::responses::ExtractionReport);
//! only unusable input is an [`ExtractError`].
//!
//! ```no_run
//! use tally_core::entities::Meeting;
//! use tally_core::enums::MeetingType;
//! use tally_extract::{Engine, EngineSettings, MeetingInput, PatternLibrary};
//! use tally_roster::RosterStore;
//!
//! let roster = RosterStore::load("roster.toml".as_ref()).unwrap();
//! let library = PatternLibrary::builtin();
//! let engine = Engine::new(&roster, &library, EngineSettings::default());
//! let date = chrono::NaiveDate::from_ymd_opt(2021, 3, 2).unwrap();
//! let report = engine
//!     .extract(&MeetingInput {
//!         meeting: Meeting::new("santa-ana", date, MeetingType::Regular),
//!         agenda_text: std::fs::read_to_string("agenda.txt").unwrap(),
//!         minutes_text: std::fs::read_to_string("minutes.txt").unwrap(),
//!     })
//!     .unwrap();
//! println!("{} accepted", report.summary.accepted);
//! ```

pub mod agenda;
mod assemble;
pub mod context;
pub mod engine;
mod error;
pub mod extractor;
pub mod normalize;
pub mod patterns;
mod phrases;
pub mod resolver;
pub mod segment;
pub mod validator;

pub use context::{ContextTracker, TrackerState, VoteContext};
pub use engine::{Engine, EngineSettings, MeetingInput, MeetingResult};
pub use error::ExtractError;
pub use patterns::{PatternLibrary, PatternSet, VariantKind};
