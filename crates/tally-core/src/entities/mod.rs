//! Entity structs for the council-vote domain.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` so the
//! engine output has a stable, checkable JSON shape.

mod meeting;
mod member;
mod motion;
mod vote;

pub use meeting::Meeting;
pub use member::{CouncilMember, MembershipTerm};
pub use motion::{Motion, MotionSummary};
pub use vote::{MemberVote, SourceSpan, Tally, UnresolvedName, VoteRecord};
