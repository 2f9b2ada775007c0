//! Turns a tally match plus tracker context into member votes.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tally_core::entities::{MemberVote, Tally, UnresolvedName};
use tally_core::enums::{Position, ResolutionMethod};
use tally_core::ids::MemberId;
use tally_core::warnings::ValidationWarning;

use crate::context::VoteContext;
use crate::extractor::TallyMatch;
use crate::resolver::MemberResolver;

/// Member votes and the declared tally after resolution.
#[derive(Debug, Default)]
pub(crate) struct Assembled {
    pub tally: Tally,
    pub votes: BTreeMap<MemberId, MemberVote>,
    pub unresolved: Vec<UnresolvedName>,
    pub warnings: Vec<ValidationWarning>,
}

pub(crate) fn assemble(
    found: &TallyMatch,
    context: &VoteContext,
    resolver: &MemberResolver<'_>,
) -> Assembled {
    let mut out = Assembled {
        tally: found.tally,
        ..Assembled::default()
    };

    for token in &found.names {
        match resolver.resolve(&token.raw) {
            Some(resolution) => match out.votes.entry(resolution.member) {
                Entry::Vacant(slot) => {
                    slot.insert(MemberVote {
                        position: token.position,
                        raw_name: Some(token.raw.clone()),
                        method: resolution.method,
                        recusal_reason: None,
                    });
                }
                Entry::Occupied(slot) => {
                    let kept = slot.get().position;
                    if kept != token.position {
                        out.warnings.push(ValidationWarning::DuplicateMemberVote {
                            member: slot.key().clone(),
                            kept,
                            dropped: token.position,
                        });
                    }
                }
            },
            None => out.unresolved.push(UnresolvedName {
                raw: token.raw.clone(),
                position: token.position,
            }),
        }
    }

    apply_recusals(&mut out, found, context, resolver);

    if found.unanimous {
        for member in resolver.seated() {
            out.votes.entry(member.clone()).or_insert_with(|| MemberVote {
                position: Position::Aye,
                raw_name: None,
                method: ResolutionMethod::Roster,
                recusal_reason: None,
            });
        }
        // A declared aye count is kept as read so the checks can flag it.
        if !found.ayes_declared {
            let ayes = out
                .votes
                .values()
                .filter(|vote| vote.position == Position::Aye)
                .count();
            out.tally.ayes = u32::try_from(ayes).unwrap_or(u32::MAX);
        }
    } else if !found.names.is_empty() {
        let missing: Vec<MemberId> = resolver
            .seated()
            .filter(|member| !out.votes.contains_key(*member))
            .cloned()
            .collect();
        if !missing.is_empty() {
            out.warnings
                .push(ValidationWarning::MissingSeatedMembers { members: missing });
        }
    }

    out
}

/// Attach recusals announced on the item.
///
/// A recused member not named in the roll call gets a `recused` vote. When
/// the anchor declared no recused count, those members are added to the
/// declared tally as well.
fn apply_recusals(
    out: &mut Assembled,
    found: &TallyMatch,
    context: &VoteContext,
    resolver: &MemberResolver<'_>,
) {
    let mut added = 0u32;
    for recusal in &context.recusals {
        let Some(resolution) = resolver.resolve(&recusal.name) else {
            out.unresolved.push(UnresolvedName {
                raw: recusal.name.clone(),
                position: Position::Recused,
            });
            continue;
        };
        match out.votes.get_mut(&resolution.member) {
            Some(vote) if vote.position == Position::Recused => {
                if vote.recusal_reason.is_none() {
                    vote.recusal_reason.clone_from(&recusal.reason);
                }
            }
            Some(vote) => out.warnings.push(ValidationWarning::RecusalConflict {
                member: resolution.member,
                recorded: vote.position,
            }),
            None => {
                out.votes.insert(
                    resolution.member,
                    MemberVote {
                        position: Position::Recused,
                        raw_name: Some(recusal.name.clone()),
                        method: resolution.method,
                        recusal_reason: recusal.reason.clone(),
                    },
                );
                added += 1;
            }
        }
    }
    if !found.recused_declared {
        out.tally.recused = out.tally.recused.saturating_add(added);
    }
}
