//! The per-meeting context tracker.
//!
//! A finite-state object folded over the block sequence. For each block the
//! engine calls [`ContextTracker::observe`] with the block's lead text, then
//! [`ContextTracker::resolve`] when the block's anchor is reached. Motions
//! live in an append-only arena indexed by [`MotionId`]; the open chain is a
//! stack of ids whose parents are always earlier, open entries.

use std::fmt;

use tally_core::entities::{Motion, MotionSummary};
use tally_core::enums::{MotionKind, MotionStatus, Outcome};
use tally_core::ids::MotionId;

use crate::phrases::{self, MotionPhrase};

// ---------------------------------------------------------------------------
// TrackerState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerState {
    NoActiveItem,
    ItemOpen,
    /// One original (or procedural) motion is open.
    MotionPending,
    /// A child motion is open on top of its parent.
    MotionAmended,
}

impl TrackerState {
    /// Valid transitions from this state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::NoActiveItem => &[Self::NoActiveItem, Self::ItemOpen, Self::MotionPending],
            Self::ItemOpen => &[Self::ItemOpen, Self::MotionPending],
            Self::MotionPending => &[
                Self::NoActiveItem,
                Self::ItemOpen,
                Self::MotionPending,
                Self::MotionAmended,
            ],
            Self::MotionAmended => &[Self::ItemOpen, Self::MotionPending, Self::MotionAmended],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoActiveItem => "no_active_item",
            Self::ItemOpen => "item_open",
            Self::MotionPending => "motion_pending",
            Self::MotionAmended => "motion_amended",
        }
    }
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Context handed to the extractor
// ---------------------------------------------------------------------------

/// A recusal announced on the current agenda item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recusal {
    pub name: String,
    pub reason: Option<String>,
}

/// Context captured at the moment a vote anchor is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteContext {
    pub item_number: Option<String>,
    pub item_title: Option<String>,
    pub motion_id: Option<MotionId>,
    pub motion: MotionSummary,
    pub recusals: Vec<Recusal>,
}

#[derive(Debug, Clone)]
struct OpenItem {
    number: String,
    title: Option<String>,
}

enum Event {
    Item(phrases::ItemMarker),
    Motion(MotionPhrase),
    Second(String),
    Withdraw,
    Recusal(phrases::RecusalPhrase),
}

// ---------------------------------------------------------------------------
// ContextTracker
// ---------------------------------------------------------------------------

/// Agenda item, motion chain, and recusal state for one meeting.
#[derive(Debug, Clone)]
pub struct ContextTracker {
    state: TrackerState,
    item: Option<OpenItem>,
    motions: Vec<Motion>,
    open: Vec<MotionId>,
    recusals: Vec<Recusal>,
}

impl Default for ContextTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TrackerState::NoActiveItem,
            item: None,
            motions: Vec::new(),
            open: Vec::new(),
            recusals: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> TrackerState {
        self.state
    }

    /// Every motion seen so far, in creation order.
    #[must_use]
    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    #[must_use]
    pub fn into_motions(self) -> Vec<Motion> {
        self.motions
    }

    /// The innermost open motion.
    #[must_use]
    pub fn current_motion(&self) -> Option<&Motion> {
        self.open.last().and_then(|id| self.motion(*id))
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&str> {
        self.item.as_ref().map(|item| item.number.as_str())
    }

    #[must_use]
    pub fn recusals(&self) -> &[Recusal] {
        &self.recusals
    }

    fn motion(&self, id: MotionId) -> Option<&Motion> {
        self.motions.get(id.0 as usize)
    }

    fn motion_mut(&mut self, id: MotionId) -> Option<&mut Motion> {
        self.motions.get_mut(id.0 as usize)
    }

    /// Apply every procedural event found in `lead`, in document order.
    pub fn observe(&mut self, lead: &str) {
        let motions = phrases::motions(lead);
        let mut events: Vec<(usize, Event)> = Vec::new();
        events.extend(
            phrases::item_markers(lead)
                .into_iter()
                .map(|marker| (marker.offset, Event::Item(marker))),
        );
        events.extend(
            phrases::seconds(lead, &motions)
                .into_iter()
                .map(|(offset, name)| (offset, Event::Second(name))),
        );
        events.extend(
            phrases::withdrawals(lead)
                .into_iter()
                .map(|offset| (offset, Event::Withdraw)),
        );
        events.extend(
            phrases::recusals(lead)
                .into_iter()
                .map(|recusal| (recusal.offset, Event::Recusal(recusal))),
        );
        events.extend(
            motions
                .into_iter()
                .map(|motion| (motion.offset, Event::Motion(motion))),
        );
        // Stable sort keeps item markers ahead of motions on the same offset.
        events.sort_by_key(|(offset, _)| *offset);

        for (_, event) in events {
            match event {
                Event::Item(marker) => self.open_item(marker.number, marker.title),
                Event::Motion(phrase) => self.open_motion(phrase),
                Event::Second(name) => self.second(name),
                Event::Withdraw => self.withdraw(),
                Event::Recusal(recusal) => self.recuse(recusal.name, recusal.reason),
            }
        }
    }

    /// Open a new agenda item. Any motion chain still open is abandoned and
    /// stays pending in the arena; recusals of the previous item are cleared.
    pub fn open_item(&mut self, number: String, title: Option<String>) {
        if !self.open.is_empty() {
            tracing::debug!(
                item = %number,
                abandoned = self.open.len(),
                "new item opened with motions still pending"
            );
            self.open.clear();
        }
        self.recusals.clear();
        self.item = Some(OpenItem { number, title });
        self.transition(TrackerState::ItemOpen);
    }

    /// Record a motion phrase.
    ///
    /// Amendments, substitutes, and procedural motions made while a motion
    /// is open become children of the innermost open motion. A new original
    /// motion replaces the open chain. An amendment with nothing open to
    /// amend is recorded as an original motion.
    pub fn open_motion(&mut self, phrase: MotionPhrase) {
        let mut kind = phrase.kind();
        let parent = match (kind, self.open.last()) {
            (MotionKind::Original, Some(_)) => {
                tracing::debug!(
                    abandoned = self.open.len(),
                    "original motion replaces open chain"
                );
                self.open.clear();
                None
            }
            (MotionKind::Original, None) => None,
            (_, Some(parent)) => Some(*parent),
            (_, None) => {
                if kind.requires_parent() {
                    kind = MotionKind::Original;
                }
                None
            }
        };

        let id = MotionId(u32::try_from(self.motions.len()).unwrap_or(u32::MAX));
        self.motions.push(Motion {
            id,
            kind,
            text: phrase.text,
            mover: phrase.mover,
            seconder: phrase.seconder,
            parent,
            status: MotionStatus::Pending,
            agenda_item: self.item.as_ref().map(|item| item.number.clone()),
        });
        self.open.push(id);
        tracing::debug!(motion = %id, kind = %kind, parent = ?parent, "motion opened");
        self.transition(self.chain_state());
    }

    fn second(&mut self, name: String) {
        if let Some(id) = self.open.last().copied()
            && let Some(motion) = self.motion_mut(id)
            && motion.seconder.is_none()
        {
            motion.seconder = Some(name);
        }
    }

    /// Withdraw the innermost open motion.
    pub fn withdraw(&mut self) {
        let Some(id) = self.open.pop() else {
            return;
        };
        if let Some(motion) = self.motion_mut(id)
            && motion.status.can_transition_to(MotionStatus::Withdrawn)
        {
            motion.status = MotionStatus::Withdrawn;
        }
        tracing::debug!(motion = %id, "motion withdrawn");
        self.transition(self.chain_state());
    }

    /// Record a recusal on the current item.
    pub fn recuse(&mut self, name: String, reason: Option<String>) {
        if let Some(existing) = self
            .recusals
            .iter_mut()
            .find(|r| r.name.eq_ignore_ascii_case(&name))
        {
            if existing.reason.is_none() {
                existing.reason = reason;
            }
            return;
        }
        self.recusals.push(Recusal { name, reason });
    }

    /// Capture the context for a vote and close the innermost open motion.
    ///
    /// With a known outcome the motion's status follows it. Without one the
    /// vote still consumes the motion, which stays `pending` in the arena.
    /// Closing a child re-opens its parent as the innermost motion.
    pub fn resolve(&mut self, outcome: Option<Outcome>) -> VoteContext {
        let context = self.snapshot();

        if let Some(id) = self.open.pop()
            && let Some(outcome) = outcome
            && let Some(motion) = self.motion_mut(id)
        {
            let next = outcome.motion_status();
            if motion.status.can_transition_to(next) {
                motion.status = next;
            }
        }

        let next = self.chain_state();
        if next == TrackerState::NoActiveItem {
            self.recusals.clear();
        }
        self.transition(next);
        context
    }

    /// Current context without changing any state.
    #[must_use]
    pub fn snapshot(&self) -> VoteContext {
        let motion = self.current_motion();
        VoteContext {
            item_number: self.item.as_ref().map(|item| item.number.clone()),
            item_title: self.item.as_ref().and_then(|item| item.title.clone()),
            motion_id: motion.map(|m| m.id),
            motion: motion.map(MotionSummary::from).unwrap_or_default(),
            recusals: self.recusals.clone(),
        }
    }

    /// State implied by the open chain depth and the current item.
    fn chain_state(&self) -> TrackerState {
        match self.open.len() {
            0 if self.item.is_some() => TrackerState::ItemOpen,
            0 => TrackerState::NoActiveItem,
            1 => TrackerState::MotionPending,
            _ => TrackerState::MotionAmended,
        }
    }

    /// Move to `next`. The state always follows the motion chain; a move the
    /// table does not allow is logged and reported as `false`.
    fn transition(&mut self, next: TrackerState) -> bool {
        let allowed = self.state.can_transition_to(next);
        if !allowed {
            tracing::warn!(from = %self.state, to = %next, "tracker transition not in table");
        } else if self.state != next {
            tracing::trace!(from = %self.state, to = %next, "tracker transition");
        }
        self.state = next;
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transitions_follow_table() {
        assert!(TrackerState::NoActiveItem.can_transition_to(TrackerState::ItemOpen));
        assert!(TrackerState::MotionPending.can_transition_to(TrackerState::MotionAmended));
        assert!(!TrackerState::ItemOpen.can_transition_to(TrackerState::MotionAmended));
        assert!(!TrackerState::MotionAmended.can_transition_to(TrackerState::NoActiveItem));
    }

    #[test]
    fn transition_outside_table_is_reported() {
        let mut tracker = ContextTracker::new();
        assert!(tracker.transition(TrackerState::ItemOpen));
        assert!(!tracker.transition(TrackerState::MotionAmended));
        assert_eq!(tracker.state(), TrackerState::MotionAmended);
    }

    #[test]
    fn item_then_motion_then_vote() {
        let mut tracker = ContextTracker::new();
        tracker.observe("Item 12. Street Repairs\nPhan moved to approve the contract, seconded by Lopez.");
        assert_eq!(tracker.state(), TrackerState::MotionPending);

        let context = tracker.resolve(Some(Outcome::Pass));
        assert_eq!(context.item_number.as_deref(), Some("12"));
        assert_eq!(context.item_title.as_deref(), Some("Street Repairs"));
        assert_eq!(context.motion.mover.as_deref(), Some("Phan"));
        assert_eq!(context.motion_id, Some(MotionId(0)));
        assert_eq!(tracker.state(), TrackerState::ItemOpen);
        assert_eq!(tracker.motions()[0].status, MotionStatus::Adopted);
    }

    #[test]
    fn amendment_resolution_returns_to_parent() {
        let mut tracker = ContextTracker::new();
        tracker.observe(
            "Item 3. Zoning\nPhan moved to approve the ordinance, seconded by Lopez.\nMendoza moved to amend the motion to exempt ward 2, seconded by Bacerra.",
        );
        assert_eq!(tracker.state(), TrackerState::MotionAmended);

        let amendment = tracker.resolve(Some(Outcome::Fail));
        assert_eq!(amendment.motion_id, Some(MotionId(1)));
        assert_eq!(amendment.motion.kind, Some(MotionKind::Amendment));
        assert_eq!(tracker.state(), TrackerState::MotionPending);
        assert_eq!(tracker.current_motion().map(|m| m.id), Some(MotionId(0)));
        assert_eq!(tracker.motions()[1].parent, Some(MotionId(0)));
        assert_eq!(tracker.motions()[1].status, MotionStatus::Failed);
        assert_eq!(tracker.motions()[0].status, MotionStatus::Pending);

        let main = tracker.resolve(Some(Outcome::Pass));
        assert_eq!(main.motion_id, Some(MotionId(0)));
        assert_eq!(tracker.state(), TrackerState::ItemOpen);
    }

    #[test]
    fn withdrawn_motion_is_not_resolved() {
        let mut tracker = ContextTracker::new();
        tracker.observe("Item 4. Fees\nPhan moved to deny the appeal, seconded by Lopez. The motion was withdrawn.\nLopez moved to approve the appeal, seconded by Mendoza.");
        assert_eq!(tracker.motions()[0].status, MotionStatus::Withdrawn);
        let context = tracker.resolve(Some(Outcome::Pass));
        assert_eq!(context.motion_id, Some(MotionId(1)));
    }

    #[test]
    fn recusals_are_scoped_to_the_item() {
        let mut tracker = ContextTracker::new();
        tracker.observe("Item 7. Land Sale\nCouncilmember Lopez recused herself as she owns adjacent property.");
        assert_eq!(tracker.recusals().len(), 1);
        let context = tracker.resolve(Some(Outcome::Pass));
        assert_eq!(context.recusals[0].name, "Lopez");

        tracker.observe("Item 8. Parks");
        assert!(tracker.recusals().is_empty());
    }

    #[test]
    fn motion_without_item_and_orphan_amendment() {
        let mut tracker = ContextTracker::new();
        tracker.observe("Phan moved to amend the budget, seconded by Lopez.");
        assert_eq!(tracker.state(), TrackerState::MotionPending);
        assert_eq!(tracker.motions()[0].kind, MotionKind::Original);
        assert_eq!(tracker.motions()[0].agenda_item, None);

        tracker.resolve(None);
        assert_eq!(tracker.state(), TrackerState::NoActiveItem);
        assert_eq!(tracker.motions()[0].status, MotionStatus::Pending);
    }
}
