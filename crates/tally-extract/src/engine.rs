//! The per-meeting extraction pipeline and the parallel batch runner.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tally_config::{ResolverConfig, TallyConfig};
use tally_core::entities::{Meeting, MotionSummary, SourceSpan, VoteRecord};
use tally_core::ids;
use tally_core::responses::{ExtractionReport, RunSummary, UnextractedBlock};
use tally_roster::RosterStore;

use crate::agenda::AgendaIndex;
use crate::assemble::assemble;
use crate::context::{ContextTracker, VoteContext};
use crate::extractor::{ContextFields, PatternExtractor, TallyMatch};
use crate::normalize::{NormalizedText, normalize};
use crate::patterns::{CompiledPatternSet, PatternLibrary};
use crate::resolver::MemberResolver;
use crate::segment::{CandidateBlock, Segmenter};
use crate::validator::{self, Route};
use crate::ExtractError;

/// Engine knobs, usually taken from [`TallyConfig`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub context_window: usize,
    pub min_quality_score: u8,
    pub resolver: ResolverConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&TallyConfig::default())
    }
}

impl From<&TallyConfig> for EngineSettings {
    fn from(config: &TallyConfig) -> Self {
        Self {
            context_window: config.extraction.context_window,
            min_quality_score: config.extraction.min_quality_score,
            resolver: config.resolver.clone(),
        }
    }
}

/// Text and metadata for one meeting.
#[derive(Debug, Clone)]
pub struct MeetingInput {
    pub meeting: Meeting,
    pub agenda_text: String,
    pub minutes_text: String,
}

/// Result of one meeting in a batch.
#[derive(Debug)]
pub enum MeetingResult {
    Extracted(Box<ExtractionReport>),
    Failed(ExtractError),
    /// Not started because the batch was cancelled.
    Skipped,
}

/// Runs extraction against one read-only roster and pattern library.
///
/// The engine holds no mutable state; it can be shared across threads.
#[derive(Debug, Clone)]
pub struct Engine<'a> {
    roster: &'a RosterStore,
    library: &'a PatternLibrary,
    settings: EngineSettings,
}

impl<'a> Engine<'a> {
    #[must_use]
    pub const fn new(
        roster: &'a RosterStore,
        library: &'a PatternLibrary,
        settings: EngineSettings,
    ) -> Self {
        Self {
            roster,
            library,
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Extract every vote from one meeting.
    ///
    /// # Errors
    ///
    /// Only unrecoverable input problems are errors: empty agenda or minutes
    /// text, or a pattern set that does not compile. Blocks that cannot be
    /// read are reported in `unextracted`.
    pub fn extract(&self, input: &MeetingInput) -> Result<ExtractionReport, ExtractError> {
        let meeting = &input.meeting;
        let meeting_id = meeting.id();

        let minutes = normalize(&input.minutes_text);
        if minutes.is_blank() {
            return Err(ExtractError::EmptyInput("minutes"));
        }
        let agenda = normalize(&input.agenda_text);
        if agenda.is_blank() {
            return Err(ExtractError::EmptyInput("agenda"));
        }
        let agenda = AgendaIndex::parse(&agenda);

        let set = self.library.select(&meeting.city, meeting.date);
        let patterns = CompiledPatternSet::compile(set)?;
        let resolver = MemberResolver::new(self.roster, meeting.date, &self.settings.resolver);
        let expected_seats = u32::try_from(resolver.seat_count()).unwrap_or(u32::MAX);

        tracing::info!(
            meeting = %meeting_id,
            pattern_set = patterns.label(),
            expected_seats,
            "extracting meeting"
        );

        let pass = MeetingPass {
            meeting_id: &meeting_id,
            minutes: &minutes,
            agenda: &agenda,
            extractor: PatternExtractor::new(&patterns),
            resolver: &resolver,
            expected_seats,
            min_score: self.settings.min_quality_score,
        };
        let segmenter = Segmenter::new(&minutes, &patterns, self.settings.context_window);

        let mut tracker = ContextTracker::new();
        let mut accepted = Vec::new();
        let mut review = Vec::new();
        let mut unextracted = Vec::new();
        let mut blocks = 0;

        for block in segmenter.blocks() {
            blocks += 1;
            tracker.observe(block.lead);
            match pass.extractor.extract(block.anchor) {
                Some(found) => {
                    let context = tracker.resolve(found.outcome);
                    let ordinal = accepted.len() + review.len() + 1;
                    let (record, route) = pass.record(&block, &found, &context, ordinal);
                    match route {
                        Route::Accepted => accepted.push(record),
                        Route::Review => review.push(record),
                    }
                }
                None => {
                    // The vote happened even though it could not be read.
                    tracker.resolve(None);
                    unextracted.push(pass.unextracted(&block, pass.extractor.variants_tried()));
                }
            }
        }

        let summary = RunSummary {
            blocks,
            accepted: accepted.len(),
            low_confidence: review.len(),
            unextracted: unextracted.len(),
        };
        tracing::info!(
            meeting = %meeting_id,
            blocks = summary.blocks,
            accepted = summary.accepted,
            review = summary.low_confidence,
            unextracted = summary.unextracted,
            "meeting extracted"
        );

        Ok(ExtractionReport {
            meeting: meeting.clone(),
            meeting_id,
            pattern_set: patterns.label().to_string(),
            expected_seats,
            accepted,
            review,
            unextracted,
            motions: tracker.into_motions(),
            summary,
        })
    }

    /// Extract many meetings in parallel.
    ///
    /// `cancel` is checked before each meeting starts; meetings not yet
    /// started when it is set come back as [`MeetingResult::Skipped`].
    /// `on_done` runs once per meeting, on the worker thread. Results are
    /// in input order.
    pub fn extract_batch<F>(
        &self,
        inputs: &[MeetingInput],
        cancel: &AtomicBool,
        on_done: F,
    ) -> Vec<MeetingResult>
    where
        F: Fn(&MeetingInput, &MeetingResult) + Sync,
    {
        inputs
            .par_iter()
            .map(|input| {
                let result = if cancel.load(Ordering::Relaxed) {
                    MeetingResult::Skipped
                } else {
                    match self.extract(input) {
                        Ok(report) => MeetingResult::Extracted(Box::new(report)),
                        Err(error) => {
                            tracing::warn!(meeting = %input.meeting.id(), %error, "meeting failed");
                            MeetingResult::Failed(error)
                        }
                    }
                };
                on_done(input, &result);
                result
            })
            .collect()
    }
}

/// Everything fixed for the duration of one meeting.
struct MeetingPass<'m> {
    meeting_id: &'m str,
    minutes: &'m NormalizedText,
    agenda: &'m AgendaIndex,
    extractor: PatternExtractor<'m>,
    resolver: &'m MemberResolver<'m>,
    expected_seats: u32,
    min_score: u8,
}

impl MeetingPass<'_> {
    fn span(&self, block: &CandidateBlock<'_>) -> SourceSpan {
        let first = block.anchor_lines.start;
        let last = block.anchor_lines.end.saturating_sub(1);
        SourceSpan {
            start_line: self.minutes.source_line(first),
            end_line: self.minutes.source_line(last),
            page: self.minutes.page_of_line(first),
        }
    }

    fn record(
        &self,
        block: &CandidateBlock<'_>,
        found: &TallyMatch,
        context: &VoteContext,
        ordinal: usize,
    ) -> (VoteRecord, Route) {
        let fields = self.extractor.context_fields(block.context);
        let assembled = assemble(found, context, self.resolver);

        let agenda_item_number = context
            .item_number
            .clone()
            .or_else(|| fields.item_number.clone());
        let title = context
            .item_title
            .clone()
            .or_else(|| fields.title.clone())
            .or_else(|| {
                agenda_item_number
                    .as_deref()
                    .and_then(|number| self.agenda.title(number))
                    .map(str::to_string)
            });

        let mut record = VoteRecord {
            id: ids::vote_record_id(self.meeting_id, ordinal),
            meeting: self.meeting_id.to_string(),
            agenda_item_number,
            title,
            motion_id: context.motion_id,
            outcome: found.outcome,
            tally: assembled.tally,
            member_votes: assembled.votes,
            motion: motion_summary(context, fields),
            unresolved: assembled.unresolved,
            quality_score: 0,
            warnings: Vec::new(),
            variant: found.variant.to_string(),
            source: self.span(block),
        };

        let assessment = validator::assess(&record, self.expected_seats);
        let route = assessment.route(self.min_score);
        record.quality_score = assessment.score;
        record.warnings = assessment.warnings;
        record.warnings.extend(assembled.warnings);

        tracing::debug!(
            record = %record.id,
            score = record.quality_score,
            warnings = record.warnings.len(),
            ?route,
            "vote record scored"
        );
        (record, route)
    }

    fn unextracted(&self, block: &CandidateBlock<'_>, tried: String) -> UnextractedBlock {
        tracing::warn!(
            meeting = self.meeting_id,
            block = block.index,
            "no pattern variant matched"
        );
        UnextractedBlock {
            block: block.index,
            source: self.span(block),
            anchor: block.anchor.to_string(),
            context: block.context.to_string(),
            reason: format!("no pattern variant matched (tried {tried})"),
        }
    }
}

/// Prefer the tracker's motion. Context-scan fields are used only when the
/// tracker has no open motion, except for a `Recommended Action` fallback
/// for missing motion text.
fn motion_summary(context: &VoteContext, fields: ContextFields) -> MotionSummary {
    if context.motion_id.is_none() {
        return fields.motion;
    }
    let mut motion = context.motion.clone();
    if motion.text.is_none() {
        motion.text = fields.recommended_action;
    }
    motion
}
