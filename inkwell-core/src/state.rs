//! Session state management.
//!
//! All mutable state of one practice session lives in [`SessionState`] and
//! changes only through its transition functions. Transitions that should
//! start an analysis return an [`AnalysisTrigger`]; performing it is the
//! caller's job.
//!
//! Every context change bumps the session *epoch*. Analysis lifecycle and
//! result updates carry the epoch they were triggered under and are ignored
//! once the context has moved on.

use serde::{Deserialize, Serialize};

use crate::{
    AnalysisResults, CharacterChange, InputEvent, LanguageChange, LanguageInfo, PracticeContext,
    ResultSlot, StrokeSequence,
};

/// Request to analyze a drawing, produced by a state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTrigger {
    /// Epoch the trigger belongs to.
    pub epoch: u64,
    /// Strokes to rasterize.
    pub strokes: StrokeSequence,
    /// Context to describe in the prompt.
    pub info: LanguageInfo,
}

/// Outbound view of the session for display widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Current selection.
    pub context: PracticeContext,
    /// Derived language info.
    pub language_info: LanguageInfo,
    /// Current strokes.
    pub strokes: StrokeSequence,
    /// Whether the pointer is down.
    pub is_drawing: bool,
    /// Whether an analysis is in flight.
    pub is_analyzing: bool,
    /// Feedback slots.
    pub results: AnalysisResults,
    /// Last raw model reply.
    pub raw_response: Option<String>,
    /// Score parsed from the last raw reply.
    pub quality_score: Option<u8>,
    /// Last analysis failure, for diagnostics.
    pub last_error: Option<String>,
}

/// The complete state of one practice session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    context: PracticeContext,
    strokes: StrokeSequence,
    drawing: bool,
    results: AnalysisResults,
    raw_response: Option<String>,
    quality_score: Option<u8>,
    last_error: Option<String>,
    epoch: u64,
    in_flight: usize,
}

impl SessionState {
    /// Create the state a freshly mounted page starts with.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state with an initial selection.
    #[must_use]
    pub fn with_context(context: PracticeContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Apply any input event.
    pub fn apply(&mut self, event: &InputEvent) -> Option<AnalysisTrigger> {
        match event {
            InputEvent::LanguageChange(change) => {
                self.apply_language_change(change);
                None
            }
            InputEvent::CharacterChange(change) => {
                self.apply_character_change(change);
                None
            }
            InputEvent::StrokeUpdate(strokes) => self.apply_stroke_update(strokes.clone()),
            InputEvent::DrawingStateChange(is_drawing) => self.apply_drawing_state(*is_drawing),
        }
    }

    /// Switch language, level and character, then start a fresh attempt.
    pub fn apply_language_change(&mut self, change: &LanguageChange) {
        self.context.language.clone_from(&change.language);
        self.context.level.clone_from(&change.level);
        self.context.character.clone_from(&change.character);
        self.note_unknown_level();
        self.reset_attempt();
    }

    /// Switch character and level, then start a fresh attempt.
    pub fn apply_character_change(&mut self, change: &CharacterChange) {
        self.context.character.clone_from(&change.character);
        self.context.level.clone_from(&change.level);
        self.note_unknown_level();
        self.reset_attempt();
    }

    fn note_unknown_level(&self) {
        if !self.context.has_known_level() {
            tracing::debug!(level = %self.context.level, "Unknown level, using it verbatim");
        }
    }

    /// Clear strokes and analysis state and move to a new epoch.
    pub fn reset_attempt(&mut self) {
        self.strokes = StrokeSequence::empty();
        self.results.clear();
        self.raw_response = None;
        self.quality_score = None;
        self.last_error = None;
        self.in_flight = 0;
        self.epoch += 1;
        tracing::debug!(
            epoch = self.epoch,
            language = %self.context.language,
            level = %self.context.level,
            "Practice context reset"
        );
    }

    /// Replace the strokes.
    ///
    /// Triggers analysis of the new strokes when they are non-empty and the
    /// pointer is currently up. The gate is the flag's value right now.
    pub fn apply_stroke_update(&mut self, strokes: StrokeSequence) -> Option<AnalysisTrigger> {
        self.strokes = strokes;
        if self.strokes.is_empty() || self.drawing {
            return None;
        }
        Some(self.trigger())
    }

    /// Record pointer down/up.
    ///
    /// Pointer up with strokes on the board triggers analysis of them.
    pub fn apply_drawing_state(&mut self, is_drawing: bool) -> Option<AnalysisTrigger> {
        self.drawing = is_drawing;
        if is_drawing || self.strokes.is_empty() {
            return None;
        }
        Some(self.trigger())
    }

    fn trigger(&self) -> AnalysisTrigger {
        AnalysisTrigger {
            epoch: self.epoch,
            strokes: self.strokes.clone(),
            info: self.language_info(),
        }
    }

    /// Whether `epoch` is the current one.
    #[must_use]
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Mark an analysis as sent. Returns `false` for a stale epoch.
    pub fn begin_analysis(&mut self, epoch: u64) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.in_flight += 1;
        self.last_error = None;
        true
    }

    /// Mark an analysis as settled, recording the failure if any.
    /// Returns `false` for a stale epoch.
    pub fn finish_analysis(&mut self, epoch: u64, error: Option<String>) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        if error.is_some() {
            self.last_error = error;
        }
        true
    }

    /// Store feedback for one slot. Returns `false` for a stale epoch.
    pub fn record_result(&mut self, epoch: u64, slot: ResultSlot, text: impl Into<String>) -> bool {
        if !self.is_current(epoch) {
            tracing::debug!(epoch, current = self.epoch, %slot, "Dropping stale result");
            return false;
        }
        self.results.set(slot, text);
        true
    }

    /// Store the raw model reply and its parsed score. Returns `false` for a
    /// stale epoch.
    pub fn record_raw(&mut self, epoch: u64, raw: impl Into<String>, score: Option<u8>) -> bool {
        if !self.is_current(epoch) {
            tracing::debug!(epoch, current = self.epoch, "Dropping stale raw response");
            return false;
        }
        self.raw_response = Some(raw.into());
        self.quality_score = score;
        true
    }

    /// The current selection.
    #[must_use]
    pub fn context(&self) -> &PracticeContext {
        &self.context
    }

    /// Derived language info for the current selection.
    #[must_use]
    pub fn language_info(&self) -> LanguageInfo {
        self.context.language_info()
    }

    /// Current strokes.
    #[must_use]
    pub fn strokes(&self) -> &StrokeSequence {
        &self.strokes
    }

    /// Whether the pointer is down.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Whether an analysis of the current context is in flight.
    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.in_flight > 0
    }

    /// Feedback collected so far.
    #[must_use]
    pub fn results(&self) -> &AnalysisResults {
        &self.results
    }

    /// Last raw model reply.
    #[must_use]
    pub fn raw_response(&self) -> Option<&str> {
        self.raw_response.as_deref()
    }

    /// Score parsed from the last raw reply.
    #[must_use]
    pub fn quality_score(&self) -> Option<u8> {
        self.quality_score
    }

    /// Last analysis failure.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current epoch.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Build the outbound view.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            context: self.context.clone(),
            language_info: self.language_info(),
            strokes: self.strokes.clone(),
            is_drawing: self.drawing,
            is_analyzing: self.is_analyzing(),
            results: self.results.clone(),
            raw_response: self.raw_response.clone(),
            quality_score: self.quality_score,
            last_error: self.last_error.clone(),
        }
    }
}
