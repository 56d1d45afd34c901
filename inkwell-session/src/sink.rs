//! Routes client callbacks into the session state.

use std::sync::{Arc, Mutex, PoisonError};

use inkwell_analysis::{parse_sections, AnalysisCallbacks, AnalysisError};
use inkwell_core::{ResultSlot, SessionState};
use tracing::warn;

/// Callback target for one analysis, bound to the epoch it was started in.
pub(crate) struct SessionSink {
    state: Arc<Mutex<SessionState>>,
    epoch: u64,
    error: Mutex<Option<String>>,
}

impl SessionSink {
    pub(crate) fn new(state: Arc<Mutex<SessionState>>, epoch: u64) -> Self {
        Self {
            state,
            epoch,
            error: Mutex::new(None),
        }
    }

    /// The failure reported through `on_error`, if any.
    pub(crate) fn take_error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn record(&self, slot: ResultSlot, text: &str) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_result(self.epoch, slot, text);
    }
}

impl AnalysisCallbacks for SessionSink {
    fn on_stroke_quality(&self, text: &str) {
        self.record(ResultSlot::StrokeQuality, text);
    }

    fn on_letter_formation(&self, text: &str) {
        self.record(ResultSlot::LetterFormation, text);
    }

    fn on_next_strokes(&self, text: &str) {
        self.record(ResultSlot::NextStrokes, text);
    }

    fn on_common_mistakes(&self, text: &str) {
        self.record(ResultSlot::CommonMistakes, text);
    }

    fn on_raw_response(&self, raw: &str) {
        let score = parse_sections(raw).quality_score;
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_raw(self.epoch, raw, score);
    }

    fn on_error(&self, error: &AnalysisError) {
        warn!(epoch = self.epoch, %error, "Analysis reported an error");
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = Some(error.to_string());
    }
}
