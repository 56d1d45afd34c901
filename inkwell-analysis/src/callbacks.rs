//! Callback contract between analysis clients and their callers.

use std::sync::atomic::{AtomicBool, Ordering};

use inkwell_core::{AnalysisResults, ResultSlot};

use crate::error::AnalysisError;
use crate::response::AnalysisReport;

/// Receives analysis output. Every handler is optional.
///
/// A client may call the four category handlers and `on_raw_response` zero,
/// one or several times per request. `on_error` fires at most once, and
/// nothing else fires after it.
pub trait AnalysisCallbacks: Send + Sync {
    /// Stroke quality feedback.
    fn on_stroke_quality(&self, _text: &str) {}

    /// Letter formation feedback.
    fn on_letter_formation(&self, _text: &str) {}

    /// Suggested next strokes.
    fn on_next_strokes(&self, _text: &str) {}

    /// Common mistakes to avoid.
    fn on_common_mistakes(&self, _text: &str) {}

    /// The full reply text.
    fn on_raw_response(&self, _raw: &str) {}

    /// The request failed after it was sent.
    fn on_error(&self, _error: &AnalysisError) {}
}

/// Wraps callbacks for one request and enforces the error contract.
pub struct CallbackGuard<'a> {
    inner: &'a dyn AnalysisCallbacks,
    failed: AtomicBool,
}

impl<'a> CallbackGuard<'a> {
    /// Guard `inner` for a single request.
    #[must_use]
    pub fn new(inner: &'a dyn AnalysisCallbacks) -> Self {
        Self {
            inner,
            failed: AtomicBool::new(false),
        }
    }

    /// Whether `on_error` has fired.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Deliver feedback for one slot.
    pub fn slot(&self, slot: ResultSlot, text: &str) {
        if self.has_failed() {
            return;
        }
        match slot {
            ResultSlot::StrokeQuality => self.inner.on_stroke_quality(text),
            ResultSlot::LetterFormation => self.inner.on_letter_formation(text),
            ResultSlot::NextStrokes => self.inner.on_next_strokes(text),
            ResultSlot::CommonMistakes => self.inner.on_common_mistakes(text),
        }
    }

    /// Deliver every section present in `report`.
    pub fn report(&self, report: &AnalysisReport) {
        for slot in ResultSlot::ALL {
            if let Some(text) = report.results.get(slot) {
                self.slot(slot, text);
            }
        }
    }

    /// Deliver the sections of `report` that differ from what was already
    /// delivered, then record them in `delivered`.
    pub fn report_changes(&self, report: &AnalysisReport, delivered: &mut AnalysisResults) {
        for slot in ResultSlot::ALL {
            let Some(text) = report.results.get(slot) else {
                continue;
            };
            if delivered.get(slot) != Some(text) {
                self.slot(slot, text);
                delivered.set(slot, text);
            }
        }
    }

    /// Deliver the full reply text.
    pub fn raw(&self, raw: &str) {
        if !self.has_failed() {
            self.inner.on_raw_response(raw);
        }
    }

    /// Deliver an error. Only the first call has an effect.
    pub fn error(&self, error: &AnalysisError) {
        if !self.failed.swap(true, Ordering::AcqRel) {
            self.inner.on_error(error);
        }
    }
}
