//! Analysis results - the four feedback slots filled by the model.

use serde::{Deserialize, Serialize};

/// One named feedback category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultSlot {
    /// How well the current strokes were executed.
    StrokeQuality,
    /// Overall shape and proportions of the character.
    LetterFormation,
    /// Strokes the learner should draw next.
    NextStrokes,
    /// Pitfalls for this character.
    CommonMistakes,
}

impl ResultSlot {
    /// All slots in display order.
    pub const ALL: [Self; 4] = [
        Self::StrokeQuality,
        Self::LetterFormation,
        Self::NextStrokes,
        Self::CommonMistakes,
    ];
}

impl std::fmt::Display for ResultSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::StrokeQuality => "strokeQuality",
            Self::LetterFormation => "letterFormation",
            Self::NextStrokes => "nextStrokes",
            Self::CommonMistakes => "commonMistakes",
        };
        f.write_str(name)
    }
}

/// Feedback text per category. Slots are set independently; a new value
/// overwrites only its own slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    /// Stroke quality feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_quality: Option<String>,
    /// Letter formation feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_formation: Option<String>,
    /// Suggested next strokes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_strokes: Option<String>,
    /// Common mistakes to avoid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_mistakes: Option<String>,
}

impl AnalysisResults {
    /// Read a slot.
    #[must_use]
    pub fn get(&self, slot: ResultSlot) -> Option<&str> {
        match slot {
            ResultSlot::StrokeQuality => self.stroke_quality.as_deref(),
            ResultSlot::LetterFormation => self.letter_formation.as_deref(),
            ResultSlot::NextStrokes => self.next_strokes.as_deref(),
            ResultSlot::CommonMistakes => self.common_mistakes.as_deref(),
        }
    }

    fn slot_mut(&mut self, slot: ResultSlot) -> &mut Option<String> {
        match slot {
            ResultSlot::StrokeQuality => &mut self.stroke_quality,
            ResultSlot::LetterFormation => &mut self.letter_formation,
            ResultSlot::NextStrokes => &mut self.next_strokes,
            ResultSlot::CommonMistakes => &mut self.common_mistakes,
        }
    }

    /// Overwrite one slot, leaving the others untouched.
    pub fn set(&mut self, slot: ResultSlot, text: impl Into<String>) {
        *self.slot_mut(slot) = Some(text.into());
    }

    /// Overwrite the slots present in `other`; absent slots are retained.
    pub fn merge(&mut self, other: AnalysisResults) {
        for slot in ResultSlot::ALL {
            if let Some(text) = other.slot_owned(slot) {
                self.set(slot, text);
            }
        }
    }

    fn slot_owned(&self, slot: ResultSlot) -> Option<String> {
        self.get(slot).map(str::to_string)
    }

    /// Whether no slot is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        ResultSlot::ALL.iter().all(|slot| self.get(*slot).is_none())
    }

    /// Clear every slot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_only_touches_one_slot() {
        let mut results = AnalysisResults::default();
        results.set(ResultSlot::StrokeQuality, "smooth");
        results.set(ResultSlot::NextStrokes, "horizontal bar");
        results.set(ResultSlot::StrokeQuality, "shaky");

        assert_eq!(results.get(ResultSlot::StrokeQuality), Some("shaky"));
        assert_eq!(results.get(ResultSlot::NextStrokes), Some("horizontal bar"));
        assert_eq!(results.get(ResultSlot::LetterFormation), None);
    }

    #[test]
    fn test_merge_retains_absent_slots() {
        let mut results = AnalysisResults::default();
        results.set(ResultSlot::LetterFormation, "balanced");
        results.set(ResultSlot::CommonMistakes, "crossing too low");

        let mut incoming = AnalysisResults::default();
        incoming.set(ResultSlot::CommonMistakes, "uneven legs");
        results.merge(incoming);

        assert_eq!(results.get(ResultSlot::LetterFormation), Some("balanced"));
        assert_eq!(results.get(ResultSlot::CommonMistakes), Some("uneven legs"));
    }

    #[test]
    fn test_clear_and_is_empty() {
        let mut results = AnalysisResults::default();
        assert!(results.is_empty());
        results.set(ResultSlot::NextStrokes, "dot");
        assert!(!results.is_empty());
        results.clear();
        assert!(results.is_empty());
    }

    #[test]
    fn test_serializes_camel_case_without_empty_slots() {
        let mut results = AnalysisResults::default();
        results.set(ResultSlot::StrokeQuality, "good");
        let json = serde_json::to_value(&results).expect("serialize");
        assert_eq!(json, serde_json::json!({"strokeQuality": "good"}));
    }
}
