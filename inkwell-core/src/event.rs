//! Input events emitted by the practice widgets.

use serde::{Deserialize, Serialize};

use crate::{CoreResult, StrokeSequence};

/// Selection made in the language picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChange {
    /// New language identifier.
    pub language: String,
    /// New difficulty level.
    pub level: String,
    /// Character preselected by the picker, if any.
    #[serde(default)]
    pub character: Option<String>,
}

/// Selection made in the character picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterChange {
    /// New character, or `None` to deselect.
    #[serde(default)]
    pub character: Option<String>,
    /// Difficulty level the character belongs to.
    pub level: String,
}

/// All events the coordinator can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum InputEvent {
    /// Language (and level) picked.
    LanguageChange(LanguageChange),

    /// Character (and level) picked.
    CharacterChange(CharacterChange),

    /// The drawing board replaced its stroke list.
    StrokeUpdate(StrokeSequence),

    /// The pointer went down (`true`) or up (`false`).
    DrawingStateChange(bool),
}

impl InputEvent {
    /// Parse an event from the widgets' JSON wire form, validating strokes.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or non-finite stroke coordinates.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let event: Self = serde_json::from_str(json)?;
        if let Self::StrokeUpdate(strokes) = &event {
            strokes.validate()?;
        }
        Ok(event)
    }

    /// Short event name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LanguageChange(_) => "languageChange",
            Self::CharacterChange(_) => "characterChange",
            Self::StrokeUpdate(_) => "strokeUpdate",
            Self::DrawingStateChange(_) => "drawingStateChange",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    #[test]
    fn test_parse_language_change() {
        let event = InputEvent::from_json(
            r#"{"type":"languageChange","data":{"language":"korean","level":"beginner","character":"ㄱ"}}"#,
        )
        .expect("parse");
        assert_eq!(
            event,
            InputEvent::LanguageChange(LanguageChange {
                language: "korean".into(),
                level: "beginner".into(),
                character: Some("ㄱ".into()),
            })
        );
        assert_eq!(event.name(), "languageChange");
    }

    #[test]
    fn test_parse_character_change_without_character() {
        let event =
            InputEvent::from_json(r#"{"type":"characterChange","data":{"level":"advanced"}}"#)
                .expect("parse");
        match event {
            InputEvent::CharacterChange(change) => {
                assert!(change.character.is_none());
                assert_eq!(change.level, "advanced");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_stroke_update() {
        let event =
            InputEvent::from_json(r#"{"type":"strokeUpdate","data":[[[0,0],[10,10]]]}"#)
                .expect("parse");
        match event {
            InputEvent::StrokeUpdate(strokes) => assert_eq!(strokes.point_count(), 2),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_drawing_state() {
        let event = InputEvent::from_json(r#"{"type":"drawingStateChange","data":false}"#)
            .expect("parse");
        assert_eq!(event, InputEvent::DrawingStateChange(false));
    }

    #[test]
    fn test_unknown_event_type() {
        let err = InputEvent::from_json(r#"{"type":"erase","data":null}"#).unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
