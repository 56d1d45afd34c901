//! Practice context: the selected language, level and character.

use serde::{Deserialize, Serialize};

/// Script name reported for languages missing from [`LANGUAGES`].
pub const UNKNOWN_SCRIPT: &str = "Unknown";

/// Difficulty levels offered by the language picker.
///
/// Other identifiers are accepted verbatim.
pub const KNOWN_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

/// Static metadata for one practice language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageMeta {
    /// Identifier used in events (lowercase).
    pub id: &'static str,
    /// Human readable name.
    pub name: &'static str,
    /// Writing system.
    pub script: &'static str,
}

/// Languages known to the practice board.
pub const LANGUAGES: &[LanguageMeta] = &[
    LanguageMeta { id: "english", name: "English", script: "Latin" },
    LanguageMeta { id: "spanish", name: "Spanish", script: "Latin" },
    LanguageMeta { id: "french", name: "French", script: "Latin" },
    LanguageMeta { id: "german", name: "German", script: "Latin" },
    LanguageMeta { id: "russian", name: "Russian", script: "Cyrillic" },
    LanguageMeta { id: "greek", name: "Greek", script: "Greek" },
    LanguageMeta { id: "arabic", name: "Arabic", script: "Arabic" },
    LanguageMeta { id: "hebrew", name: "Hebrew", script: "Hebrew" },
    LanguageMeta { id: "hindi", name: "Hindi", script: "Devanagari" },
    LanguageMeta { id: "chinese", name: "Chinese", script: "Han (Simplified Chinese)" },
    LanguageMeta { id: "japanese", name: "Japanese", script: "Hiragana & Katakana" },
    LanguageMeta { id: "korean", name: "Korean", script: "Hangul" },
    LanguageMeta { id: "thai", name: "Thai", script: "Thai" },
];

/// Look up a language by identifier, ignoring ASCII case.
#[must_use]
pub fn language_meta(id: &str) -> Option<&'static LanguageMeta> {
    LANGUAGES.iter().find(|meta| meta.id.eq_ignore_ascii_case(id))
}

/// The active practice selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeContext {
    /// Language identifier.
    pub language: String,
    /// Difficulty level identifier.
    pub level: String,
    /// Selected character, if any.
    pub character: Option<String>,
}

impl PracticeContext {
    /// Create a new practice context.
    #[must_use]
    pub fn new(
        language: impl Into<String>,
        level: impl Into<String>,
        character: Option<String>,
    ) -> Self {
        Self {
            language: language.into(),
            level: level.into(),
            character,
        }
    }

    /// Whether the level is one of [`KNOWN_LEVELS`].
    #[must_use]
    pub fn has_known_level(&self) -> bool {
        KNOWN_LEVELS.contains(&self.level.as_str())
    }

    /// Derive the [`LanguageInfo`] view for this context.
    #[must_use]
    pub fn language_info(&self) -> LanguageInfo {
        LanguageInfo {
            language: self.language.clone(),
            script: language_meta(&self.language)
                .map_or(UNKNOWN_SCRIPT, |meta| meta.script)
                .to_string(),
            level: self.level.clone(),
            character: self.character.clone(),
        }
    }
}

impl Default for PracticeContext {
    fn default() -> Self {
        Self::new("english", "beginner", None)
    }
}

/// Read-only context handed to the request builder and display widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Language identifier.
    pub language: String,
    /// Script name, or [`UNKNOWN_SCRIPT`].
    pub script: String,
    /// Difficulty level identifier.
    pub level: String,
    /// Selected character, if any.
    pub character: Option<String>,
}
