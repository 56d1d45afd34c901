//! # Inkwell Core
//!
//! Core types for handwriting practice sessions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                inkwell-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Ink             │  Practice Context        │
//! │  - Points        │  - Language / level      │
//! │  - Strokes       │  - Character             │
//! │  - Sequences     │  - Script metadata       │
//! ├─────────────────────────────────────────────┤
//! │  Session State   │  Analysis Results        │
//! │  - Transitions   │  - Four feedback slots   │
//! │  - Epochs        │  - Raw model reply       │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod error;
pub mod event;
pub mod results;
pub mod state;
pub mod stroke;

pub use context::{
    language_meta, LanguageInfo, LanguageMeta, PracticeContext, KNOWN_LEVELS, LANGUAGES,
    UNKNOWN_SCRIPT,
};
pub use error::{CoreError, CoreResult};
pub use event::{CharacterChange, InputEvent, LanguageChange};
pub use results::{AnalysisResults, ResultSlot};
pub use state::{AnalysisTrigger, SessionSnapshot, SessionState};
pub use stroke::{Point, Stroke, StrokeSequence};

/// Inkwell core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
