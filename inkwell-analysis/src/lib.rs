//! # Inkwell Analysis
//!
//! Sends a rasterized drawing to a hosted vision model and turns the reply
//! into per-category feedback.
//!
//! ```text
//! data URL + LanguageInfo ──► AnalysisRequest ──► AnalysisClient ──► AnalysisCallbacks
//!                                                  (GeminiClient)      stroke quality
//!                                                                      letter formation
//!                                                                      next strokes
//!                                                                      common mistakes
//!                                                                      raw response / error
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod callbacks;
pub mod client;
pub mod config;
pub mod error;
pub mod gemini;
pub mod request;
pub mod response;
pub mod sse;

pub use callbacks::{AnalysisCallbacks, CallbackGuard};
pub use client::AnalysisClient;
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use gemini::GeminiClient;
pub use request::{
    build_analysis_request, build_prompt, AnalysisRequest, Content, GenerationConfig, InlineData,
    Part, SECTION_HEADERS,
};
pub use response::{parse_quality_score, parse_sections, AnalysisReport, Section};
