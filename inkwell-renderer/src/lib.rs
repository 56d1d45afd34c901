//! # Inkwell Renderer
//!
//! Rasterizes practice strokes into the image sent for analysis.
//!
//! ```text
//! StrokeSequence ──► tiny-skia Pixmap ──► PNG bytes ──► data:image/png;base64,...
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod data_url;
pub mod error;
pub mod raster;

pub use data_url::{decode_data_url, encode_data_url, split_data_url, PNG_MIME};
pub use error::{RenderError, RenderResult};
pub use raster::{RasterConfig, StrokeRasterizer};
