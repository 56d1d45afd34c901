//! Stroke rasterization.
//!
//! Draws a [`StrokeSequence`] onto a fixed-size canvas with tiny-skia and
//! encodes it as PNG. Output is deterministic: the same strokes always yield
//! the same bytes.

use inkwell_core::{Stroke, StrokeSequence};
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform,
};

use crate::data_url::{encode_data_url, PNG_MIME};
use crate::error::{RenderError, RenderResult};

/// Configuration for stroke rasterization.
#[derive(Debug, Clone)]
pub struct RasterConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background color as RGBA bytes.
    pub background: [u8; 4],
    /// Ink color as RGBA bytes.
    pub ink: [u8; 4],
    /// Line width in pixels.
    pub line_width: f32,
    /// Enable anti-aliasing.
    pub anti_alias: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            background: [255, 255, 255, 255],
            ink: [0, 0, 0, 255],
            line_width: 2.0,
            anti_alias: true,
        }
    }
}

/// Renders strokes to PNG.
#[derive(Debug, Clone, Default)]
pub struct StrokeRasterizer {
    config: RasterConfig,
}

impl StrokeRasterizer {
    /// Create a new rasterizer with the given configuration.
    #[must_use]
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    /// Create a rasterizer with the default 400×400 white canvas.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RasterConfig::default())
    }

    /// Get the rasterizer configuration.
    #[must_use]
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Draw the strokes onto a fresh pixmap.
    ///
    /// Each non-empty stroke becomes one continuous path: move to the first
    /// point, then a line to every point in order, the first one included.
    /// Empty strokes are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the canvas size is zero or too large.
    pub fn render_pixmap(&self, strokes: &StrokeSequence) -> RenderResult<Pixmap> {
        let mut pixmap = Pixmap::new(self.config.width, self.config.height).ok_or_else(|| {
            RenderError::Canvas(format!(
                "cannot allocate {}x{} canvas",
                self.config.width, self.config.height
            ))
        })?;

        let [r, g, b, a] = self.config.background;
        pixmap.fill(Color::from_rgba8(r, g, b, a));

        if !strokes.has_ink() {
            tracing::debug!(strokes = strokes.len(), "No ink, rendering blank canvas");
            return Ok(pixmap);
        }

        let mut paint = Paint::default();
        let [r, g, b, a] = self.config.ink;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = self.config.anti_alias;

        let pen = tiny_skia::Stroke {
            width: self.config.line_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..tiny_skia::Stroke::default()
        };

        let mut drawn = 0usize;
        for stroke in strokes.iter().filter(|s| !s.is_empty()) {
            self.draw_stroke(&mut pixmap, stroke, &paint, &pen);
            drawn += 1;
        }

        tracing::debug!(
            strokes = drawn,
            skipped = strokes.len() - drawn,
            points = strokes.point_count(),
            "Rasterized strokes"
        );

        Ok(pixmap)
    }

    fn draw_stroke(
        &self,
        pixmap: &mut Pixmap,
        stroke: &Stroke,
        paint: &Paint<'_>,
        pen: &tiny_skia::Stroke,
    ) {
        let points = stroke.points();
        let Some(first) = points.first() else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in points {
            pb.line_to(p.x, p.y);
        }

        let is_dot = points.iter().all(|p| p == first);

        match pb.finish() {
            Some(path) if !is_dot => {
                pixmap.stroke_path(&path, paint, pen, Transform::identity(), None);
            }
            _ => {
                // Zero-length path: a round cap leaves a dot of the pen's width.
                if let Some(dot) =
                    PathBuilder::from_circle(first.x, first.y, self.config.line_width / 2.0)
                {
                    pixmap.fill_path(&dot, paint, FillRule::Winding, Transform::identity(), None);
                }
            }
        }
    }

    /// Render the strokes to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas cannot be created or encoding fails.
    pub fn render_png(&self, strokes: &StrokeSequence) -> RenderResult<Vec<u8>> {
        let pixmap = self.render_pixmap(strokes)?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    /// Render the strokes to a `data:image/png;base64,...` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas cannot be created or encoding fails.
    pub fn render_data_url(&self, strokes: &StrokeSequence) -> RenderResult<String> {
        let png = self.render_png(strokes)?;
        Ok(encode_data_url(PNG_MIME, &png))
    }
}
