//! The session coordinator.
//!
//! [`Coordinator`] is cheap to clone; clones share the session state and the
//! analysis client. Event handlers apply the transition synchronously and,
//! when it triggers an analysis, mark the session as analyzing and spawn the
//! request on the current Tokio runtime.
//!
//! The state lock is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use inkwell_analysis::{build_analysis_request, AnalysisClient, GeminiClient};
use inkwell_core::{
    AnalysisTrigger, CharacterChange, InputEvent, LanguageChange, PracticeContext,
    SessionSnapshot, SessionState, StrokeSequence,
};
use inkwell_renderer::StrokeRasterizer;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::SessionResult;
use crate::sink::SessionSink;

/// Handle to a spawned analysis.
///
/// Resolves to `Err` only when the request could not be produced or sent.
/// Dropping the handle does not cancel the analysis.
pub type AnalysisTask = JoinHandle<SessionResult<()>>;

/// Coordinates one practice session.
#[derive(Clone)]
pub struct Coordinator {
    state: Arc<Mutex<SessionState>>,
    client: Arc<dyn AnalysisClient>,
    rasterizer: StrokeRasterizer,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("state", &self.state)
            .field("rasterizer", &self.rasterizer)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Create a coordinator with the default context and canvas.
    #[must_use]
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        Self::with_context(client, PracticeContext::default())
    }

    /// Create a coordinator starting from `context`.
    #[must_use]
    pub fn with_context(client: Arc<dyn AnalysisClient>, context: PracticeContext) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::with_context(context))),
            client,
            rasterizer: StrokeRasterizer::with_defaults(),
        }
    }

    /// Create a coordinator backed by a Gemini client configured from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the client configuration is incomplete.
    pub fn from_env() -> SessionResult<Self> {
        let client = GeminiClient::from_env()?;
        info!(model = %client.config().model, "Session coordinator ready");
        Ok(Self::new(Arc::new(client)))
    }

    /// Use a different rasterizer.
    #[must_use]
    pub fn with_rasterizer(mut self, rasterizer: StrokeRasterizer) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// The language picker changed.
    pub fn on_language_change(&self, change: &LanguageChange) {
        debug!(language = %change.language, level = %change.level, "Language change");
        self.lock().apply_language_change(change);
    }

    /// The character picker changed.
    pub fn on_character_change(&self, change: &CharacterChange) {
        debug!(character = ?change.character, level = %change.level, "Character change");
        self.lock().apply_character_change(change);
    }

    /// The drawing board replaced its strokes.
    ///
    /// Outside a Tokio runtime the triggered analysis is skipped.
    pub fn on_stroke_update(&self, strokes: StrokeSequence) -> Option<AnalysisTask> {
        let trigger = self.lock().apply_stroke_update(strokes);
        trigger.and_then(|trigger| self.spawn(trigger))
    }

    /// The pointer went down or up.
    ///
    /// Outside a Tokio runtime the triggered analysis is skipped.
    pub fn on_drawing_state_change(&self, is_drawing: bool) -> Option<AnalysisTask> {
        let trigger = self.lock().apply_drawing_state(is_drawing);
        trigger.and_then(|trigger| self.spawn(trigger))
    }

    /// Dispatch any input event.
    ///
    /// Outside a Tokio runtime the triggered analysis is skipped.
    pub fn handle_event(&self, event: InputEvent) -> Option<AnalysisTask> {
        debug!(event = event.name(), "Input event");
        match event {
            InputEvent::LanguageChange(change) => {
                self.on_language_change(&change);
                None
            }
            InputEvent::CharacterChange(change) => {
                self.on_character_change(&change);
                None
            }
            InputEvent::StrokeUpdate(strokes) => self.on_stroke_update(strokes),
            InputEvent::DrawingStateChange(is_drawing) => self.on_drawing_state_change(is_drawing),
        }
    }

    /// Run an analysis to completion on the current task.
    ///
    /// A trigger from an earlier context is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the strokes cannot be rendered or the request
    /// cannot be sent. Failures reported by the model are recorded in the
    /// session instead.
    pub async fn analyze(&self, trigger: &AnalysisTrigger) -> SessionResult<()> {
        let started = self.lock().begin_analysis(trigger.epoch);
        if !started {
            debug!(epoch = trigger.epoch, "Skipping analysis for stale context");
            return Ok(());
        }
        self.run(trigger).await
    }

    /// Current view of the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    fn spawn(&self, trigger: AnalysisTrigger) -> Option<AnalysisTask> {
        let Ok(runtime) = Handle::try_current() else {
            warn!(epoch = trigger.epoch, "No Tokio runtime, analysis not started");
            return None;
        };
        let started = self.lock().begin_analysis(trigger.epoch);
        if !started {
            return None;
        }
        let this = self.clone();
        Some(runtime.spawn(async move { this.run(&trigger).await }))
    }

    /// Perform an analysis already marked as started.
    async fn run(&self, trigger: &AnalysisTrigger) -> SessionResult<()> {
        let epoch = trigger.epoch;
        let sink = SessionSink::new(Arc::clone(&self.state), epoch);

        let outcome = self.request(trigger, &sink).await;
        let error = match &outcome {
            Ok(()) => sink.take_error(),
            Err(error) => {
                warn!(epoch, %error, "Analysis could not be sent");
                Some(error.to_string())
            }
        };

        let current = self.lock().finish_analysis(epoch, error);
        if !current {
            debug!(epoch, "Analysis settled after context change");
        }
        outcome
    }

    async fn request(&self, trigger: &AnalysisTrigger, sink: &SessionSink) -> SessionResult<()> {
        let data_url = self.rasterizer.render_data_url(&trigger.strokes)?;
        let request = build_analysis_request(&data_url, &trigger.info)?;
        debug!(
            epoch = trigger.epoch,
            request_id = %request.id,
            strokes = trigger.strokes.len(),
            points = trigger.strokes.point_count(),
            "Dispatching analysis"
        );
        self.client.analyze(&request, sink).await?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
