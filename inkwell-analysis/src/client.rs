//! The analysis client seam.

use async_trait::async_trait;

use crate::callbacks::AnalysisCallbacks;
use crate::error::AnalysisResult;
use crate::request::AnalysisRequest;

/// Sends analysis requests to a model.
///
/// Output is delivered through `callbacks`. The returned future completes
/// after the last callback for this request has fired.
///
/// # Errors
///
/// Implementations return `Err` only when the request could not be sent at
/// all. Failures after that point go to [`AnalysisCallbacks::on_error`] and
/// the call returns `Ok(())`.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Analyze one drawing.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        callbacks: &dyn AnalysisCallbacks,
    ) -> AnalysisResult<()>;
}
