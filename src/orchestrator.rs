//! Analysis orchestration
//!
//! Owns an [`AnalysisSession`] and runs its requests against an
//! [`EstimationProvider`] on background tasks. Completions come back over
//! a channel tagged with their request id, so an outcome that arrives after
//! the image was replaced or cleared is dropped instead of applied.

use crate::error::Result;
use crate::provider::{EstimationProvider, EstimationRequest};
use jacket_ai_common::{
    build_prompt, parse_estimates, AnalysisOutcome, AnalysisRequest, AnalysisSession,
    AnalysisStatus, FabricSpec, ImagePayload, Language, MaterialEstimate, RequestId,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of one background request
#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub outcome: AnalysisOutcome,
}

/// Build the prompt, call the provider and validate the answer
pub async fn analyze(
    provider: &dyn EstimationProvider,
    request: &AnalysisRequest,
) -> Result<Vec<MaterialEstimate>> {
    let estimation = EstimationRequest {
        image: request.image.clone(),
        prompt: build_prompt(&request.fabric.widths(), request.language),
        language: request.language,
    };

    let text = provider.generate(&estimation).await?;
    Ok(parse_estimates(&text)?)
}

pub struct Orchestrator {
    provider: Arc<dyn EstimationProvider>,
    session: AnalysisSession,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn EstimationProvider>, fabric: FabricSpec, language: Language) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            session: AnalysisSession::new(fabric, language),
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn status(&self) -> AnalysisStatus {
        self.session.status()
    }

    pub fn set_fabric(&mut self, fabric: FabricSpec) {
        self.session.set_fabric(fabric);
    }

    pub fn set_language(&mut self, language: Language) {
        self.session.set_language(language);
    }

    // User actions

    pub fn select_image(&mut self, image: ImagePayload) -> RequestId {
        let request = self.session.select_image(image);
        self.dispatch(request)
    }

    pub fn recalculate(&mut self) -> Result<RequestId> {
        let request = self.session.recalculate()?;
        Ok(self.dispatch(request))
    }

    pub fn retry(&mut self) -> Result<RequestId> {
        let request = self.session.retry()?;
        Ok(self.dispatch(request))
    }

    pub fn clear_image(&mut self) {
        if let Some(id) = self.session.in_flight() {
            tracing::debug!(%id, "clearing image; pending request will be ignored");
        }
        self.session.clear_image();
    }

    fn dispatch(&self, request: AnalysisRequest) -> RequestId {
        let id = request.id;
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();

        tracing::info!(
            %id,
            provider = provider.name(),
            language = %request.language,
            "starting analysis"
        );

        tokio::spawn(async move {
            // Inner task so a panicking provider still reports a completion
            let worker = tokio::spawn(async move {
                analyze(provider.as_ref(), &request)
                    .await
                    .map_err(|e| e.to_string())
            });
            let outcome = match worker.await {
                Ok(outcome) => outcome,
                Err(e) => Err(format!("analysis task failed: {}", e)),
            };
            // Receiver gone means the orchestrator was dropped
            let _ = tx.send(Completion { id, outcome });
        });

        id
    }

    // Completions

    fn apply(&mut self, completion: Completion) -> bool {
        let Completion { id, outcome } = completion;
        if let Err(reason) = &outcome {
            tracing::debug!(%id, %reason, "analysis failed");
        }
        let applied = self.session.resolve(id, outcome);
        if applied {
            tracing::info!(%id, status = %self.session.status(), "analysis finished");
        } else {
            tracing::debug!(%id, "discarded stale completion");
        }
        applied
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns whether it was applied (`false` for a stale one), or `None`
    /// if the channel closed.
    pub async fn process_next(&mut self) -> Option<bool> {
        let completion = self.rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply every completion that has already arrived
    pub fn drain_completions(&mut self) -> usize {
        let mut count = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            count += 1;
        }
        count
    }

    /// Wait until the current request settles
    ///
    /// Cancel-safe: dropping the future loses no completion.
    pub async fn wait(&mut self) -> AnalysisStatus {
        while self.session.status() == AnalysisStatus::Analyzing {
            if self.process_next().await.is_none() {
                break;
            }
        }
        self.session.status()
    }
}
