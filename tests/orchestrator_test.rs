//! Session flow against a scripted provider
//!
//! Responses are keyed by image data. A per-image gate lets a test decide
//! when (and in which order) background calls return.

use async_trait::async_trait;
use jacket_ai_common::{AnalysisStatus, FabricSpec, ImagePayload, Language, MaterialSpec};
use jacket_ai_rust::error::{JacketAiError, Result};
use jacket_ai_rust::orchestrator::Orchestrator;
use jacket_ai_rust::provider::{EstimationProvider, EstimationRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

fn rows_for(size: &str) -> String {
    format!(
        r#"```json
[{{"size":"{size}","backLength":"72 см","chestWidth":"56 см","sleeveLength":"64 см","mainFabric":"1.8 м","liningFabric":"1.6 м","hardware":"Блискавка"}}]
```"#
    )
}

#[derive(Default)]
struct ScriptedProvider {
    responses: HashMap<String, std::result::Result<String, String>>,
    gates: HashMap<String, Arc<Semaphore>>,
    calls: Mutex<Vec<EstimationRequest>>,
}

impl ScriptedProvider {
    fn respond(mut self, image: &str, response: std::result::Result<String, String>) -> Self {
        self.responses.insert(image.to_string(), response);
        self
    }

    fn gated(mut self, image: &str) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.insert(image.to_string(), Arc::clone(&gate));
        (self, gate)
    }

    fn calls(&self) -> Vec<EstimationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EstimationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &EstimationRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());

        if let Some(gate) = self.gates.get(&request.image.data) {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| JacketAiError::ApiCall(e.to_string()))?;
            permit.forget();
        }

        match self.responses.get(&request.image.data) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(reason)) => Err(JacketAiError::ApiCall(reason.clone())),
            None => Ok(String::new()),
        }
    }
}

fn image(data: &str) -> ImagePayload {
    ImagePayload::new("image/jpeg", data).unwrap()
}

fn orchestrator(provider: Arc<ScriptedProvider>) -> Orchestrator {
    Orchestrator::new(provider, FabricSpec::default(), Language::Uk)
}

#[tokio::test]
async fn test_successful_analysis() {
    let provider = Arc::new(ScriptedProvider::default().respond("AAAA", Ok(rows_for("M"))));
    let mut orch = orchestrator(Arc::clone(&provider));

    orch.select_image(image("AAAA"));
    assert_eq!(orch.status(), AnalysisStatus::Analyzing);
    assert_eq!(orch.wait().await, AnalysisStatus::Success);

    let results = orch.session().results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].size, "M");
    assert!(orch.session().error().is_none());

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].image.mime_type, "image/jpeg");
    assert!(calls[0].prompt.user_prompt.contains("S, M, L, XL, XXL"));
}

#[tokio::test]
async fn test_empty_response_is_error_with_reason() {
    let provider = Arc::new(ScriptedProvider::default().respond("AAAA", Ok(String::new())));
    let mut orch = orchestrator(provider);

    orch.select_image(image("AAAA"));
    assert_eq!(orch.wait().await, AnalysisStatus::Error);
    assert!(orch.session().results().is_empty());
    assert!(!orch.session().error().unwrap().trim().is_empty());
}

#[tokio::test]
async fn test_malformed_response_is_error() {
    let provider = Arc::new(
        ScriptedProvider::default().respond("AAAA", Ok("I cannot see a jacket here.".into())),
    );
    let mut orch = orchestrator(provider);

    orch.select_image(image("AAAA"));
    assert_eq!(orch.wait().await, AnalysisStatus::Error);
    assert!(orch.session().results().is_empty());
}

#[tokio::test]
async fn test_empty_array_is_error() {
    let provider = Arc::new(ScriptedProvider::default().respond("AAAA", Ok("[]".into())));
    let mut orch = orchestrator(provider);

    orch.select_image(image("AAAA"));
    assert_eq!(orch.wait().await, AnalysisStatus::Error);
}

#[tokio::test]
async fn test_retry_reissues_identical_request() {
    let provider = Arc::new(ScriptedProvider::default().respond("AAAA", Err("503 overloaded".into())));
    let mut orch = orchestrator(Arc::clone(&provider));

    orch.select_image(image("AAAA"));
    assert_eq!(orch.wait().await, AnalysisStatus::Error);
    assert!(orch.session().error().unwrap().contains("503 overloaded"));

    // Settings changed after the failure must not leak into the retry
    orch.set_fabric(FabricSpec {
        main: MaterialSpec { width_cm: Some(150.0), price: None },
        ..FabricSpec::default()
    });
    orch.set_language(Language::En);

    orch.retry().unwrap();
    assert_eq!(orch.wait().await, AnalysisStatus::Error);

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[tokio::test]
async fn test_recalculate_uses_current_settings() {
    let provider = Arc::new(ScriptedProvider::default().respond("AAAA", Ok(rows_for("L"))));
    let mut orch = orchestrator(Arc::clone(&provider));

    orch.select_image(image("AAAA"));
    assert_eq!(orch.wait().await, AnalysisStatus::Success);

    orch.set_fabric(FabricSpec {
        main: MaterialSpec { width_cm: Some(150.0), price: Some(200.0) },
        ..FabricSpec::default()
    });
    orch.set_language(Language::En);
    orch.recalculate().unwrap();
    assert!(orch.session().results().is_empty());
    assert_eq!(orch.wait().await, AnalysisStatus::Success);

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].prompt.user_prompt.contains("150 см"));
    assert!(calls[1].prompt.user_prompt.contains("150 см"));
    assert_eq!(calls[1].language, Language::En);
}

#[tokio::test]
async fn test_retry_not_allowed_after_success() {
    let provider = Arc::new(ScriptedProvider::default().respond("AAAA", Ok(rows_for("S"))));
    let mut orch = orchestrator(provider);

    orch.select_image(image("AAAA"));
    orch.wait().await;
    assert!(orch.retry().is_err());
    assert_eq!(orch.status(), AnalysisStatus::Success);
}

#[tokio::test]
async fn test_late_response_after_clear_is_ignored() {
    let (provider, gate) = ScriptedProvider::default()
        .respond("AAAA", Ok(rows_for("M")))
        .gated("AAAA");
    let mut orch = orchestrator(Arc::new(provider));

    orch.select_image(image("AAAA"));
    orch.clear_image();
    assert_eq!(orch.status(), AnalysisStatus::Idle);

    gate.add_permits(1);
    assert_eq!(orch.process_next().await, Some(false));

    assert_eq!(orch.status(), AnalysisStatus::Idle);
    assert!(orch.session().results().is_empty());
    assert!(orch.session().error().is_none());
}

#[tokio::test]
async fn test_newer_image_wins_over_older_response() {
    let (provider, old_gate) = ScriptedProvider::default()
        .respond("AAAA", Ok(rows_for("S")))
        .respond("BBBB", Ok(rows_for("XXL")))
        .gated("AAAA");
    let mut orch = orchestrator(Arc::new(provider));

    orch.select_image(image("AAAA"));
    orch.select_image(image("BBBB"));

    assert_eq!(orch.wait().await, AnalysisStatus::Success);
    assert_eq!(orch.session().results()[0].size, "XXL");

    // The superseded call finishes last and is dropped
    old_gate.add_permits(1);
    assert_eq!(orch.process_next().await, Some(false));
    assert_eq!(orch.session().results()[0].size, "XXL");
}

#[tokio::test]
async fn test_failed_request_discards_previous_results() {
    let provider = Arc::new(
        ScriptedProvider::default()
            .respond("AAAA", Ok(rows_for("M")))
            .respond("BBBB", Err("timeout".into())),
    );
    let mut orch = orchestrator(provider);

    orch.select_image(image("AAAA"));
    assert_eq!(orch.wait().await, AnalysisStatus::Success);

    orch.select_image(image("BBBB"));
    assert_eq!(orch.wait().await, AnalysisStatus::Error);
    assert!(orch.session().results().is_empty());
}
