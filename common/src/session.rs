//! Analysis session state machine
//!
//! ```text
//! Idle ──image──▶ Analyzing ──rows──▶ Success
//!                     │                  │
//!                     └──failure──▶ Error ◀┘ (recalculate / retry → Analyzing)
//! any ──clear──▶ Idle
//! ```
//!
//! Transitions are synchronous and I/O free. The caller runs the returned
//! [`AnalysisRequest`] and feeds the outcome back through [`AnalysisSession::resolve`],
//! which drops outcomes for requests that are no longer current.

use crate::error::{Error, Result};
use crate::i18n::Language;
use crate::image::ImagePayload;
use crate::types::{FabricSpec, MaterialEstimate};
use std::fmt;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Idle,
    Analyzing,
    Success,
    Error,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Idle => "idle",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Success => "success",
            AnalysisStatus::Error => "error",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonic request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One analysis call, with settings frozen at creation time
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub image: ImagePayload,
    pub fabric: FabricSpec,
    pub language: Language,
}

/// Outcome reported by whoever ran a request
pub type AnalysisOutcome = std::result::Result<Vec<MaterialEstimate>, String>;

/// Owner of the current request/result pair
#[derive(Debug)]
pub struct AnalysisSession {
    status: AnalysisStatus,
    image: Option<ImagePayload>,
    fabric: FabricSpec,
    language: Language,
    results: Vec<MaterialEstimate>,
    error: Option<String>,
    in_flight: Option<RequestId>,
    last_request: Option<AnalysisRequest>,
    next_id: u64,
}

impl AnalysisSession {
    pub fn new(fabric: FabricSpec, language: Language) -> Self {
        Self {
            status: AnalysisStatus::Idle,
            image: None,
            fabric,
            language,
            results: Vec::new(),
            error: None,
            in_flight: None,
            last_request: None,
            next_id: 1,
        }
    }

    // Accessors

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn fabric(&self) -> &FabricSpec {
        &self.fabric
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Rows of the last successful analysis (empty unless `Success`)
    pub fn results(&self) -> &[MaterialEstimate] {
        &self.results
    }

    /// Failure reason (only in `Error`)
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Id of the request whose outcome will be applied
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn last_request(&self) -> Option<&AnalysisRequest> {
        self.last_request.as_ref()
    }

    // Settings (take effect on the next request)

    pub fn set_fabric(&mut self, fabric: FabricSpec) {
        self.fabric = fabric;
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    // Transitions

    /// New image: any state → Analyzing, superseding any in-flight request
    pub fn select_image(&mut self, image: ImagePayload) -> AnalysisRequest {
        self.image = Some(image.clone());
        self.start(image, self.fabric, self.language)
    }

    /// Success|Error → Analyzing with the current settings
    pub fn recalculate(&mut self) -> Result<AnalysisRequest> {
        if !matches!(self.status, AnalysisStatus::Success | AnalysisStatus::Error) {
            return Err(Error::InvalidTransition(format!(
                "recalculate is not allowed while {}",
                self.status
            )));
        }
        let image = self
            .image
            .clone()
            .ok_or_else(|| Error::InvalidTransition("recalculate without an image".into()))?;
        Ok(self.start(image, self.fabric, self.language))
    }

    /// Error → Analyzing with the exact settings of the failed request
    pub fn retry(&mut self) -> Result<AnalysisRequest> {
        if self.status != AnalysisStatus::Error {
            return Err(Error::InvalidTransition(format!(
                "retry is not allowed while {}",
                self.status
            )));
        }
        let last = self
            .last_request
            .clone()
            .ok_or_else(|| Error::InvalidTransition("nothing to retry".into()))?;
        Ok(self.start(last.image, last.fabric, last.language))
    }

    /// Any state → Idle; a pending outcome will be ignored
    pub fn clear_image(&mut self) {
        self.image = None;
        self.results.clear();
        self.error = None;
        self.in_flight = None;
        self.last_request = None;
        self.status = AnalysisStatus::Idle;
    }

    /// Apply the outcome of a request
    ///
    /// Returns `false` when the request is stale (superseded or cleared) and
    /// the outcome was discarded.
    pub fn resolve(&mut self, id: RequestId, outcome: AnalysisOutcome) -> bool {
        if self.in_flight != Some(id) {
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(rows) if !rows.is_empty() => {
                self.results = rows;
                self.error = None;
                self.status = AnalysisStatus::Success;
            }
            Ok(_) => {
                self.fail(Error::NoEstimates.to_string());
            }
            Err(reason) => {
                self.fail(reason);
            }
        }
        true
    }

    fn fail(&mut self, reason: String) {
        self.results.clear();
        self.error = Some(if reason.trim().is_empty() {
            "unknown error".to_string()
        } else {
            reason
        });
        self.status = AnalysisStatus::Error;
    }

    fn start(&mut self, image: ImagePayload, fabric: FabricSpec, language: Language) -> AnalysisRequest {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        let request = AnalysisRequest { id, image, fabric, language };

        self.status = AnalysisStatus::Analyzing;
        self.results.clear();
        self.error = None;
        self.in_flight = Some(id);
        self.last_request = Some(request.clone());

        request
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(FabricSpec::default(), Language::default())
    }
}
