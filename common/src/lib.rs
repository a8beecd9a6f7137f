//! Jacket AI Common Library
//!
//! Synchronous domain logic shared by the CLI and the async orchestrator:
//! quantity parsing, cost estimation, prompts, response parsing,
//! localization and the analysis session state machine.

pub mod types;
pub mod error;
pub mod quantity;
pub mod cost;
pub mod i18n;
pub mod image;
pub mod prompts;
pub mod parser;
pub mod session;

pub use types::{FabricSpec, MaterialClass, MaterialEstimate, MaterialSpec, Prices, RollWidths};
pub use error::{Error, Result};
pub use quantity::{parse_quantity, parse_optional_quantity};
pub use cost::{
    estimate_cost, estimate_cost_with, format_subcost, format_total, parse_price,
    shows_cost_column, CostBreakdown, CostPolicy, DEFAULT_HARDWARE_SURCHARGE_RATE,
};
pub use i18n::{texts, Language, Texts};
pub use image::{strip_data_url_prefix, ImagePayload};
pub use prompts::{build_prompt, PromptBundle, SIZES};
pub use parser::{extract_json, parse_estimates};
pub use session::{AnalysisOutcome, AnalysisRequest, AnalysisSession, AnalysisStatus, RequestId};
