//! Cost estimation per size row
//!
//! material = main + lining + insulation spend
//! hardware = surcharge rate × (main + lining spend), insulation excluded
//! total    = material + hardware

use crate::quantity::{parse_optional_quantity, parse_quantity};
use crate::types::{MaterialClass, MaterialEstimate, Prices};
use serde::{Deserialize, Serialize};

/// Hardware surcharge applied on main + lining spend
pub const DEFAULT_HARDWARE_SURCHARGE_RATE: f64 = 0.15;

/// Placeholder shown instead of a zero total
pub const EMPTY_CELL: &str = "-";

/// Pricing policy knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostPolicy {
    pub hardware_surcharge_rate: f64,
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self {
            hardware_surcharge_rate: DEFAULT_HARDWARE_SURCHARGE_RATE,
        }
    }
}

/// Costs derived for one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub main_cost: f64,
    pub lining_cost: f64,
    pub insulation_cost: f64,
    pub material_cost: f64,
    pub hardware_cost: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    pub fn subcost(&self, class: MaterialClass) -> f64 {
        match class {
            MaterialClass::Main => self.main_cost,
            MaterialClass::Lining => self.lining_cost,
            MaterialClass::Insulation => self.insulation_cost,
        }
    }
}

/// Estimate costs with the default surcharge rate
pub fn estimate_cost(row: &MaterialEstimate, prices: &Prices) -> CostBreakdown {
    estimate_cost_with(row, prices, &CostPolicy::default())
}

/// Estimate costs with an explicit policy
pub fn estimate_cost_with(
    row: &MaterialEstimate,
    prices: &Prices,
    policy: &CostPolicy,
) -> CostBreakdown {
    let main_cost = parse_quantity(&row.main_fabric) * prices.main;
    let lining_cost = parse_quantity(&row.lining_fabric) * prices.lining;
    let insulation_cost = parse_optional_quantity(row.insulation.as_deref()) * prices.insulation;

    let material_cost = main_cost + lining_cost + insulation_cost;
    let hardware_cost = policy.hardware_surcharge_rate * (main_cost + lining_cost);

    CostBreakdown {
        main_cost,
        lining_cost,
        insulation_cost,
        material_cost,
        hardware_cost,
        total_cost: material_cost + hardware_cost,
    }
}

/// Lenient price parsing for user input
///
/// Accepts a decimal comma. Unparsable, negative or non-finite input is 0.
pub fn parse_price(input: &str) -> f64 {
    let normalized = input.trim().replacen(',', ".", 1);
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

// =============================================
// Display policy
// =============================================

/// The cost column is shown only when some price is positive
pub fn shows_cost_column(prices: &Prices) -> bool {
    prices.main > 0.0 || prices.lining > 0.0 || prices.insulation > 0.0
}

/// Sub-cost hint under a material cell ("~360"), if it should be shown
pub fn format_subcost(
    row: &MaterialEstimate,
    breakdown: &CostBreakdown,
    prices: &Prices,
    class: MaterialClass,
) -> Option<String> {
    if !shows_cost_column(prices) || prices.get(class) <= 0.0 {
        return None;
    }
    if class == MaterialClass::Insulation
        && (!row.has_insulation() || parse_optional_quantity(row.insulation.as_deref()) <= 0.0)
    {
        return None;
    }
    Some(format!("~{:.0}", breakdown.subcost(class)))
}

/// Total cell text: two decimals, or a dash for exactly zero
pub fn format_total(total: f64) -> String {
    if total > 0.0 {
        format!("{:.2}", total)
    } else {
        EMPTY_CELL.to_string()
    }
}
