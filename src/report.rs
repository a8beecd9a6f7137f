//! Consumption table rendering and JSON export
//!
//! ## Table layout
//! Size | Length | Chest | Sleeve | Main | Lining | Insulation | [Cost] | Hardware
//!
//! Hardware goes last because it is free text of arbitrary length.

use crate::error::Result;
use jacket_ai_common::{
    estimate_cost_with, format_subcost, format_total, shows_cost_column, CostBreakdown,
    CostPolicy, FabricSpec, Language, MaterialClass, MaterialEstimate, RollWidths, Texts,
    DEFAULT_HARDWARE_SURCHARGE_RATE,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const PLACEHOLDER: &str = "-";

// Text table

fn cell(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Material cell: usage text plus the "~cost" hint when prices are set
fn material_cell(
    row: &MaterialEstimate,
    breakdown: &CostBreakdown,
    fabric: &FabricSpec,
    class: MaterialClass,
) -> String {
    if class == MaterialClass::Insulation && !row.has_insulation() {
        return PLACEHOLDER.to_string();
    }
    let usage = cell(row.usage(class).unwrap_or_default());
    match format_subcost(row, breakdown, &fabric.prices(), class) {
        Some(hint) => format!("{} ({})", usage, hint),
        None => usage,
    }
}

fn total_cell(breakdown: &CostBreakdown, texts: &Texts) -> String {
    let total = format_total(breakdown.total_cost);
    if total == PLACEHOLDER {
        total
    } else {
        format!("{} {}", total, texts.currency)
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Render the consumption table for a successful analysis
pub fn render_table(
    rows: &[MaterialEstimate],
    fabric: &FabricSpec,
    policy: &CostPolicy,
    texts: &Texts,
) -> String {
    let prices = fabric.prices();
    let show_cost = shows_cost_column(&prices);

    let mut header = vec![
        texts.size.to_string(),
        format!("{} ({})", texts.length, texts.back),
        format!("{} ({})", texts.chest, texts.half_girth),
        format!("{} ({})", texts.sleeve, texts.from_shoulder),
        texts.main.to_string(),
        texts.lining_fabric.to_string(),
        texts.insulation.to_string(),
    ];
    if show_cost {
        header.push(format!("{} ({})", texts.cost, texts.currency));
    }
    header.push(texts.hardware.to_string());

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let breakdown = estimate_cost_with(row, &prices, policy);
            let mut cells = vec![
                cell(&row.size),
                cell(&row.back_length),
                cell(&row.chest_width),
                cell(&row.sleeve_length),
            ];
            cells.extend(
                MaterialClass::ALL
                    .iter()
                    .map(|&class| material_cell(row, &breakdown, fabric, class)),
            );
            if show_cost {
                cells.push(total_cell(&breakdown, texts));
            }
            cells.push(cell(&row.hardware));
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            std::iter::once(&header[i])
                .chain(body.iter().map(|r| &r[i]))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |cells: &[String]| -> String {
        let last = cells.len() - 1;
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| if i == last { c.clone() } else { pad(c, widths[i]) })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n{}\n\n", texts.results_title, texts.results_subtitle));
    out.push_str(&format_line(&header));
    out.push('\n');
    let rule_len: usize = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_len.min(120)));
    out.push('\n');
    for cells in &body {
        out.push_str(&format_line(cells));
        out.push('\n');
    }

    let notes: Vec<String> = rows
        .iter()
        .filter_map(|row| {
            let note = row.notes.as_deref()?.trim();
            (!note.is_empty() && note != PLACEHOLDER).then(|| format!("  {}: {}", row.size, note))
        })
        .collect();
    if !notes.is_empty() {
        out.push_str(&format!("\n{}:\n", texts.notes));
        for note in notes {
            out.push_str(&note);
            out.push('\n');
        }
    }

    out.push('\n');
    if show_cost {
        out.push_str(&format!("{}: {}\n", texts.formula_title, texts.formula));
        if (policy.hardware_surcharge_rate - DEFAULT_HARDWARE_SURCHARGE_RATE).abs() > f64::EPSILON {
            out.push_str(&format!(
                "({}: {:.0}%)\n",
                texts.hardware,
                policy.hardware_surcharge_rate * 100.0
            ));
        }
    } else {
        out.push_str(texts.disclaimer);
        out.push('\n');
    }
    out
}

/// Status line shown while analyzing
pub fn describe_widths(widths: &RollWidths, texts: &Texts) -> String {
    if !widths.any() {
        return texts.using_standard.to_string();
    }
    let parts: Vec<String> = [
        (MaterialClass::Main, texts.main),
        (MaterialClass::Lining, texts.lining_fabric),
        (MaterialClass::Insulation, texts.insulation),
    ]
    .iter()
    .filter_map(|&(class, label)| {
        widths
            .get(class)
            .map(|w| format!("{} {}{}", label, w, texts.cm))
    })
    .collect();
    format!("{}: {}", texts.calculating_for, parts.join(", "))
}

/// Current fabric settings, one line per material class
pub fn render_settings(fabric: &FabricSpec, texts: &Texts) -> String {
    let mut out = format!("{}\n", texts.settings_title);
    for (class, label) in [
        (MaterialClass::Main, texts.main_fabric),
        (MaterialClass::Lining, texts.lining_fabric),
        (MaterialClass::Insulation, texts.insulation),
    ] {
        let spec = fabric.get(class);
        let width = spec
            .width_cm
            .map(|w| format!("{} {}", w, texts.cm))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let price = spec
            .price
            .map(|p| format!("{} {}", p, texts.currency))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        out.push_str(&format!(
            "  {}: {} {}, {} {}\n",
            label, texts.width, width, texts.price, price
        ));
    }
    out.push_str(&format!("  {}\n", texts.info_text));
    out
}

// JSON export

/// One exported row: the model's estimate plus derived costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(flatten)]
    pub estimate: MaterialEstimate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostBreakdown>,
}

/// Saved analysis, reloadable for repricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    pub language: Language,
    pub fabric: FabricSpec,
    #[serde(default = "default_surcharge_rate")]
    pub hardware_surcharge_rate: f64,
    pub rows: Vec<ReportRow>,
}

fn default_surcharge_rate() -> f64 {
    DEFAULT_HARDWARE_SURCHARGE_RATE
}

impl EstimateReport {
    pub fn build(
        rows: &[MaterialEstimate],
        fabric: FabricSpec,
        language: Language,
        policy: &CostPolicy,
    ) -> Self {
        let mut report = Self {
            language,
            fabric,
            hardware_surcharge_rate: policy.hardware_surcharge_rate,
            rows: rows
                .iter()
                .cloned()
                .map(|estimate| ReportRow { estimate, cost: None })
                .collect(),
        };
        report.reprice(fabric, policy);
        report
    }

    /// Recompute costs with new prices; widths are kept for reference only
    pub fn reprice(&mut self, fabric: FabricSpec, policy: &CostPolicy) {
        self.fabric = fabric;
        self.hardware_surcharge_rate = policy.hardware_surcharge_rate;
        let prices = fabric.prices();
        let show_cost = shows_cost_column(&prices);
        for row in &mut self.rows {
            row.cost = show_cost.then(|| estimate_cost_with(&row.estimate, &prices, policy));
        }
    }

    pub fn policy(&self) -> CostPolicy {
        CostPolicy {
            hardware_surcharge_rate: self.hardware_surcharge_rate,
        }
    }

    pub fn estimates(&self) -> Vec<MaterialEstimate> {
        self.rows.iter().map(|r| r.estimate.clone()).collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
