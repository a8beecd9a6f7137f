//! Domain types shared by the CLI and the library
//!
//! - MaterialEstimate: one size row returned by the model
//! - FabricSpec: roll width and price per material class, entered by the user
//! - RollWidths / Prices: the two halves of a FabricSpec as consumed by
//!   the prompt builder and the cost estimator

use serde::{Deserialize, Serialize};

/// One size row of the consumption table
///
/// Every measurement is kept as the model wrote it ("72 см", "1,8 m").
/// Numbers are only extracted on demand by [`crate::quantity::parse_quantity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialEstimate {
    pub size: String,

    pub back_length: String,
    pub chest_width: String, // half-girth
    pub sleeve_length: String,

    pub main_fabric: String,
    pub lining_fabric: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulation: Option<String>,

    pub hardware: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MaterialEstimate {
    /// Raw usage text for a material class
    pub fn usage(&self, class: MaterialClass) -> Option<&str> {
        match class {
            MaterialClass::Main => Some(self.main_fabric.as_str()),
            MaterialClass::Lining => Some(self.lining_fabric.as_str()),
            MaterialClass::Insulation => self.insulation.as_deref(),
        }
    }

    /// True when the insulation cell is missing or a placeholder
    pub fn has_insulation(&self) -> bool {
        match self.insulation.as_deref().map(str::trim) {
            None | Some("") | Some("-") | Some("0") => false,
            Some(_) => true,
        }
    }
}

/// Material classes the user can configure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialClass {
    Main,
    Lining,
    Insulation,
}

impl MaterialClass {
    pub const ALL: [MaterialClass; 3] = [
        MaterialClass::Main,
        MaterialClass::Lining,
        MaterialClass::Insulation,
    ];
}

/// Width and price of one material class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSpec {
    /// Roll width in cm
    #[serde(default)]
    pub width_cm: Option<f64>,
    /// Price per meter
    #[serde(default)]
    pub price: Option<f64>,
}

/// User-entered fabric settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabricSpec {
    pub main: MaterialSpec,
    pub lining: MaterialSpec,
    pub insulation: MaterialSpec,
}

impl FabricSpec {
    pub fn get(&self, class: MaterialClass) -> &MaterialSpec {
        match class {
            MaterialClass::Main => &self.main,
            MaterialClass::Lining => &self.lining,
            MaterialClass::Insulation => &self.insulation,
        }
    }

    pub fn get_mut(&mut self, class: MaterialClass) -> &mut MaterialSpec {
        match class {
            MaterialClass::Main => &mut self.main,
            MaterialClass::Lining => &mut self.lining,
            MaterialClass::Insulation => &mut self.insulation,
        }
    }

    pub fn widths(&self) -> RollWidths {
        RollWidths {
            main: self.main.width_cm,
            lining: self.lining.width_cm,
            insulation: self.insulation.width_cm,
        }
    }

    /// Prices with missing values defaulted to 0
    pub fn prices(&self) -> Prices {
        Prices {
            main: self.main.price.unwrap_or(0.0),
            lining: self.lining.price.unwrap_or(0.0),
            insulation: self.insulation.price.unwrap_or(0.0),
        }
    }
}

/// Roll width constraints passed to the prompt builder
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollWidths {
    pub main: Option<f64>,
    pub lining: Option<f64>,
    pub insulation: Option<f64>,
}

impl RollWidths {
    pub fn get(&self, class: MaterialClass) -> Option<f64> {
        match class {
            MaterialClass::Main => self.main,
            MaterialClass::Lining => self.lining,
            MaterialClass::Insulation => self.insulation,
        }
    }

    pub fn any(&self) -> bool {
        MaterialClass::ALL.iter().any(|&c| self.get(c).is_some())
    }
}

/// Per-meter prices
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prices {
    pub main: f64,
    pub lining: f64,
    pub insulation: f64,
}

impl Prices {
    pub fn get(&self, class: MaterialClass) -> f64 {
        match class {
            MaterialClass::Main => self.main,
            MaterialClass::Lining => self.lining,
            MaterialClass::Insulation => self.insulation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> MaterialEstimate {
        MaterialEstimate {
            size: "M".to_string(),
            back_length: "72 см".to_string(),
            chest_width: "56 см".to_string(),
            sleeve_length: "64 см".to_string(),
            main_fabric: "1.8 м".to_string(),
            lining_fabric: "1.2 м".to_string(),
            insulation: Some("-".to_string()),
            hardware: "Блискавка 70 см".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_material_estimate_camel_case() {
        let json = serde_json::to_string(&sample_row()).unwrap();
        assert!(json.contains("\"backLength\""));
        assert!(json.contains("\"chestWidth\""));
        assert!(json.contains("\"liningFabric\""));
        // None fields are omitted
        assert!(!json.contains("\"notes\""));
    }

    #[test]
    fn test_material_estimate_optional_fields() {
        let json = r#"{
            "size": "S", "backLength": "70", "chestWidth": "54", "sleeveLength": "62",
            "mainFabric": "1.6 m", "liningFabric": "1.1 m", "hardware": "zip"
        }"#;
        let row: MaterialEstimate = serde_json::from_str(json).unwrap();
        assert_eq!(row.insulation, None);
        assert_eq!(row.notes, None);
        assert!(!row.has_insulation());
    }

    #[test]
    fn test_material_estimate_missing_required_field() {
        // hardware is required
        let json = r#"{
            "size": "S", "backLength": "70", "chestWidth": "54", "sleeveLength": "62",
            "mainFabric": "1.6 m", "liningFabric": "1.1 m"
        }"#;
        assert!(serde_json::from_str::<MaterialEstimate>(json).is_err());
    }

    #[test]
    fn test_has_insulation_placeholders() {
        let mut row = sample_row();
        for placeholder in ["-", "0", "", "  "] {
            row.insulation = Some(placeholder.to_string());
            assert!(!row.has_insulation(), "placeholder {:?}", placeholder);
        }
        row.insulation = Some("1.5 м".to_string());
        assert!(row.has_insulation());
    }

    #[test]
    fn test_usage_by_class() {
        let row = sample_row();
        assert_eq!(row.usage(MaterialClass::Main), Some("1.8 м"));
        assert_eq!(row.usage(MaterialClass::Lining), Some("1.2 м"));
        assert_eq!(row.usage(MaterialClass::Insulation), Some("-"));
    }

    #[test]
    fn test_fabric_spec_prices_default_to_zero() {
        let mut spec = FabricSpec::default();
        spec.main.price = Some(200.0);
        let prices = spec.prices();
        assert_eq!(prices.main, 200.0);
        assert_eq!(prices.lining, 0.0);
        assert_eq!(prices.insulation, 0.0);
    }

    #[test]
    fn test_roll_widths_any() {
        let mut spec = FabricSpec::default();
        assert!(!spec.widths().any());
        spec.get_mut(MaterialClass::Insulation).width_cm = Some(150.0);
        assert!(spec.widths().any());
        assert_eq!(spec.widths().get(MaterialClass::Insulation), Some(150.0));
    }
}
