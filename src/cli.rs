use clap::{Args, Parser, Subcommand};
use jacket_ai_common::{FabricSpec, Language};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jacket-ai")]
#[command(about = "Fabric consumption and cost estimator for jacket photos", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output language (uk/en/ru); defaults to the config value
    #[arg(long, global = true)]
    pub lang: Option<Language>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one jacket photo and print the consumption table
    Analyze {
        /// Image file, or `-` to read a data URL from stdin
        #[arg(required = true)]
        image: String,

        #[command(flatten)]
        fabric: FabricArgs,

        /// Save the result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session: analyze, tweak settings, recalculate, retry
    Interactive {
        /// Photo to start with
        image: Option<PathBuf>,

        #[command(flatten)]
        fabric: FabricArgs,
    },

    /// Print the prompt that would be sent to the model
    Prompt {
        #[command(flatten)]
        fabric: FabricArgs,

        /// Also print the response schema
        #[arg(long)]
        schema: bool,
    },

    /// Reprice a saved result with new prices (no model call)
    Cost {
        /// JSON file written by `analyze --output`
        #[arg(required = true)]
        input: PathBuf,

        #[command(flatten)]
        fabric: FabricArgs,

        /// Write the repriced result here (default: print only)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration
    Config {
        /// Store the Gemini API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Set the default language
        #[arg(long)]
        set_language: Option<Language>,

        /// Set the model name
        #[arg(long)]
        set_model: Option<String>,

        /// Show the current configuration
        #[arg(long)]
        show: bool,
    },
}

/// Roll widths (cm) and per-meter prices
#[derive(Args, Debug, Clone, Default)]
pub struct FabricArgs {
    /// Main fabric roll width (cm)
    #[arg(long, value_parser = parse_width)]
    pub main_width: Option<f64>,

    /// Lining roll width (cm)
    #[arg(long, value_parser = parse_width)]
    pub lining_width: Option<f64>,

    /// Insulation roll width (cm)
    #[arg(long, value_parser = parse_width)]
    pub insulation_width: Option<f64>,

    /// Main fabric price per meter
    #[arg(long, value_parser = parse_price_arg)]
    pub main_price: Option<f64>,

    /// Lining price per meter
    #[arg(long, value_parser = parse_price_arg)]
    pub lining_price: Option<f64>,

    /// Insulation price per meter
    #[arg(long, value_parser = parse_price_arg)]
    pub insulation_price: Option<f64>,
}

impl FabricArgs {
    /// Overlay the given values on `base`
    pub fn apply_to(&self, base: FabricSpec) -> FabricSpec {
        let mut spec = base;
        let overlay = |current: Option<f64>, arg: Option<f64>| arg.or(current);
        spec.main.width_cm = overlay(spec.main.width_cm, self.main_width);
        spec.lining.width_cm = overlay(spec.lining.width_cm, self.lining_width);
        spec.insulation.width_cm = overlay(spec.insulation.width_cm, self.insulation_width);
        spec.main.price = overlay(spec.main.price, self.main_price);
        spec.lining.price = overlay(spec.lining.price, self.lining_price);
        spec.insulation.price = overlay(spec.insulation.price, self.insulation_price);
        spec
    }

    pub fn to_spec(&self) -> FabricSpec {
        self.apply_to(FabricSpec::default())
    }
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.trim()
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("`{}` is not a number", s))
}

/// Roll width in cm: positive number
pub fn parse_width(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(format!("width must be positive, got {}", value))
    }
}

/// Price per meter: zero or more
pub fn parse_price_arg(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("price must not be negative, got {}", value))
    }
}
