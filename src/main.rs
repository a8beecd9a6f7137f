use anyhow::Context;
use clap::Parser;
use jacket_ai_common::{build_prompt, texts, AnalysisStatus};
use jacket_ai_rust::{cli, config, gemini, image_input, interactive, orchestrator, progress, report};
use cli::{Cli, Commands};
use config::Config;
use gemini::GeminiClient;
use orchestrator::Orchestrator;
use report::{describe_widths, render_table, EstimateReport};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    // RUST_LOG wins; otherwise warn for dependencies, info (or debug) for us
    let default = if verbose {
        "warn,jacket_ai_rust=debug,jacket_ai_common=debug"
    } else {
        "warn,jacket_ai_rust=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load().context("failed to load config")?;
    let language = cli.lang.unwrap_or(config.language);
    let t = texts(language);

    match cli.command {
        Commands::Analyze { image, fabric, output } => {
            println!("🧥 jacket-ai - {}\n", t.app_title);

            // 1. Image
            let payload = image_input::load(&image, config.max_image_size)
                .with_context(|| format!("cannot use image `{}`", image))?;
            tracing::info!(mime_type = %payload.mime_type, "image loaded");

            // 2. Model call
            let client = GeminiClient::from_config(&config)?;
            let fabric = fabric.to_spec();
            let mut orch = Orchestrator::new(Arc::new(client), fabric, language);

            println!("{}", describe_widths(&fabric.widths(), t));
            orch.select_image(payload);
            let pb = progress::spinner(t.analyzing);
            let status = orch.wait().await;
            pb.finish_and_clear();

            if status != AnalysisStatus::Success {
                let reason = orch.session().error().unwrap_or("unknown error");
                anyhow::bail!("{}: {}", t.error_title, reason);
            }

            // 3. Table
            let session = orch.session();
            println!(
                "{}",
                render_table(session.results(), &fabric, &config.cost_policy(), t)
            );

            if let Some(path) = output {
                EstimateReport::build(session.results(), fabric, language, &config.cost_policy())
                    .save(&path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("✔ {}: {}", t.saved_to, path.display());
            }
        }

        Commands::Interactive { image, fabric } => {
            let client = GeminiClient::from_config(&config)?;
            let mut orch = Orchestrator::new(Arc::new(client), fabric.to_spec(), language);
            interactive::run_interactive(&mut orch, &config, image).await?;
        }

        Commands::Prompt { fabric, schema } => {
            let bundle = build_prompt(&fabric.to_spec().widths(), language);
            println!("# system\n{}\n", bundle.system_instruction);
            println!("# user\n{}", bundle.user_prompt);
            if schema {
                println!("\n# schema\n{}", serde_json::to_string_pretty(&bundle.response_schema)?);
            }
        }

        Commands::Cost { input, fabric, output } => {
            let mut saved = EstimateReport::load(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let spec = fabric.apply_to(saved.fabric);
            saved.reprice(spec, &config.cost_policy());

            let t = texts(cli.lang.unwrap_or(saved.language));
            println!(
                "{}",
                render_table(&saved.estimates(), &saved.fabric, &saved.policy(), t)
            );

            if let Some(path) = output {
                saved
                    .save(&path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("✔ {}: {}", t.saved_to, path.display());
            }
        }

        Commands::Config { set_api_key, set_language, set_model, show } => {
            let mut changed = false;

            if let Some(key) = set_api_key {
                config.api_key = Some(key);
                changed = true;
                println!("✔ API key set");
            }
            if let Some(lang) = set_language {
                config.language = lang;
                changed = true;
                println!("✔ language: {}", lang.native_name());
            }
            if let Some(model) = set_model {
                config.model = model;
                changed = true;
                println!("✔ model: {}", config.model);
            }

            if changed {
                config.save()?;
                println!("✔ saved: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("config:    {}", Config::config_path()?.display());
                println!("api key:   {}", config.masked_api_key().unwrap_or_else(|| "(not set)".into()));
                println!("model:     {}", config.model);
                println!("base url:  {}", config.api_base_url);
                println!("language:  {}", config.language);
                println!("max image: {}px", config.max_image_size);
                println!("timeout:   {}s", config.timeout_seconds);
                println!("hardware:  {:.0}%", config.hardware_surcharge_rate * 100.0);
            }
        }
    }

    Ok(())
}
