//! Interactive estimation session
//!
//! One photo at a time. The user can edit widths/prices, switch language,
//! recalculate with the new settings, retry a failed call, swap or clear
//! the photo and save the table. Ctrl-C while analyzing clears the photo
//! and the late answer is ignored; Ctrl-C at a prompt ends the session.

use crate::cli::parse_width;
use crate::config::Config;
use crate::error::{JacketAiError, Result};
use crate::image_input;
use crate::orchestrator::Orchestrator;
use crate::progress::spinner;
use crate::report::{describe_widths, render_settings, render_table, EstimateReport};
use dialoguer::{Input, Select};
use jacket_ai_common::{
    parse_price, texts, AnalysisStatus, Error as CommonError, FabricSpec, Language, MaterialClass,
    Texts,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const DEFAULT_SAVE_PATH: &str = "jacket-estimate.json";

/// Menu actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Re-run with the current settings
    Recalculate,
    /// Re-run the failed request as it was
    Retry,
    /// Edit widths and prices
    EditFabric,
    SwitchLanguage,
    NewImage,
    ClearImage,
    Save,
    Quit,
    Unknown(String),
}

pub fn parse_session_action(input: &str) -> SessionAction {
    match input.trim().to_lowercase().as_str() {
        "r" => SessionAction::Recalculate,
        "t" => SessionAction::Retry,
        "w" => SessionAction::EditFabric,
        "l" => SessionAction::SwitchLanguage,
        "n" => SessionAction::NewImage,
        "c" => SessionAction::ClearImage,
        "s" => SessionAction::Save,
        "q" | "quit" | "exit" => SessionAction::Quit,
        other => SessionAction::Unknown(other.to_string()),
    }
}

/// Apply one edited field
///
/// Empty input keeps `current`, `-` clears it, anything else goes through
/// `parse`.
pub fn edit_value(
    input: &str,
    current: Option<f64>,
    parse: impl Fn(&str) -> std::result::Result<f64, String>,
) -> std::result::Result<Option<f64>, String> {
    match input.trim() {
        "" => Ok(current),
        "-" => Ok(None),
        value => parse(value).map(Some),
    }
}

fn cli_err(e: dialoguer::Error) -> JacketAiError {
    match e {
        // Ctrl-C read by the prompt itself
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => JacketAiError::Io(e),
        e => JacketAiError::CliExecution(e.to_string()),
    }
}

fn is_interrupt(err: &JacketAiError) -> bool {
    matches!(err, JacketAiError::Io(e) if e.kind() == io::ErrorKind::Interrupted)
}

/// What a Ctrl-C means right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    CancelAnalysis,
    EndSession,
}

/// Routes Ctrl-C for the whole session
///
/// Once tokio owns SIGINT the default "kill the process" is gone, so every
/// Ctrl-C goes through here.
#[derive(Clone)]
struct Interrupts {
    analyzing: Arc<AtomicBool>,
    cancel_tx: mpsc::UnboundedSender<()>,
}

impl Interrupts {
    fn new() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (cancel_tx, cancel_rx) = mpsc::unbounded_channel();
        let interrupts = Self {
            analyzing: Arc::new(AtomicBool::new(false)),
            cancel_tx,
        };
        (interrupts, cancel_rx)
    }

    fn set_analyzing(&self, analyzing: bool) {
        self.analyzing.store(analyzing, Ordering::SeqCst);
    }

    fn route(&self) -> Interrupt {
        if self.analyzing.load(Ordering::SeqCst) {
            let _ = self.cancel_tx.send(());
            Interrupt::CancelAnalysis
        } else {
            Interrupt::EndSession
        }
    }

    /// Listen for Ctrl-C until the session ends
    fn watch(&self) -> JoinHandle<()> {
        let interrupts = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if interrupts.route() == Interrupt::EndSession {
                    // The main task is blocked in a prompt read
                    println!();
                    tracing::debug!("Ctrl-C at prompt, exiting");
                    std::process::exit(130);
                }
            }
        })
    }
}

fn ask(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(cli_err)
}

fn format_current(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn class_label(class: MaterialClass, t: &Texts) -> &'static str {
    match class {
        MaterialClass::Main => t.main_fabric,
        MaterialClass::Lining => t.lining_fabric,
        MaterialClass::Insulation => t.insulation,
    }
}

/// Prompt for every width and price
fn prompt_fabric(current: &FabricSpec, t: &Texts) -> Result<FabricSpec> {
    let mut fabric = *current;
    println!("{}", t.settings_title);

    for class in MaterialClass::ALL {
        let label = class_label(class, t);
        let spec = fabric.get_mut(class);

        loop {
            let input = ask(&format!(
                "{}: {} ({}) [{}]",
                label,
                t.width,
                t.cm,
                format_current(spec.width_cm)
            ))?;
            match edit_value(&input, spec.width_cm, parse_width) {
                Ok(value) => {
                    spec.width_cm = value;
                    break;
                }
                Err(e) => println!("  → {}", e),
            }
        }

        let input = ask(&format!(
            "{}: {} ({}) [{}]",
            label,
            t.price,
            t.currency,
            format_current(spec.price)
        ))?;
        // Invalid or negative prices count as 0
        if let Ok(value) = edit_value(&input, spec.price, |s| Ok(parse_price(s))) {
            spec.price = value;
        }
    }

    Ok(fabric)
}

fn prompt_language(current: Language) -> Result<Language> {
    let names: Vec<&str> = Language::ALL.iter().map(|l| l.native_name()).collect();
    let default = Language::ALL.iter().position(|&l| l == current).unwrap_or(0);
    let index = Select::new()
        .items(&names)
        .default(default)
        .interact()
        .map_err(cli_err)?;
    Ok(Language::ALL[index])
}

/// Load a photo and start analyzing it; on failure the session is untouched
fn start_with_path(orch: &mut Orchestrator, path: &Path, config: &Config, t: &Texts) -> bool {
    match image_input::load_image(path, config.max_image_size) {
        Ok(image) => {
            orch.select_image(image);
            true
        }
        Err(JacketAiError::Common(CommonError::UnsupportedImage(_))) => {
            println!("  → {}", t.not_an_image);
            false
        }
        Err(e) => {
            println!("  → {}", e);
            false
        }
    }
}

/// Wait for the current request; Ctrl-C clears the photo
async fn settle(
    orch: &mut Orchestrator,
    interrupts: &Interrupts,
    cancel_rx: &mut mpsc::UnboundedReceiver<()>,
    t: &Texts,
) -> AnalysisStatus {
    let pb = spinner(t.analyzing);
    if let Some(request) = orch.session().last_request() {
        pb.println(describe_widths(&request.fabric.widths(), t));
    }

    // a Ctrl-C that raced the end of the previous analysis
    while cancel_rx.try_recv().is_ok() {}
    interrupts.set_analyzing(true);
    let interrupted = tokio::select! {
        _ = orch.wait() => false,
        _ = cancel_rx.recv() => true,
    };
    interrupts.set_analyzing(false);
    pb.finish_and_clear();

    if interrupted {
        orch.clear_image();
        println!("{}", t.cancelled);
    }
    orch.status()
}

fn show_state(orch: &Orchestrator, config: &Config, t: &Texts) {
    let session = orch.session();
    match session.status() {
        AnalysisStatus::Success => {
            println!(
                "\n{}",
                render_table(session.results(), session.fabric(), &config.cost_policy(), t)
            );
        }
        AnalysisStatus::Error => {
            println!(
                "\n❌ {}: {}",
                t.error_title,
                session.error().unwrap_or_default()
            );
            println!("   [t] {}  [r] {}", t.retry, t.recalculate);
        }
        AnalysisStatus::Idle => println!("{}", t.no_image),
        AnalysisStatus::Analyzing => {}
    }
}

fn save_results(orch: &Orchestrator, config: &Config, t: &Texts) -> Result<()> {
    let session = orch.session();
    if session.results().is_empty() {
        println!("  → {}", t.no_image);
        return Ok(());
    }
    let input = ask(&format!("{} [{}]", t.saved_to, DEFAULT_SAVE_PATH))?;
    let path = PathBuf::from(match input.trim() {
        "" => DEFAULT_SAVE_PATH,
        value => value,
    });
    EstimateReport::build(
        session.results(),
        *session.fabric(),
        session.language(),
        &config.cost_policy(),
    )
    .save(&path)?;
    println!("✔ {}: {}", t.saved_to, path.display());
    Ok(())
}

pub async fn run_interactive(
    orch: &mut Orchestrator,
    config: &Config,
    initial_image: Option<PathBuf>,
) -> Result<()> {
    let (interrupts, mut cancel_rx) = Interrupts::new();
    let watcher = interrupts.watch();

    let result = session_loop(orch, config, initial_image, &interrupts, &mut cancel_rx).await;
    watcher.abort();

    match result {
        Err(e) if is_interrupt(&e) => Ok(()),
        other => other,
    }
}

async fn session_loop(
    orch: &mut Orchestrator,
    config: &Config,
    initial_image: Option<PathBuf>,
    interrupts: &Interrupts,
    cancel_rx: &mut mpsc::UnboundedReceiver<()>,
) -> Result<()> {
    let mut t = texts(orch.session().language());
    println!("🧥 jacket-ai - {}\n{}\n", t.app_title, t.app_subtitle);
    println!("{}", render_settings(orch.session().fabric(), t));

    if let Some(path) = initial_image {
        start_with_path(orch, &path, config, t);
    }

    let mut dirty = true;
    loop {
        orch.drain_completions();
        if orch.status() == AnalysisStatus::Analyzing {
            settle(orch, interrupts, cancel_rx, t).await;
            dirty = true;
        }
        if dirty {
            show_state(orch, config, t);
            dirty = false;
        }

        if orch.session().image().is_none() {
            let input = ask(t.image_prompt)?;
            let path = input.trim();
            if path.is_empty() {
                break;
            }
            start_with_path(orch, Path::new(path), config, t);
            continue;
        }

        println!("{}", t.menu_hint);
        let input = ask(t.menu_prompt)?;

        match parse_session_action(&input) {
            SessionAction::Recalculate => {
                if let Err(e) = orch.recalculate() {
                    println!("  → {}", e);
                }
            }
            SessionAction::Retry => {
                if let Err(e) = orch.retry() {
                    println!("  → {}", e);
                }
            }
            SessionAction::EditFabric => {
                let fabric = prompt_fabric(orch.session().fabric(), t)?;
                orch.set_fabric(fabric);
                println!("{}", render_settings(&fabric, t));
            }
            SessionAction::SwitchLanguage => {
                let language = prompt_language(orch.session().language())?;
                orch.set_language(language);
                t = texts(language);
                dirty = true;
            }
            SessionAction::NewImage => {
                let input = ask(t.image_prompt)?;
                let path = input.trim();
                if !path.is_empty() {
                    start_with_path(orch, Path::new(path), config, t);
                }
            }
            SessionAction::ClearImage => {
                orch.clear_image();
                println!("{}", t.image_cleared);
            }
            SessionAction::Save => save_results(orch, config, t)?,
            SessionAction::Quit => break,
            SessionAction::Unknown(_) => {}
        }
    }

    Ok(())
}
