//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use qaextract_core::pipeline::{ConvertResult, ProgressReporter};
use qaextract_shared::{
    AppConfig, ConvertConfig, ParseOutcome, QaExtractError, init_config, load_config,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// qaextract: turn Q&A notes into fine-tuning data.
#[derive(Parser)]
#[command(
    name = "qaextract",
    version,
    about = "Extract question/answer pairs from text files into a chat-format JSONL dataset.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert a text file, or every text file in a directory, to JSONL.
    Convert {
        /// Input file or directory.
        path: PathBuf,

        /// Output file name, written in the input's folder.
        #[arg(short, long)]
        output_name: Option<String>,

        /// Content of the system turn in every record.
        #[arg(short, long, env = "QAEXTRACT_SYSTEM_PROMPT")]
        system_prompt: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Filter used when `RUST_LOG` is unset. The CLI prints its own per-file
/// diagnostics and summary, so logs stay at `warn` without `-v`.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "qaextract=warn",
        1 => "qaextract=info",
        2 => "qaextract=debug",
        _ => "qaextract=trace",
    }
}

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            path,
            output_name,
            system_prompt,
        } => cmd_convert(&path, output_name, system_prompt),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_convert(
    path: &Path,
    output_name: Option<String>,
    system_prompt: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let convert_config = build_convert_config(path, &config, output_name, system_prompt)?;

    info!(
        input = %convert_config.input.display(),
        output = %convert_config.output_file_name,
        "converting Q&A text"
    );

    let reporter = CliProgress::new();
    let result = qaextract_core::pipeline::convert(&convert_config, &reporter)?;

    let report = &result.report;
    println!();
    println!("  Dataset written successfully!");
    println!("  Path:     {}", result.output.path.display());
    println!("  Records:  {}", result.output.records);
    println!("  Invalid:  {} block(s) without a usable answer", report.invalid_blocks());
    println!(
        "  Files:    {} parsed, {} skipped ({})",
        report.processed(),
        report.failed().count(),
        result.mode.as_str()
    );
    println!("  SHA-256:  {}", result.output.sha256);
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Merge CLI flags over the loaded config.
fn build_convert_config(
    path: &Path,
    config: &AppConfig,
    output_name: Option<String>,
    system_prompt: Option<String>,
) -> Result<ConvertConfig> {
    let mut convert_config = ConvertConfig::new(path, config);

    if let Some(name) = output_name {
        if name.trim().is_empty() || name.contains(['/', '\\']) {
            return Err(eyre!(
                "invalid output name '{name}': expected a bare file name"
            ));
        }
        convert_config.output_file_name = name;
    }

    if let Some(prompt) = system_prompt {
        if prompt.trim().is_empty() {
            return Err(eyre!("system prompt must not be empty"));
        }
        convert_config.system_prompt = prompt;
    }

    Ok(convert_config)
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
///
/// Per-file diagnostics are printed above the spinner so they stay visible
/// after it is cleared.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_started(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Parsing [{current}/{total}] {}", path.display()));
    }

    fn file_parsed(&self, path: &Path, outcome: &ParseOutcome) {
        if outcome.is_empty() {
            self.spinner.println(format!(
                "  ! no question/answer pairs in {}",
                path.display()
            ));
        }
    }

    fn file_failed(&self, path: &Path, error: &QaExtractError) {
        let hint = if error.is_decode() {
            " (make sure the file is saved as UTF-8)"
        } else {
            ""
        };
        self.spinner
            .println(format!("  x skipped {}: {error}{hint}", path.display()));
    }

    fn done(&self, _result: &ConvertResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
