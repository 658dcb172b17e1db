//! CLI binary for pdf-summarizer.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SummarizerConfig`, runs one command, and prints or writes the result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdf_summarizer::config::default_model_for;
use pdf_summarizer::{
    export_summary, write_exported, EngineSelection, ExportFormat, ExportedFile, Summarizer,
    SummarizerConfig,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner ──────────────────────────────────────────────────────────────────

/// Spinner shown on stderr while a long step runs. Hidden in quiet mode.
fn spinner(enabled: bool, message: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

// ── CLI definition ───────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  pdfsum summarize report.pdf
  pdfsum summarize report.pdf --style bullets
  pdfsum summarize https://example.org/paper.pdf --format pdf -o paper-summary.pdf
  pdfsum summarize laporan.pdf --style executive --format csv
  pdfsum preview report.pdf
  pdfsum export summary.txt --format json --title "Board Memo"

ENGINE SELECTION:
  --provider / PDFSUM_PROVIDER picks an edgequake-llm provider (gemini, openai,
  anthropic, ollama, ...). Without it, gemini is used when GEMINI_API_KEY is
  set, otherwise the offline mock engine.

PDFIUM:
  Set PDFIUM_LIB_PATH to the libpdfium file or its directory when the library
  is not installed system-wide.
"#;

/// Summarise PDF files in the document's own language.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsum",
    version,
    about = "Summarise PDF files and URLs with an LLM, in the document's own language",
    long_about = "Extract the text of a PDF, detect its language, and ask an LLM for a summary \
in one of four styles (standard, executive, bullets, detailed). Summaries can be exported as \
plain text, JSON, CSV, or a formatted A4 PDF.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    engine: EngineArgs,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDFSUM_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, global = true, env = "PDFSUM_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// LLM provider: gemini, openai, anthropic, ollama, or mock.
    #[arg(long, global = true, env = "PDFSUM_PROVIDER")]
    provider: Option<String>,

    /// Model ID for the provider (default depends on the provider).
    #[arg(long, global = true, env = "PDFSUM_MODEL")]
    model: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, global = true, env = "PDFSUM_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, global = true, env = "PDFSUM_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// Retries on LLM failure.
    #[arg(long, global = true, env = "PDFSUM_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// LLM call timeout in seconds.
    #[arg(long, global = true, env = "PDFSUM_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// HTTP download timeout in seconds (URL inputs).
    #[arg(long, global = true, env = "PDFSUM_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// PDF user password for encrypted documents.
    #[arg(long, global = true, env = "PDFSUM_PASSWORD")]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise a PDF file or URL.
    Summarize {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,

        /// Summary style: standard, executive, bullets, detailed.
        #[arg(short, long, env = "PDFSUM_STYLE", default_value = "standard")]
        style: String,

        /// Export format: txt, pdf, json, csv. Without it the summary is
        /// printed to stdout.
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Output file (defaults to summary.<ext> when --format is set).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full summary response as JSON.
        #[arg(long, conflicts_with = "format")]
        json: bool,
    },

    /// Show the detected language and the first 2000 extracted characters.
    Preview {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,
    },

    /// Re-export a saved summary in another format.
    Export {
        /// Text file holding a summary (markdown markers allowed).
        summary_file: PathBuf,

        /// Export format: txt, pdf, json, csv.
        #[arg(short, long)]
        format: ExportFormat,

        /// Output file (defaults to summary.<ext>).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Title stored in JSON exports.
        #[arg(long)]
        title: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries the progress feedback, so INFO logs are only shown
    // when it is disabled.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Summarize {
            ref input,
            ref style,
            format,
            ref output,
            json,
        } => {
            let summarizer = build_summarizer(&cli.engine)?;
            let start = Instant::now();
            let bar = spinner(
                show_progress,
                &format!("Summarising with {}…", summarizer.provider_label()),
            );
            let response = summarizer.summarize_path(input, style).await;
            bar.finish_and_clear();
            let response = response.context("Summarisation failed")?;

            if !cli.quiet {
                eprintln!(
                    "{}  {}  {}  {}",
                    green("✔"),
                    bold(&format!("language: {}", response.detected_language)),
                    dim(&format!("style: {}", response.style)),
                    dim(&format!("{}ms", start.elapsed().as_millis())),
                );
            }

            if let Some(format) = format {
                let file = summarizer
                    .export(&response.summary, format, None)
                    .await
                    .context("Export failed")?;
                write_file(&file, output.as_deref(), cli.quiet).await?;
            } else if json {
                let json = serde_json::to_string_pretty(&response)
                    .context("Failed to serialise response")?;
                println!("{json}");
            } else {
                print_stdout(&response.summary)?;
            }
        }

        Command::Preview { ref input } => {
            let summarizer = build_summarizer(&cli.engine)?;
            let bar = spinner(show_progress, "Extracting text…");
            let preview = summarizer.preview_path(input).await;
            bar.finish_and_clear();
            let preview = preview.context("Preview failed")?;
            let json =
                serde_json::to_string_pretty(&preview).context("Failed to serialise preview")?;
            println!("{json}");
        }

        Command::Export {
            ref summary_file,
            format,
            ref output,
            ref title,
        } => {
            let summary = tokio::fs::read_to_string(summary_file)
                .await
                .with_context(|| format!("Failed to read summary from {:?}", summary_file))?;
            let file = export_summary(&summary, format, None, title.as_deref())
                .await
                .context("Export failed")?;
            write_file(&file, output.as_deref(), cli.quiet).await?;
        }
    }

    Ok(())
}

/// Map CLI flags onto a `SummarizerConfig` and build the summarizer.
///
/// `--provider` overrides the environment probe of
/// [`SummarizerConfig::from_env`].
fn build_summarizer(args: &EngineArgs) -> Result<Summarizer> {
    let engine = match args.provider.as_deref().map(str::trim) {
        Some(p) if p.eq_ignore_ascii_case("mock") => EngineSelection::Mock,
        Some(p) if !p.is_empty() => {
            let name = p.to_lowercase();
            let model = args
                .model
                .clone()
                .unwrap_or_else(|| default_model_for(&name).to_string());
            EngineSelection::Provider { name, model }
        }
        _ => SummarizerConfig::from_env().engine,
    };

    let mut builder = SummarizerConfig::builder()
        .engine(engine)
        .temperature(args.temperature)
        .max_tokens(args.max_tokens)
        .max_retries(args.max_retries)
        .api_timeout_secs(args.api_timeout)
        .download_timeout_secs(args.download_timeout);
    if let Some(ref pwd) = args.password {
        builder = builder.password(pwd.clone());
    }

    let config = builder.build().context("Invalid configuration")?;
    Summarizer::new(config).context("Failed to initialise summarisation engine")
}

/// Write an export to `output`, or to its default filename in the current
/// directory.
async fn write_file(file: &ExportedFile, output: Option<&Path>, quiet: bool) -> Result<()> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&file.filename));
    write_exported(file, &path)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    if !quiet {
        eprintln!(
            "{}  {}  {}",
            green("✔"),
            bold(&path.display().to_string()),
            dim(&format!("{} bytes, {}", file.bytes.len(), file.content_type)),
        );
    }
    Ok(())
}

fn print_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

