//! CLI binary for edgequake-content-analyzer.
//!
//! A thin shim over the library crate: `serve` runs the HTTP endpoint,
//! `analyze` plays the client role for one local file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edgequake_content_analyzer::{
    analyze_file, server, AnalysisResult, AnalyzerConfig, AnalyzerError,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse a flyer image
  content-analyzer analyze flyer.png

  # Analyse a PDF and print JSON
  content-analyzer analyze brochure.pdf --json

  # Run the HTTP endpoint
  content-analyzer serve --host 0.0.0.0 --port 8787

  # Call the endpoint
  curl -X POST localhost:8787/analyze-content \
       -H 'content-type: application/json' \
       -d '{"file":"data:image/png;base64,...","fileType":"image/png","fileName":"a.png"}'

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY               API key, read on every request
  CONTENT_ANALYZER_MODEL       Override model ID
  CONTENT_ANALYZER_BASE_URL    OpenAI-compatible base URL
  RUST_LOG                     Log filter (overrides -v / -q)
"#;

/// Extract text from PDFs and images and score it for engagement.
#[derive(Parser, Debug)]
#[command(
    name = "content-analyzer",
    version,
    about = "Extract text from PDFs and images with a vision LLM and score it for engagement",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Chat model ID used for extraction and analysis.
    #[arg(long, global = true, env = "CONTENT_ANALYZER_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible API base URL.
    #[arg(long, global = true, env = "CONTENT_ANALYZER_BASE_URL")]
    base_url: Option<String>,

    /// Per-call timeout in seconds.
    #[arg(long, global = true, env = "CONTENT_ANALYZER_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Max output tokens per call.
    #[arg(long, global = true, env = "CONTENT_ANALYZER_MAX_TOKENS")]
    max_tokens: Option<u32>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, global = true, env = "CONTENT_ANALYZER_TEMPERATURE")]
    temperature: Option<f32>,

    /// Largest accepted upload in bytes.
    #[arg(long, global = true, env = "CONTENT_ANALYZER_MAX_UPLOAD", default_value_t = 20 * 1024 * 1024)]
    max_upload_bytes: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CONTENT_ANALYZER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "CONTENT_ANALYZER_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP analysis endpoint.
    Serve {
        /// Address to bind.
        #[arg(long, env = "CONTENT_ANALYZER_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind.
        #[arg(short, long, env = "CONTENT_ANALYZER_PORT", default_value_t = 8787)]
        port: u16,
    },

    /// Analyse one local PDF or image.
    Analyze {
        /// Path to a PDF or image file.
        file: PathBuf,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,

        /// Disable the spinner.
        #[arg(long, env = "CONTENT_ANALYZER_NO_PROGRESS")]
        no_progress: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback an interactive `analyze` needs, so
    // library INFO logs are hidden while it runs.
    let spinner_active = matches!(
        cli.command,
        Command::Analyze { json: false, no_progress: false, .. }
    ) && !cli.quiet;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || spinner_active {
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

    let config = build_config(&cli)?;

    match cli.command {
        Command::Serve { ref host, port } => {
            if !cli.quiet && config.resolve_api_key().is_err() {
                eprintln!(
                    "{} {} is not set; requests will fail until it is exported",
                    cyan("⚠"),
                    config.api_key_env
                );
            }
            server::serve(config, host, port)
                .await
                .context("Server failed")?;
        }
        Command::Analyze {
            ref file,
            json,
            no_progress,
        } => {
            let show_progress = !cli.quiet && !no_progress && !json;
            run_analyze(file, &config, json, show_progress).await?;
        }
    }

    Ok(())
}

/// Read, validate and analyse one file, then print the result.
async fn run_analyze(
    path: &Path,
    config: &AnalyzerConfig,
    json: bool,
    show_progress: bool,
) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let progress = show_progress.then(|| spinner(&name));

    // Unsupported files are rejected by `analyze_file` before any call is made.
    let outcome = analyze_file(path, config).await;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e @ AnalyzerError::InvalidFileType { .. }) => {
            eprintln!("{} {}", red("✘"), e);
            anyhow::bail!("Please upload a PDF or image file");
        }
        Err(e) => return Err(e).context("Analysis failed"),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
    } else {
        print_result(&name, &result);
    }
    Ok(())
}

fn spinner(name: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Analyzing");
    bar.set_message(format!("{name}: extracting text and scoring…"));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_result(name: &str, result: &AnalysisResult) {
    let score = result.engagement.score;
    let badge = if score >= 80 {
        green(&score.to_string())
    } else if score >= 50 {
        cyan(&score.to_string())
    } else {
        red(&score.to_string())
    };

    println!("{} {}  engagement {}/100", green("✔"), bold(name), badge);

    print_list("Titles", &result.titles);
    if !result.hashtags.is_empty() {
        println!("\n{}\n  {}", bold("Hashtags"), result.hashtags.join(" "));
    }
    print_list("Suggestions", &result.suggestions);
    print_list("Improvements", &result.engagement.improvements);

    println!("\n{}", bold("Extracted text"));
    for line in result.extracted_text.lines() {
        println!("  {}", dim(line));
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", bold(title));
    for item in items {
        println!("  • {item}");
    }
}

/// Map CLI args to `AnalyzerConfig`.
fn build_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut builder = AnalyzerConfig::builder()
        .api_timeout_secs(cli.api_timeout)
        .max_upload_bytes(cli.max_upload_bytes);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url);
    }
    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }

    builder.build().context("Invalid configuration")
}
