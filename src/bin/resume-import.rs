//! CLI binary for resume-import.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ImportConfig`, renders progress on a spinner and prints the imported
//! resume text.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resume_import::{
    CredentialProvider, ImportConfig, ImportOutcome, ImportPipeline, ImportRequest, ImportSink,
    MemoryCredentials, NoCredentials,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
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

// ── Terminal sink ────────────────────────────────────────────────────────────

/// Holds the caller-side state for one CLI run and mirrors progress
/// notifications onto a spinner.
struct CliSink {
    bar: Option<ProgressBar>,
    resume_text: Mutex<String>,
    import_error: Mutex<String>,
}

impl CliSink {
    fn new(show_progress: bool) -> Self {
        let bar = show_progress.then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.set_prefix("Importing");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Self {
            bar,
            resume_text: Mutex::new(String::new()),
            import_error: Mutex::new(String::new()),
        }
    }

    fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ImportSink for CliSink {
    fn set_resume_text(&self, text: &str) {
        *self.resume_text.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
    }

    fn set_import_error(&self, message: &str) {
        *self.import_error.lock().unwrap_or_else(PoisonError::into_inner) = message.to_string();
    }

    fn set_import_name(&self, name: &str) {
        if let Some(ref bar) = self.bar {
            bar.println(format!("{} Imported: {}", dim("◆"), bold(name)));
        }
    }

    fn on_progress(&self, message: &str) {
        self.set_import_error(message);
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Import a resume (text to stdout)
  resume-import resume.pdf

  # Write the text to a file
  resume-import resume.pdf -o resume.txt

  # Use a specific parse service and stored credentials
  resume-import --api-base https://api.example.com --credentials storage.json resume.pdf

  # Show which route a file would take, without importing it
  resume-import --classify-only RESUME.PDF --case-insensitive

  # JSON outcome
  resume-import --json resume.md

ROUTES:
  text/plain, *.txt, *.md     decoded directly
  application/pdf, *.pdf      parsed locally when ≤ --max-local-bytes,
                              uploaded to {api-base}/api/resumes/parse otherwise
                              or when local parsing fails
  anything else               rejected

CREDENTIALS:
  --credentials points at a JSON object of slot names to tokens. Slots are
  checked in order: token, authToken, accessToken, jwt. The first non-empty
  value is sent as `Authorization: Bearer <token>`.

ENVIRONMENT VARIABLES:
  RESUME_IMPORT_API_BASE      Parse service base address (default http://localhost:8081)
  RESUME_IMPORT_CREDENTIALS   Credential file path
  PDFIUM_LIB_PATH             Path to an existing libpdfium
"#;

/// Import resume text from plain-text or PDF files.
#[derive(Parser, Debug)]
#[command(
    name = "resume-import",
    version,
    about = "Import resume text from plain-text or PDF files",
    long_about = "Import resume text from a .txt, .md or .pdf file. PDFs are parsed locally \
with PDFium when small enough; otherwise, or when local parsing fails, they are uploaded \
to the resume parse service.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// File to import.
    input: PathBuf,

    /// Write the resume text to this file instead of stdout.
    #[arg(short, long, env = "RESUME_IMPORT_OUTPUT")]
    output: Option<PathBuf>,

    /// Base address of the resume parse service.
    #[arg(long, env = "RESUME_IMPORT_API_BASE")]
    api_base: Option<String>,

    /// JSON file of credential slots (token, authToken, accessToken, jwt).
    #[arg(long, env = "RESUME_IMPORT_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Override the declared MIME type (default: guessed from the extension).
    #[arg(long = "type", value_name = "MIME")]
    declared_type: Option<String>,

    /// Largest PDF parsed locally, in bytes.
    #[arg(long, env = "RESUME_IMPORT_MAX_LOCAL_BYTES", default_value_t = 5 * 1024 * 1024)]
    max_local_bytes: u64,

    /// Match .txt/.md/.pdf and MIME types regardless of case.
    #[arg(long, env = "RESUME_IMPORT_CASE_INSENSITIVE")]
    case_insensitive: bool,

    /// Upload timeout in seconds (default: no explicit timeout).
    #[arg(long, env = "RESUME_IMPORT_TIMEOUT")]
    timeout: Option<u64>,

    /// Print the outcome as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Print the route the file would take and exit.
    #[arg(long)]
    classify_only: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "RESUME_IMPORT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RESUME_IMPORT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "RESUME_IMPORT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already shows what is happening; keep library logs quiet
    // unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.classify_only;
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

    let config = build_config(&cli)?;
    let pipeline = ImportPipeline::new(config).context("Failed to initialise import pipeline")?;

    let mut request = ImportRequest::from_path(&cli.input).await;
    if let Some(ref mime) = cli.declared_type {
        request = request.with_declared_type(mime.clone());
    }

    // ── Classify-only mode ───────────────────────────────────────────────
    if cli.classify_only {
        let decision = pipeline.classify(&request);
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "name": request.name,
                    "declared_type": request.declared_type,
                    "size_bytes": request.size_bytes,
                    "route": decision,
                })
            );
        } else {
            println!("File:           {}", request.name);
            println!("Declared type:  {}", request.declared_type);
            match request.size_bytes {
                Some(n) => println!("Size:           {} bytes", n),
                None => println!("Size:           unknown"),
            }
            println!("Route:          {:?}", decision);
        }
        return Ok(());
    }

    // ── Run import ───────────────────────────────────────────────────────
    let sink = CliSink::new(show_progress);
    let outcome = pipeline.import(&request, &sink).await;
    sink.finish();

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialise outcome")?
        );
        if !outcome.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let text = match outcome {
        ImportOutcome::Success { text } => text,
        ImportOutcome::Failure { message } => {
            if !cli.quiet {
                eprintln!("{} {}", red("✘"), message);
            }
            anyhow::bail!("Import of '{}' failed", request.name);
        }
    };

    if let Some(ref output_path) = cli.output {
        tokio::fs::write(output_path, &text)
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{}  {} chars  →  {}",
                green("✔"),
                text.chars().count(),
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}

/// Map CLI args to `ImportConfig`.
fn build_config(cli: &Cli) -> Result<ImportConfig> {
    let credentials: Arc<dyn CredentialProvider> = match cli.credentials {
        Some(ref path) => Arc::new(
            MemoryCredentials::from_json_file(path).context("Failed to load credentials")?,
        ),
        None => Arc::new(NoCredentials),
    };

    let mut builder = ImportConfig::builder()
        .base_address(resume_import::config::base_address_from(cli.api_base.clone()))
        .credentials(credentials)
        .local_parse_max_bytes(cli.max_local_bytes)
        .case_insensitive_suffixes(cli.case_insensitive);

    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }

    builder.build().context("Invalid configuration")
}
