//! swiftpub CLI
//!
//! Prints the token stream or the public interface of Swift sources, and
//! scans whole project trees for their exported API.

mod logging;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use swiftpub_core::{
    extract_file, format_output, format_tokens, tokenize_file, visit_tokens, ExtractConfig,
    InterfaceScanner, OutputFormat, ScanConfig,
};

/// Public API surface extraction for Swift sources
#[derive(Parser)]
#[command(name = "swiftpub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Public API surface extraction for Swift sources")]
#[command(long_about = r#"
swiftpub: Public API Surface Extraction for Swift

Reads Swift source as a token stream and reconstructs the declarations a
module exports. Only `public` and `open` declarations are kept; bodies and
less visible members are dropped.

Examples:
  swiftpub interface Sources/App/Foo.swift   # Public interface of one file
  swiftpub tokens Sources/App/Foo.swift      # Token dump, one token per line
  swiftpub scan . --format ansi              # Every Swift file under .
  swiftpub scan Sources --format json -o api.json
"#)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Tolerate `/` (regex literals, division) inside skipped bodies.
    ///
    /// Matches the older tool, which ignored tokenizer failures while
    /// skipping a body. Without this flag such a body fails extraction.
    #[arg(long, global = true)]
    pub lenient: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Print every token of a file with its kind
    Tokens {
        /// Path to source file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Text)]
        format: OutputFormatArg,
    },

    /// Print the public interface of a file
    Interface {
        /// Path to source file
        file: PathBuf,
    },

    /// Extract the public interface of every source under a directory
    Scan {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Text)]
        format: OutputFormatArg,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ignore patterns (can be specified multiple times)
        #[arg(long, action = ArgAction::Append)]
        ignore: Vec<String>,

        /// Additional gitignore-style file
        #[arg(long)]
        ignore_file: Option<PathBuf>,

        /// Include hidden files and directories
        #[arg(long)]
        hidden: bool,

        /// Number of threads for parallel processing (default: auto)
        #[arg(long)]
        threads: Option<usize>,
    },
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormatArg {
    Text,
    Json,
    Yaml,
    Ansi,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Ansi => OutputFormat::Ansi,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

fn main() {
    // Usage errors exit with 1, help and version with 0
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    logging::init(args.verbose);

    if let Err(err) = run(&args) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let extract = ExtractConfig::new().with_lenient_bodies(args.lenient);

    match &args.command {
        Commands::Tokens { file, format } => run_tokens(file, *format, &extract),
        Commands::Interface { file } => run_interface(file, &extract),
        Commands::Scan {
            path,
            format,
            output,
            ignore,
            ignore_file,
            hidden,
            threads,
        } => {
            let mut config = ScanConfig::new(path.clone())
                .with_ignore_patterns(ignore.clone())
                .with_include_hidden(*hidden)
                .with_extract(extract);

            if let Some(threads) = threads {
                config = config.with_threads(*threads);
            }
            if let Some(ignore_file) = ignore_file {
                config = config.with_ignore_file(ignore_file.clone());
            }

            run_scan(config, *format, output.as_deref(), args.verbose > 0)
        }
    }
}

fn run_tokens(file: &Path, format: OutputFormatArg, config: &ExtractConfig) -> Result<()> {
    if let OutputFormatArg::Text = format {
        return stream_tokens(file, config);
    }

    let tokens = tokenize_file(file, config)
        .with_context(|| format!("Failed to tokenize {}", file.display()))?;

    let output = format_tokens(&tokens, format.into())?;
    write_output(&output, None)
}

/// Print tokens as they are read, so a lexing failure still shows every
/// token before it
fn stream_tokens(file: &Path, config: &ExtractConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_result: io::Result<()> = Ok(());

    let lexed = visit_tokens(file, config, |record| {
        if write_result.is_ok() {
            write_result = writeln!(out, "{}", record.display());
        }
    });
    out.flush().context("Failed to write tokens")?;
    write_result.context("Failed to write tokens")?;

    lexed.with_context(|| format!("Failed to tokenize {}", file.display()))?;
    Ok(())
}

fn run_interface(file: &Path, config: &ExtractConfig) -> Result<()> {
    let interface = extract_file(file, config)
        .with_context(|| format!("Failed to extract interface of {}", file.display()))?;

    write_output(&interface.text, None)
}

fn run_scan(
    config: ScanConfig,
    format: OutputFormatArg,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    // Show progress spinner
    let spinner = if verbose && atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Scanning sources...");
        Some(pb)
    } else {
        None
    };

    let scanner = InterfaceScanner::new(config).context("Failed to create scanner")?;
    let result = scanner.scan().context("Failed to scan directory")?;

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!(
            "Scanned {} files in {}ms",
            result.stats.total_files + result.stats.failed_files,
            result.metadata.scan_duration_ms
        ));
    }

    tracing::info!(
        files = result.stats.total_files,
        failed = result.stats.failed_files,
        exporting = result.stats.files_with_public_api,
        "scan complete"
    );

    let rendered = format_output(&result, format.into())?;
    write_output(&rendered, output)?;

    if result.has_failures() {
        anyhow::bail!("{} file(s) failed extraction", result.stats.failed_files);
    }

    Ok(())
}

fn write_output(output: &str, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, output).context("Failed to write output file")?;
    } else {
        println!("{}", output);
    }
    Ok(())
}
