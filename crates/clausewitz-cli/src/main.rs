//! `clausewitz` CLI: parse, check, and normalize Clausewitz mod scripts.
//!
//! ## Usage
//!
//! ```sh
//! # Parse one script to pretty-printed JSON
//! clausewitz parse common/disasters/civil_war.txt
//!
//! # Parse every file in a directory (keyed by path), descending into subdirectories
//! clausewitz parse -r events/ -o events.json
//!
//! # Strip AI weighting blocks before printing
//! clausewitz parse --filter ai_will_do,option.ai_chance events/flavor.txt
//!
//! # Fail on `key = { a b c }` list blocks instead of dropping them
//! clausewitz parse --strict-lists common/ideas/00_basic_ideas.txt
//!
//! # Validate a whole mod tree; exits non-zero if any file is malformed
//! clausewitz check -r common/
//!
//! # Show the normalized token text (stdin → stdout)
//! cat script.txt | clausewitz normalize
//! ```

mod files;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clausewitz_core::{ListPolicy, ParseOptions, DEFAULT_MAX_DEPTH};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "clausewitz",
    version,
    about = "Parse Clausewitz (Paradox) mod scripts into JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log parser activity to stderr (otherwise controlled by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Input selection and parser settings shared by `parse` and `check`.
#[derive(Args)]
struct ParseArgs {
    /// Script files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Include files in subdirectories of directory inputs
    #[arg(short, long)]
    recursive: bool,
    /// Fail on bare-value list blocks instead of dropping them
    #[arg(long)]
    strict_lists: bool,
    /// Maximum block nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        let policy = if self.strict_lists {
            ListPolicy::Reject
        } else {
            ListPolicy::Discard
        };
        ParseOptions::default()
            .with_max_depth(self.max_depth)
            .with_list_policy(policy)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse scripts and print them as JSON
    Parse {
        #[command(flatten)]
        args: ParseArgs,
        /// Comma-separated key patterns to strip (e.g. `ai_will_do,*.ai_chance`)
        #[arg(long)]
        filter: Option<String>,
        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse scripts and report which ones are malformed
    Check {
        #[command(flatten)]
        args: ParseArgs,
    },
    /// Print the normalized token text of a script
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse {
            args,
            filter,
            compact,
            output,
        } => {
            let options = args.options();
            let patterns = build_filter_patterns(filter.as_deref());
            let pattern_refs: Vec<&str> = patterns.iter().map(String::as_str).collect();
            let inputs = files::collect_inputs(&args.paths, args.recursive)?;

            let single_file = args.paths.len() == 1 && !args.paths[0].is_dir();
            let value = if single_file {
                let doc = parse_file(&inputs[0], &options)?;
                serde_json::to_value(clausewitz_core::filter_keys(&doc, &pattern_refs))?
            } else {
                let mut by_path = serde_json::Map::new();
                for path in &inputs {
                    let doc = parse_file(path, &options)?;
                    let filtered = clausewitz_core::filter_keys(&doc, &pattern_refs);
                    by_path.insert(path.display().to_string(), serde_json::to_value(filtered)?);
                }
                serde_json::Value::Object(by_path)
            };

            let mut rendered = if compact {
                serde_json::to_string(&value)?
            } else {
                serde_json::to_string_pretty(&value)?
            };
            rendered.push('\n');
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check { args } => {
            let options = args.options();
            let inputs = files::collect_inputs(&args.paths, args.recursive)?;
            let mut failed = 0usize;
            for path in &inputs {
                match parse_file(path, &options) {
                    Ok(_) => println!("{}: ok", path.display()),
                    Err(err) => {
                        failed += 1;
                        println!("{}: {:#}", path.display(), err);
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{} of {} files failed to parse", failed, inputs.len());
            }
        }
        Commands::Normalize { input, output } => {
            let lines = read_input(input.as_deref())?;
            let text =
                clausewitz_core::normalize(&lines).context("Failed to normalize script")?;
            write_output(output.as_deref(), &format!("{}\n", text))?;
        }
    }

    Ok(())
}

/// Install a stderr log subscriber. `--verbose` forces `debug`; otherwise
/// `RUST_LOG` applies, defaulting to `warn`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_file(path: &Path, options: &ParseOptions) -> Result<clausewitz_core::Object> {
    info!(path = %path.display(), "parsing script");
    let lines = files::read_lines(path)?;
    let doc = clausewitz_core::parse_with(&lines, options)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), keys = doc.len(), "parsed script");
    Ok(doc)
}

/// Split `--filter a,b.c` into patterns, ignoring empty entries.
fn build_filter_patterns(filter: Option<&str>) -> Vec<String> {
    filter
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn read_input(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) => files::read_lines(path),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf.lines().map(str::to_string).collect())
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
