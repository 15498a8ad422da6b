use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use ff::config::Config;
use ff::display::{self, Highlight};
use ff::walk::{self, ListingPolicy};
use ff::{CaseMatching, FolderMatcher};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const COMMIT: &str = match option_env!("FF_COMMIT") {
    Some(commit) => commit,
    None => "no-commit",
};
const DATE: &str = match option_env!("FF_BUILD_DATE") {
    Some(date) => date,
    None => "now",
};

/// find folders that match the given fuzzy search pattern
#[derive(Parser, Debug)]
#[command(name = "ff", disable_version_flag = true)]
struct Args {
    /// Fuzzy search pattern
    search: Option<String>,

    /// config file (default is $HOME/.ff/config.toml, then /etc/ff/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// print only first element
    #[arg(short, long)]
    first_only: bool,

    /// print search details
    #[arg(short, long)]
    verbose: bool,

    /// print version details
    #[arg(long)]
    version: bool,

    /// how letter case is compared
    #[arg(long, value_enum, default_value_t = Case::Ignore)]
    case: Case,

    /// fail if a search path can't be listed instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Case {
    Ignore,
    Smart,
    Respect,
}

impl From<Case> for CaseMatching {
    fn from(case: Case) -> Self {
        match case {
            Case::Ignore => CaseMatching::Ignore,
            Case::Smart => CaseMatching::Smart,
            Case::Respect => CaseMatching::Respect,
        }
    }
}

/// Level used when `RUST_LOG` is unset. Everything `--verbose` prints is logged at `info`.
fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level(verbose).into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.version {
        println!("version {VERSION}, build from commit {COMMIT} at {DATE}");
        return Ok(());
    }

    init_tracing(args.verbose);

    let Some(search) = args.search.as_deref() else {
        bail!("no search given");
    };
    tracing::info!("searching for: {search}");

    let config = Config::load(args.config.as_deref()).context("failed to load config")?;
    if let Some(source) = &config.source {
        tracing::info!("using config file: {}", source.display());
    }
    tracing::info!("search base paths: {:?}", config.paths);

    let policy = if args.strict {
        ListingPolicy::Strict
    } else {
        ListingPolicy::Skip
    };
    let folders = walk::sub_dirs(&config.paths, policy).context("failed to list folders")?;
    tracing::info!("{} folders in search paths", folders.len());
    for folder in &folders {
        tracing::info!("{folder}");
    }

    let matcher = FolderMatcher::default().case(args.case.into());
    let results = matcher.rank(search, &folders);
    tracing::info!("{} results", results.len());

    let mut stdout = io::stdout().lock();
    display::print_results(&mut stdout, &results, args.first_only, Highlight::detect())?;
    stdout.flush()?;

    Ok(())
}
