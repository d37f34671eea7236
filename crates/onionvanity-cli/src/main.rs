//! OnionVanity CLI
//!
//! Onion v3 vanity hostname generator.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use onionvanity_core::{
    estimate_time_50pct, format_difficulty, format_duration, parse_documents, FilterConfig,
    FilterSet, Filters, Layout, LoadSummary, PackedInt, SearchConfig, SearchMode, SearchResult,
    VanitySearch, DEFAULT_EXPANSION_LIMIT,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "onionvanity")]
#[command(author = "OnionVanity Team")]
#[command(version = "0.1.0")]
#[command(about = "Onion v3 vanity hostname generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for keys whose hostname starts with one of the filters
    Generate {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of threads (0 = auto)
        #[arg(long, default_value = "0")]
        threads: usize,

        /// Stop after this many matches (0 = unlimited)
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Maximum attempts (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_attempts: u64,

        /// Maximum time in seconds (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_time: u64,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output each key as a YAML document with Tor key files
        #[arg(long)]
        yaml: bool,

        /// Also write a Tor key directory per key under this directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Load and prepare filters, then list them with the expected difficulty
    Filters {
        #[command(flatten)]
        filters: FilterArgs,

        /// Key rate used for the time estimate, in keys per second
        #[arg(long, default_value = "100000")]
        rate: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create Tor key directories from YAML key documents
    Import {
        /// YAML input (stdin when omitted)
        input: Option<PathBuf>,

        /// Directory to create the key directories in
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Only import the key for this hostname
        #[arg(long)]
        hostname: Option<String>,
    },

    /// Run benchmark
    Benchmark {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,

        /// Number of threads (0 = auto)
        #[arg(long, default_value = "0")]
        threads: usize,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Hostname prefixes (base32: a-z, 2-7), optionally starting with `^`
    filters: Vec<String>,

    /// Read filters from a file, one per line (`#` and `//` start comments)
    #[arg(short = 'f', long = "file")]
    files: Vec<PathBuf>,

    /// Record layout
    #[arg(long, value_enum, default_value = "unified")]
    layout: LayoutArg,

    /// Search strategy
    #[arg(long, value_enum, default_value = "binary")]
    search: SearchArg,

    /// Width in bits of the packed layouts
    #[arg(long, value_enum, default_value = "64")]
    width: WidthArg,

    /// Remove filters already covered by a shorter one
    #[arg(long)]
    dedup: bool,

    /// Most records mask unification may create
    #[arg(long, default_value_t = DEFAULT_EXPANSION_LIMIT)]
    expansion_limit: usize,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

impl FilterArgs {
    fn config(&self) -> FilterConfig {
        FilterConfig {
            layout: self.layout.into(),
            search: self.search.into(),
            quiet: self.quiet,
            dedup: self.dedup,
            expansion_limit: self.expansion_limit,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Bytes,
    Masked,
    Unified,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Bytes => Layout::Bytes,
            LayoutArg::Masked => Layout::Masked,
            LayoutArg::Unified => Layout::Unified,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchArg {
    Linear,
    Binary,
}

impl From<SearchArg> for SearchMode {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::Linear => SearchMode::Linear,
            SearchArg::Binary => SearchMode::Binary,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum WidthArg {
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
    #[value(name = "128")]
    W128,
}

impl WidthArg {
    fn bits(self) -> u32 {
        match self {
            WidthArg::W32 => 32,
            WidthArg::W64 => 64,
            WidthArg::W128 => 128,
        }
    }
}

struct RunArgs {
    threads: usize,
    count: usize,
    max_attempts: u64,
    max_time: u64,
    output: Output,
    dir: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Output {
    Text,
    Json,
    Yaml,
}

#[derive(Serialize)]
struct FilterReport {
    layout: Layout,
    search: SearchMode,
    width: u32,
    records: usize,
    flattened: bool,
    expected_attempts: f64,
    estimated_secs_50pct: f64,
    loaded: LoadSummary,
    prefixes: Vec<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            filters,
            threads,
            count,
            max_attempts,
            max_time,
            json,
            yaml,
            dir,
        } => {
            let output = if json {
                Output::Json
            } else if yaml {
                Output::Yaml
            } else {
                Output::Text
            };
            let run = RunArgs {
                threads,
                count,
                max_attempts,
                max_time,
                output,
                dir,
            };
            match filters.width {
                WidthArg::W32 => cmd_generate::<u32>(&filters, &run)?,
                WidthArg::W64 => cmd_generate::<u64>(&filters, &run)?,
                WidthArg::W128 => cmd_generate::<u128>(&filters, &run)?,
            }
        }
        Commands::Filters {
            filters,
            rate,
            json,
        } => match filters.width {
            WidthArg::W32 => cmd_filters::<u32>(&filters, rate, json)?,
            WidthArg::W64 => cmd_filters::<u64>(&filters, rate, json)?,
            WidthArg::W128 => cmd_filters::<u128>(&filters, rate, json)?,
        },
        Commands::Import {
            input,
            dir,
            hostname,
        } => cmd_import(input.as_deref(), &dir, hostname.as_deref())?,
        Commands::Benchmark { duration, threads } => {
            cmd_benchmark(duration, threads)?;
        }
    }

    Ok(())
}

/// Collect filters from arguments and files, then prepare them
fn load_filters<I: PackedInt>(args: &FilterArgs) -> Result<(Filters<I>, LoadSummary)> {
    let mut set = FilterSet::<I>::new(args.config());

    let mut summary = set.add_all(args.filters.iter().map(String::as_str));
    for path in &args.files {
        let loaded = set.load_file(path)?;
        summary.accepted += loaded.accepted;
        summary.ignored += loaded.ignored;
        summary.rejected += loaded.rejected;
    }

    if set.is_flattened() && !args.quiet {
        info!(records = set.len(), "filters expanded to a shared mask");
    }
    Ok((set.prepare(), summary))
}

fn cmd_generate<I: PackedInt>(args: &FilterArgs, run: &RunArgs) -> Result<()> {
    let (filters, _) = load_filters::<I>(args)?;
    if filters.is_empty() {
        return Err(anyhow::anyhow!("No usable filters given"));
    }

    let quiet = args.quiet || run.output == Output::Json;
    if !quiet {
        eprintln!("OnionVanity v0.1.0");
        filters.print();
        eprintln!(
            "Threads: {}",
            if run.threads == 0 { num_cpus::get() } else { run.threads }
        );
    }

    let config = SearchConfig {
        threads: run.threads,
        batch_size: 1000,
        max_attempts: run.max_attempts,
        max_time_secs: run.max_time,
        max_results: run.count,
        quiet,
    };
    let search = VanitySearch::new(filters, config);

    if !quiet {
        eprintln!("Difficulty: {}", format_difficulty(search.difficulty()));
        eprintln!();
    }

    let results = search.run()?;

    if let Some(root) = &run.dir {
        for result in &results {
            let path = result.keys.write_dir(root)?;
            info!(path = %path.display(), "wrote key directory");
        }
    }

    match run.output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        Output::Yaml => {
            for result in &results {
                print!("{}", result.keys.to_yaml());
            }
        }
        Output::Text if results.is_empty() => eprintln!("No match found within limits."),
        Output::Text => {
            for result in &results {
                print_result(result);
            }
        }
    }

    Ok(())
}

fn cmd_import(input: Option<&Path>, root: &Path, hostname: Option<&str>) -> Result<()> {
    let documents = match input {
        Some(path) => parse_documents(BufReader::new(File::open(path)?))?,
        None => parse_documents(io::stdin().lock())?,
    };

    let mut written = 0;
    for document in &documents {
        if hostname.is_some_and(|wanted| wanted != document.hostname) {
            continue;
        }
        let path = document.write_dir(root)?;
        println!("{}", path.display());
        written += 1;
    }

    if let Some(wanted) = hostname {
        if written == 0 {
            return Err(anyhow::anyhow!("Hostname {} not found in input", wanted));
        }
    }
    info!(keys = written, "imported key documents");
    Ok(())
}

fn cmd_filters<I: PackedInt>(args: &FilterArgs, rate: f64, json: bool) -> Result<()> {
    let (filters, loaded) = load_filters::<I>(args)?;
    let difficulty = filters.expected_attempts();
    let eta = estimate_time_50pct(difficulty, rate);

    if json {
        let report = FilterReport {
            layout: filters.layout(),
            search: filters.search_mode(),
            width: args.width.bits(),
            records: filters.len(),
            flattened: filters.is_flattened(),
            expected_attempts: difficulty,
            estimated_secs_50pct: eta,
            loaded,
            prefixes: (0..filters.len()).filter_map(|i| filters.prefix(i)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", filters.describe());
    println!("{:-<60}", "");
    println!("Layout:      {} / {} search", filters.layout(), filters.search_mode());
    if let Some(mask) = filters.global_mask() {
        println!("Shared mask: {:?}", mask);
    }
    println!("Flattened:   {}", filters.is_flattened());
    println!(
        "Loaded:      {} accepted, {} ignored, {} rejected",
        loaded.accepted, loaded.ignored, loaded.rejected
    );
    println!("Difficulty:  {}", format_difficulty(difficulty));
    println!("50% in:      {} at {:.0} keys/s", format_duration(eta), rate);

    Ok(())
}

fn cmd_benchmark(duration_secs: u64, threads: usize) -> Result<()> {
    eprintln!("Benchmarking key generation for {} seconds...", duration_secs);
    eprintln!(
        "Threads: {}",
        if threads == 0 { num_cpus::get() } else { threads }
    );
    eprintln!();

    // An empty filter set never matches, so the search runs until the timeout
    let filters = FilterSet::<u64>::new(FilterConfig {
        quiet: true,
        ..FilterConfig::default()
    })
    .prepare();

    let config = SearchConfig {
        threads,
        batch_size: 1000,
        max_attempts: 0,
        max_time_secs: duration_secs.max(1),
        max_results: 0,
        quiet: true,
    };
    let search = VanitySearch::new(filters, config);

    let mut keys = 0;
    let mut rate = 0.0;
    search.run_with_callback(|stats| {
        eprint!("\r{}", stats.format(f64::INFINITY));
        keys = stats.total_keys();
        rate = stats.keys_per_second();
    })?;

    eprintln!();
    eprintln!(
        "Benchmark complete: {} keys, {:.2} Mkey/s",
        keys,
        rate / 1_000_000.0
    );

    Ok(())
}

fn print_result(result: &SearchResult) {
    println!();
    println!("MATCH FOUND ({})", result.filter);
    println!("{:-<60}", "");
    println!("Hostname:    {}", result.hostname);
    println!("Secret Key:  {}", result.secret_key_hex);
    println!("Public Key:  {}", result.public_key_hex);
    println!("{:-<60}", "");
    println!("Keys Tested: {}", result.keys_tested);
    println!("Time:        {:.2}s", result.time_secs);
    println!("Speed:       {:.2} Mkey/s", result.keys_per_second / 1_000_000.0);
}
