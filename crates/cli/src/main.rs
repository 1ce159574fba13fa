//! Cache coherence simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Single run:** Replay a generated or file-based workload under MESI or MOESI.
//! 2. **Comparison:** Replay one workload under both protocols from the same initial memory.
//! 3. **Results view:** Print a previously written results file as a table.

use std::path::{Path, PathBuf};
use std::process;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use cohsim_core::config::Config;
use cohsim_core::protocol::ProtocolKind;
use cohsim_core::sim::{
    ResultRecord, RunSummary, Simulator, Workload, WorkloadGenerator, compare, persist_results,
    read_results, resolve_seed,
};
use cohsim_core::stats::STATS_SECTIONS;
use cohsim_core::{Metrics, SimError};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "COHSIM_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "cohsim",
    author,
    version,
    about = "MESI/MOESI cache coherence bus simulator",
    long_about = "Replay read/write workloads on a shared bus and report cache hit and miss rates.\n\nExamples:\n  cohsim run --protocol MOESI -n 500 --seed 7\n  cohsim run --workload trace.txt --dump-state --sections memory\n  cohsim compare --seed 1 --results results.txt\n  cohsim results results.txt"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a workload under one protocol.
    Run {
        /// Protocol literal, `MESI` or `MOESI` (anything else runs MESI).
        #[arg(short, long)]
        protocol: Option<String>,

        #[command(flatten)]
        opts: SimArgs,
    },

    /// Run the same workload under MESI and MOESI.
    Compare {
        #[command(flatten)]
        opts: SimArgs,
    },

    /// Print a results file as a table.
    Results {
        /// Results file written by `run` or `compare`.
        path: PathBuf,
    },
}

/// Options shared by `run` and `compare`. Flags override the JSON config.
#[derive(Args, Debug)]
struct SimArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of processors.
    #[arg(long)]
    processors: Option<usize>,

    /// Shared memory size in words.
    #[arg(long)]
    memory: Option<usize>,

    /// Number of instructions to generate.
    #[arg(short = 'n', long)]
    instructions: Option<usize>,

    /// Seed for the generator and initial memory.
    #[arg(long)]
    seed: Option<u64>,

    /// Chance (percent) that a generated instruction reuses the current address.
    #[arg(long)]
    locality: Option<u8>,

    /// Group instructions by address before running.
    #[arg(long)]
    reorder: bool,

    /// Load the workload from a file instead of generating it.
    #[arg(short, long)]
    workload: Option<PathBuf>,

    /// Write `key value` result lines to this file.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Log every instruction (debug level).
    #[arg(long)]
    trace: bool,

    /// Print the bus state after the run.
    #[arg(long)]
    dump_state: bool,

    /// Print the miss rate after every instruction.
    #[arg(long)]
    history: bool,

    /// Statistics sections to print, comma separated (all when omitted).
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
    )]
    sections: Vec<String>,
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn main() {
    let cli = Cli::parse();
    let trace = match &cli.command {
        Commands::Run { opts, .. } | Commands::Compare { opts } => opts.trace,
        Commands::Results { .. } => false,
    };
    let handle = init_tracing(trace);

    let result = match cli.command {
        Commands::Run { protocol, opts } => cmd_run(protocol.as_deref(), &opts, &handle),
        Commands::Compare { opts } => cmd_compare(&opts, &handle),
        Commands::Results { path } => cmd_results(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Installs the stderr subscriber. `COHSIM_LOG` wins over `--trace`.
fn init_tracing(trace: bool) -> FilterHandle {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if trace { "debug" } else { "info" }));
    let (filter, handle) = reload::Layer::new(filter);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
    handle
}

/// Builds the configuration from the optional JSON file and the CLI flags.
fn load_config(opts: &SimArgs, handle: &FilterHandle) -> Result<Config, SimError> {
    let mut config = match &opts.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(n) = opts.processors {
        config.system.num_processors = n;
    }
    if let Some(n) = opts.memory {
        config.system.memory_size = n;
    }
    if let Some(n) = opts.instructions {
        config.workload.instructions = n;
    }
    if let Some(seed) = opts.seed {
        config.general.seed = Some(seed);
    }
    if let Some(p) = opts.locality {
        config.workload.locality_percent = p;
    }
    if let Some(path) = &opts.results {
        config.report.results_path = Some(path.clone());
    }
    config.workload.reorder |= opts.reorder;
    config.general.track_history |= opts.history;
    config.general.trace_instructions |= opts.trace;
    config.validate()?;

    if config.general.trace_instructions && std::env::var_os(LOG_ENV).is_none() {
        let _ = handle.reload(EnvFilter::new("debug"));
    }
    config.general.seed = Some(resolve_seed(config.general.seed));
    Ok(config)
}

/// Loads the workload file or generates one from the config.
fn load_workload(opts: &SimArgs, config: &Config) -> Result<Workload, SimError> {
    let workload = match &opts.workload {
        Some(path) => {
            let workload = Workload::from_file(path)?;
            tracing::info!(path = %path.display(), instructions = workload.len(), "workload loaded");
            workload
        }
        None => WorkloadGenerator::new(
            &config.workload,
            config.system.num_processors,
            config.system.memory_size,
            config.general.seed.unwrap_or_default(),
        )
        .generate(config.workload.instructions),
    };
    Ok(if config.workload.reorder {
        workload.reorder()
    } else {
        workload
    })
}

fn cmd_run(protocol: Option<&str>, opts: &SimArgs, handle: &FilterHandle) -> Result<(), SimError> {
    let mut config = load_config(opts, handle)?;
    if let Some(literal) = protocol {
        config.system.protocol = ProtocolKind::from_literal(literal);
    }
    let workload = load_workload(opts, &config)?;

    let mut sim = Simulator::new(&config)?;
    let summary = sim.run(&workload)?;
    print_summary(&summary, &opts.sections);

    if opts.dump_state {
        println!("\n{}", sim.bus().snapshot());
    }
    if let Some(path) = &config.report.results_path {
        let _ = persist_results(path, &[ResultRecord::from(&summary)]);
    }
    Ok(())
}

fn cmd_compare(opts: &SimArgs, handle: &FilterHandle) -> Result<(), SimError> {
    let config = load_config(opts, handle)?;
    let workload = load_workload(opts, &config)?;

    let comparison = compare(&config, &workload)?;
    for summary in comparison.summaries() {
        print_summary(summary, &opts.sections);
        println!();
    }
    print_table(&comparison.summaries().map(ResultRecord::from));

    if let Some(path) = &config.report.results_path {
        let records = comparison.summaries().map(ResultRecord::from);
        let _ = persist_results(path, &records);
    }
    Ok(())
}

fn cmd_results(path: &Path) -> Result<(), SimError> {
    let records = read_results(path)?;
    if records.is_empty() {
        println!("No results in {}", path.display());
    } else {
        print_table(&records);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, sections: &[String]) {
    summary
        .metrics
        .print_sections(summary.protocol.name(), sections);
    if !summary.miss_rate_history.is_empty() {
        print_history(&summary.metrics, &summary.miss_rate_history);
    }
}

fn print_history(metrics: &Metrics, history: &[f64]) {
    println!("\nMiss rate evolution ({} instructions)", metrics.total_instructions);
    for (i, rate) in history.iter().enumerate() {
        println!("  {:>6}  {rate:>6.2}%", i + 1);
    }
}

fn print_table(records: &[ResultRecord]) {
    println!("{:<10} {:>10} {:>10} {:>14}", "protocol", "miss_rate", "misses", "instructions");
    for r in records {
        println!(
            "{:<10} {:>9.2}% {:>10} {:>14}",
            r.protocol.name(),
            r.miss_rate,
            r.cache_misses,
            r.total_instructions
        );
    }
}
