//! Cache hierarchy simulator CLI.
//!
//! This binary drives a memory-reference trace through the simulated hierarchy. It performs:
//! 1. **Configuration:** Built-in defaults, optional JSON file, per-level geometry overrides.
//! 2. **Simulation:** Streams `<I|R|W> <hex addr> [hex pc]` records from a file or stdin.
//! 3. **Reporting:** Sectioned text report or a JSON statistics document.

use clap::Parser;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::process;

use dbpsim_core::config::CacheConfig;
use dbpsim_core::{Config, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "dbpsim",
    author,
    version,
    about = "Trace-driven cache hierarchy simulator",
    long_about = "Drive a memory-reference trace through a two-level cache hierarchy (split L1, \
shared L2) with dead-block prediction and tag-correlating prefetch.\n\nTrace lines are \
`<I|R|W> <hex addr> [hex pc]`; the pc column defaults to the address and `#` starts a \
comment.\n\nExamples:\n  dbpsim trace.txt\n  dbpsim -c config.json --json trace.txt\n  \
gzip -dc trace.gz | dbpsim -"
)]
struct Cli {
    /// Trace file to simulate, or "-" for stdin.
    #[arg(default_value = "-")]
    trace: String,

    /// JSON configuration file; missing keys fall back to defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Override both L1 capacities, in KiB.
    #[arg(long, value_name = "KB")]
    l1_size_kb: Option<u64>,

    /// Override both L1 block sizes, in bytes.
    #[arg(long, value_name = "BYTES")]
    l1_block: Option<u64>,

    /// Override both L1 associativities.
    #[arg(long, value_name = "WAYS")]
    l1_ways: Option<usize>,

    /// Override the L2 capacity, in KiB.
    #[arg(long, value_name = "KB")]
    l2_size_kb: Option<u64>,

    /// Override the L2 block size, in bytes.
    #[arg(long, value_name = "BYTES")]
    l2_block: Option<u64>,

    /// Override the L2 associativity.
    #[arg(long, value_name = "WAYS")]
    l2_ways: Option<usize>,

    /// Disable prefetching at every level.
    #[arg(long)]
    no_prefetch: bool,

    /// Emit statistics as a JSON document instead of the text report.
    #[arg(long)]
    json: bool,

    /// Suppress the configuration banner and record count.
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug-level logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "dbpsim_core=debug"
    } else {
        "dbpsim_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut config = load_config(cli.config.as_deref());
    apply_overrides(&mut config, &cli);

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: invalid configuration: {e}");
        process::exit(1);
    });

    if !cli.quiet && !cli.json {
        println!(
            "Configuration: {}",
            cli.config.as_deref().unwrap_or("default")
        );
        print_level("L1-I", &config.l1_i);
        print_level("L1-D", &config.l1_d);
        print_level("L2", &config.l2);
        println!();
    }

    let result = if cli.trace == "-" {
        let stdin = io::stdin();
        sim.run(stdin.lock())
    } else {
        let file = File::open(&cli.trace).unwrap_or_else(|e| {
            eprintln!("\n[!] FATAL: Could not open trace '{}': {}", cli.trace, e);
            process::exit(1);
        });
        sim.run(BufReader::new(file))
    };
    let records = result.unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    });

    if cli.json {
        let doc = serde_json::to_string_pretty(&sim.stats()).unwrap_or_else(|e| {
            eprintln!("\n[!] FATAL: could not serialize statistics: {e}");
            process::exit(1);
        });
        println!("{doc}");
    } else {
        if !cli.quiet {
            println!("[*] {records} trace records applied");
        }
        sim.stats().print();
    }
}

/// Loads the configuration file if one was given, else the defaults.
///
/// Exits the process with an error message if the file cannot be read or
/// does not parse.
fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not read config '{path}': {e}");
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not parse config '{path}': {e}");
        process::exit(1);
    })
}

/// Applies command-line geometry overrides on top of the loaded config.
/// The L1 flags cover both L1 levels.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(kb) = cli.l1_size_kb {
        config.l1_i.size_kb = kb;
        config.l1_d.size_kb = kb;
    }
    if let Some(bytes) = cli.l1_block {
        config.l1_i.block_bytes = bytes;
        config.l1_d.block_bytes = bytes;
    }
    if let Some(ways) = cli.l1_ways {
        config.l1_i.ways = ways;
        config.l1_d.ways = ways;
    }
    if let Some(kb) = cli.l2_size_kb {
        config.l2.size_kb = kb;
    }
    if let Some(bytes) = cli.l2_block {
        config.l2.block_bytes = bytes;
    }
    if let Some(ways) = cli.l2_ways {
        config.l2.ways = ways;
    }
    if cli.no_prefetch {
        config.disable_prefetch();
    }
}

fn print_level(name: &str, level: &CacheConfig) {
    println!(
        "  {name}: {} KB, {} B blocks, {}-way, dbp={:?}, prefetch={:?}",
        level.size_kb, level.block_bytes, level.ways, level.dbp, level.prefetcher
    );
}
