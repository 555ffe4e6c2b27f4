//! dawg-stats - build the DAWG of a text file and report on its shape.

use std::path::PathBuf;

use anyhow::{Context, Result};
use blumer_dawg::dawg::{Config, Dawg, ALPHABET_SIZE};
use blumer_dawg::stats::{FinalState, NodeStats};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Builds the directed acyclic word graph of a text and prints its size.
#[derive(Parser)]
#[command(name = "dawg-stats")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Text file of ASCII letters; trailing whitespace is ignored
    input: PathBuf,

    /// Also print the out-degree histogram
    #[arg(short, long)]
    report: bool,

    /// Leave the final state out of the histogram
    #[arg(long, requires = "report")]
    exclude_final: bool,

    /// Slots per arena chunk
    #[arg(long, env = "DAWG_CHUNK_CAPACITY", default_value_t = Config::DEFAULT_CHUNK_CAPACITY)]
    chunk_capacity: u32,

    /// Maximum number of chunks per arena
    #[arg(long, env = "DAWG_MAX_CHUNKS", default_value_t = Config::DEFAULT_MAX_CHUNKS)]
    max_chunks: u32,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing_subscriber(cli.verbose)?;

    let config = Config::default()
        .with_chunk_capacity(cli.chunk_capacity)
        .with_max_chunks(cli.max_chunks);
    let dawg = Dawg::<ALPHABET_SIZE>::from_file(&cli.input, &config)
        .with_context(|| format!("failed to build automaton of {}", cli.input.display()))?;

    let memory = dawg.memory();
    info!(
        nodes = memory.nodes.live,
        node_chunks = memory.nodes.chunks,
        list_chunks = memory.lists.chunks,
        map_chunks = memory.maps.chunks,
        "dawg-stats.memory"
    );

    if cli.report {
        let final_state = if cli.exclude_final {
            FinalState::Exclude
        } else {
            FinalState::Include
        };
        println!("{}", NodeStats::collect(&dawg, final_state));
    }
    println!("length: {}", dawg.len());
    println!("nodes: {}", dawg.node_count());
    println!("edge records: {}", memory.edge_records());
    Ok(())
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn install_tracing_subscriber(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["dawg-stats", "text.txt", "-r", "--exclude-final", "-vv"])
            .unwrap();
        assert_eq!(cli.input, PathBuf::from("text.txt"));
        assert!(cli.report && cli.exclude_final);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn exclude_final_needs_report() {
        assert!(Cli::try_parse_from(["dawg-stats", "text.txt", "--exclude-final"]).is_err());
    }
}
