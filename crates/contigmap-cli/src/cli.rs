use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "contigmap - map contig specifications onto reference structures for protein design.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a contig map against a reference residue list and write its per-position table.
    Map(MapArgs),
    /// Show how a contig string splits into chains and which of them are receptors.
    Inspect(InspectArgs),
}

/// Arguments for the `map` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    // --- Core Arguments ---
    /// CSV file listing the reference residues in order (columns: chain,residue).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub reference: PathBuf,

    /// Path for the per-position CSV table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write the exported mappings to this TOML file.
    #[arg(short, long, value_name = "PATH")]
    pub mappings: Option<PathBuf>,

    // --- Contig Overrides ---
    /// Contig specification, e.g. "10-40/A163-181/10-40 B1-100".
    #[arg(long, value_name = "CONTIGS")]
    pub contigs: Option<String>,

    /// Treat every chain as a receptor chain copied from the reference.
    #[arg(long = "topo", overrides_with = "no_topology_only")]
    pub topology_only: bool,

    /// Turn topology-only mode off, overriding the config file.
    #[arg(long = "no-topo", overrides_with = "topology_only")]
    pub no_topology_only: bool,

    // --- Sampling Overrides ---
    /// Total generated length, "N" or "MIN-MAX".
    #[arg(short, long, value_name = "LENGTH")]
    pub length: Option<String>,

    /// Symmetry order; the contig must have 1 or ORDER chains.
    #[arg(long = "symmetry", value_name = "ORDER")]
    pub symmetry_order: Option<usize>,

    /// Maximum number of length sampling attempts.
    #[arg(long, value_name = "INT")]
    pub max_attempts: Option<usize>,

    /// Seed for length sampling. A random seed is used when omitted.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    // --- Mask Overrides ---
    /// Reference residues whose sequence is designed, e.g. "A1-5/A10".
    #[arg(long, value_name = "RESIDUES")]
    pub inpaint_seq: Option<String>,

    /// Reference residues whose structure is designed.
    #[arg(long, value_name = "RESIDUES")]
    pub inpaint_str: Option<String>,

    /// Structure-masked reference residues constrained to helix.
    #[arg(long, value_name = "RESIDUES")]
    pub helix: Option<String>,

    /// Structure-masked reference residues constrained to strand.
    #[arg(long, value_name = "RESIDUES")]
    pub strand: Option<String>,

    /// Structure-masked reference residues constrained to loop.
    #[arg(long = "loop", value_name = "RESIDUES")]
    pub loop_: Option<String>,

    /// 0-indexed output positions whose sequence is provided, e.g. "0-10,15".
    #[arg(long, value_name = "POSITIONS")]
    pub provide_seq: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sampling.length=100-120
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

impl MapArgs {
    /// Topology-only mode as set on the command line, if either flag was given.
    pub fn topology_override(&self) -> Option<bool> {
        match (self.topology_only, self.no_topology_only) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Contig specification to inspect.
    #[arg(required = true, value_name = "CONTIGS")]
    pub contigs: String,

    /// Classify chains as in topology-only mode.
    #[arg(long = "topo")]
    pub topology_only: bool,
}
