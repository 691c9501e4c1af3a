use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare sample analyses position by position against a reference
    Analyze {
        /// Reference FASTA (may be gzip/bzip2/xz compressed)
        #[arg(long)]
        reference: PathBuf,

        /// Duplicate region mask as FASTA of 0/1, one symbol per reference base
        #[arg(long)]
        duplicates: Option<PathBuf>,

        /// Directory receiving matrices/ and statistics/
        #[arg(short = 'o', long, default_value = "nasp_results")]
        output_dir: PathBuf,

        /// Minimum depth for a call to pass the coverage filter (default: 10, or config)
        #[arg(long)]
        coverage: Option<f64>,

        /// Minimum fraction of reads supporting a call (default: 0.9, or config)
        #[arg(long)]
        proportion: Option<f64>,

        /// Worker threads (default: one per CPU, or config)
        #[arg(short = 't', long)]
        threads: Option<usize>,

        /// Also write statistics/summary.json
        #[arg(long)]
        json: bool,

        /// Skip writing per-contig matrices
        #[arg(long)]
        no_matrices: bool,

        /// Sample FrankenFasta files as NAME::ANALYSIS=PATH, or a bare PATH
        #[arg(required = true)]
        samples: Vec<String>,
    },

    /// Show the configuration file location and effective defaults
    Config {
        /// Write the current defaults to the configuration file
        #[arg(long)]
        init: bool,
    },
}
