use crate::config::Config;
use crate::consensus::report::write_reports;
use crate::consensus::sink::{NullSinkFactory, SinkFactory};
use crate::consensus::{self, DuplicateMask, ReferenceGenome, SampleAnalysis};
use crate::export::{ExportMetadata, SummaryExport, SUMMARY_FILE};
use crate::genome::{load_genome, FastaAnalysis, MemoryGenome};
use crate::matrix::MatrixSinkFactory;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const FASTA_EXTENSIONS: [&str; 8] = ["gz", "bz2", "xz", "fasta", "fa", "fna", "frankenfasta", "txt"];

pub struct AnalyzeArgs {
    pub reference: PathBuf,
    pub duplicates: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub coverage: Option<f64>,
    pub proportion: Option<f64>,
    pub threads: Option<usize>,
    pub json: bool,
    pub no_matrices: bool,
    pub samples: Vec<String>,
}

/// A sample analysis named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSpec {
    pub name: String,
    pub identifier: String,
    pub path: PathBuf,
}

impl SampleSpec {
    /// Accepts `NAME::ANALYSIS=PATH`, `NAME=PATH` or a bare `PATH`.
    pub fn parse(arg: &str) -> Result<Self> {
        let (label, path) = match arg.split_once('=') {
            Some((label, path)) => (label.to_string(), PathBuf::from(path)),
            None => {
                let path = PathBuf::from(arg);
                (sample_name_from_path(&path)?, path)
            }
        };
        if label.is_empty() || path.as_os_str().is_empty() {
            anyhow::bail!("Invalid sample '{}': expected NAME::ANALYSIS=PATH or PATH", arg);
        }

        let (name, identifier) = match label.split_once("::") {
            Some((name, _)) => (name.to_string(), label.clone()),
            None => (label.clone(), format!("{}::frankenfasta", label)),
        };
        Ok(Self {
            name,
            identifier,
            path,
        })
    }
}

fn sample_name_from_path(path: &Path) -> Result<String> {
    let mut stem = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Cannot derive a sample name from {}", path.display()))?;
    while let Some((head, ext)) = stem.rsplit_once('.') {
        if head.is_empty() || !FASTA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            break;
        }
        stem = head;
    }
    Ok(stem.to_string())
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let options = Config::load()
        .analysis_options(args.coverage, args.proportion, args.threads)
        .with_progress(true);
    options.validate().context("Invalid analysis options")?;

    let specs = args
        .samples
        .iter()
        .map(|arg| SampleSpec::parse(arg))
        .collect::<Result<Vec<_>>>()?;

    info!("Reading reference {}", args.reference.display());
    let reference = load_genome(&args.reference)
        .with_context(|| format!("Failed to read reference {}", args.reference.display()))?;
    let duplicates: Option<MemoryGenome> = match &args.duplicates {
        Some(path) => Some(
            load_genome(path)
                .with_context(|| format!("Failed to read duplicates file {}", path.display()))?,
        ),
        None => None,
    };

    let reference_contigs = reference.contigs();
    let mut analyses = Vec::with_capacity(specs.len());
    for spec in &specs {
        info!("Reading {} from {}", spec.identifier, spec.path.display());
        let analysis = FastaAnalysis::open(&spec.name, &spec.identifier, &spec.path)
            .with_context(|| format!("Failed to read sample {}", spec.path.display()))?
            .with_reference(&reference_contigs);
        analyses.push(analysis);
    }
    let analysis_refs: Vec<&dyn SampleAnalysis> =
        analyses.iter().map(|a| a as &dyn SampleAnalysis).collect();

    let matrix_dir = args.output_dir.join("matrices");
    let stats_dir = args.output_dir.join("statistics");
    fs::create_dir_all(&stats_dir)
        .with_context(|| format!("Failed to create {}", stats_dir.display()))?;

    let matrices = MatrixSinkFactory::new(&matrix_dir);
    let sinks: &dyn SinkFactory = if args.no_matrices {
        &NullSinkFactory
    } else {
        &matrices
    };

    let summary = consensus::run(
        options.clone(),
        &reference,
        duplicates.as_ref().map(|d| d as &dyn DuplicateMask),
        &analysis_refs,
        sinks,
    )
    .context("Analysis failed")?;

    write_reports(&stats_dir, &summary)
        .with_context(|| format!("Failed to write statistics to {}", stats_dir.display()))?;

    if args.json {
        let export = SummaryExport::new(
            summary,
            ExportMetadata {
                reference: args.reference.display().to_string(),
                duplicates: args.duplicates.as_ref().map(|p| p.display().to_string()),
                coverage_threshold: options.coverage_threshold,
                proportion_threshold: options.proportion_threshold,
            },
        );
        export
            .write_to(&stats_dir.join(SUMMARY_FILE))
            .context("Failed to write JSON summary")?;
        log_totals(&export.whole_genome);
    } else {
        log_totals(&summary.whole_genome());
    }

    info!("Results written to {}", args.output_dir.display());
    Ok(())
}

fn log_totals(whole_genome: &consensus::stats::ContigStats) {
    info!(
        "Whole genome: {} positions, {} quality breadth, {} SNPs, {} best SNPs",
        whole_genome.reference_length,
        whole_genome.quality_breadth,
        whole_genome.any_snps,
        whole_genome.best_snps
    );
}
