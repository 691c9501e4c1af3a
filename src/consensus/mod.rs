//! Position-wise consensus across sample analyses.
//!
//! For every reference contig the analyses are read in lockstep, every position is
//! classified against the coverage and proportion filters, and the results are
//! folded into per-contig and per-sample statistics. Contigs run in parallel and
//! are folded back in reference order.

pub mod options;
pub mod orchestrator;
pub mod profilers;
pub mod report;
pub mod sink;
pub mod source;
pub mod stats;
pub mod sync;
pub mod types;

pub use options::AnalysisOptions;
pub use orchestrator::{GenomeSummary, SampleAnalysisOrchestrator, SampleInfo};
pub use sink::{PositionSink, SinkFactory};
pub use source::{DuplicateMask, PositionStream, ReferenceGenome, SampleAnalysis};

use crate::error::Result;

/// Analyze every contig of `reference` and return the whole-genome summary.
pub fn run(
    options: AnalysisOptions,
    reference: &dyn ReferenceGenome,
    duplicates: Option<&dyn DuplicateMask>,
    analyses: &[&dyn SampleAnalysis],
    sinks: &dyn SinkFactory,
) -> Result<GenomeSummary> {
    SampleAnalysisOrchestrator::new(options, reference, duplicates, analyses).run(sinks)
}
