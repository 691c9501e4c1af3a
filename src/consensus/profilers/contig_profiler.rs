use crate::consensus::options::AnalysisOptions;
use crate::consensus::profilers::position_profiler::analyze_position;
use crate::consensus::sink::SinkFactory;
use crate::consensus::source::{DuplicateMask, ReferenceGenome};
use crate::consensus::stats::{ContigStats, SampleAnalysisStats};
use crate::consensus::sync::{SampleGroup, SamplePositions};
use crate::consensus::types::{ContigInfo, DuplicateFlag, PositionInfo};
use crate::error::{AnalysisError, Result};
use indicatif::ProgressBar;
use log::debug;

const PROGRESS_STEP: u64 = 10_000;

/// Statistics gathered for one contig, ready to be folded into genome totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigResult {
    pub stats: ContigStats,
    pub sample_stats: SampleAnalysisStats,
}

/// Accumulates classified positions of a single contig.
pub struct ContigProfiler {
    pub name: String,
    stats: ContigStats,
    sample_stats: SampleAnalysisStats,
}

impl ContigProfiler {
    pub fn new(name: &str, sample_groups: &[SampleGroup<'_>]) -> Self {
        Self {
            name: name.to_string(),
            stats: ContigStats::new(name),
            sample_stats: SampleAnalysisStats::for_group_sizes(sample_groups.iter().map(Vec::len)),
        }
    }

    pub fn process_position(&mut self, position: &PositionInfo) {
        self.stats.record(position);
        self.sample_stats.record(position);
    }

    pub fn positions(&self) -> u64 {
        self.stats.reference_length
    }

    pub fn finish(self) -> ContigResult {
        ContigResult {
            stats: self.stats,
            sample_stats: self.sample_stats,
        }
    }
}

/// Classify every position of `contig` and forward each one to a sink opened for
/// this contig.
///
/// The reference drives the walk: every analysis and the duplicate mask must supply
/// exactly one record per reference position, no fewer and no more. On error the
/// sink is dropped without being finished, leaving whatever it already flushed on
/// disk.
pub fn profile_contig(
    options: &AnalysisOptions,
    contig: &ContigInfo,
    reference: &dyn ReferenceGenome,
    duplicates: Option<&dyn DuplicateMask>,
    sample_groups: &[SampleGroup<'_>],
    sinks: &dyn SinkFactory,
    progress: &ProgressBar,
) -> Result<ContigResult> {
    let reference_positions = reference.positions(&contig.name)?;
    let mut duplicate_positions = match duplicates {
        Some(mask) => Some(mask.positions(&contig.name)?),
        None => None,
    };
    let mut sample_positions = SamplePositions::new(&contig.name, sample_groups)?;
    let identifiers = sample_positions.identifiers();

    let mut sink = sinks.open(&contig.name, &identifiers)?;
    let mut profiler = ContigProfiler::new(&contig.name, sample_groups);

    for reference_position in reference_positions {
        let reference_position = reference_position?;
        let position = profiler.positions() + 1;

        let duplicate = match duplicate_positions.as_mut() {
            None => DuplicateFlag::Unique,
            Some(stream) => match stream.next() {
                Some(flag) => flag?,
                None => {
                    return Err(AnalysisError::StreamExhausted {
                        contig: contig.name.clone(),
                        stream: "duplicates".to_string(),
                        position,
                    })
                }
            },
        };

        let samples = sample_positions.advance()?;
        let info = analyze_position(options, &reference_position, duplicate, samples);

        profiler.process_position(&info);
        sink.write(position, &info)?;

        if position % PROGRESS_STEP == 0 {
            progress.inc(PROGRESS_STEP);
        }
    }

    sample_positions.finish()?;
    if let Some(stream) = duplicate_positions.as_mut() {
        if stream.next().is_some() {
            return Err(AnalysisError::StreamOverrun {
                contig: contig.name.clone(),
                stream: "duplicates".to_string(),
                length: profiler.positions(),
            });
        }
    }

    sink.finish()?;
    progress.inc(profiler.positions() % PROGRESS_STEP);

    let result = profiler.finish();
    debug!(
        "{}: {} positions, {} quality breadth, {} best SNPs",
        result.stats.name,
        result.stats.reference_length,
        result.stats.quality_breadth,
        result.stats.best_snps
    );
    Ok(result)
}
