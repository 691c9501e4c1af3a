use super::types::{AnalysisFlags, PositionInfo, SampleFlags};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Running totals of the per-analysis stat set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatCounts {
    pub was_called: u64,
    pub passed_coverage_filter: u64,
    pub passed_proportion_filter: u64,
    pub quality_breadth: u64,
    pub called_reference: u64,
    pub called_snp: u64,
    pub called_degen: u64,
}

impl StatCounts {
    pub const COLUMNS: [&'static str; 7] = [
        "was_called",
        "passed_coverage_filter",
        "passed_proportion_filter",
        "quality_breadth",
        "called_reference",
        "called_snp",
        "called_degen",
    ];

    pub fn add_flags(&mut self, flags: &AnalysisFlags) {
        self.was_called += flags.was_called as u64;
        self.passed_coverage_filter += flags.passed_coverage_filter as u64;
        self.passed_proportion_filter += flags.passed_proportion_filter as u64;
        self.quality_breadth += flags.quality_breadth as u64;
        self.called_reference += flags.called_reference as u64;
        self.called_snp += flags.called_snp as u64;
        self.called_degen += flags.called_degen as u64;
    }

    pub fn merge(&mut self, other: &StatCounts) {
        self.was_called += other.was_called;
        self.passed_coverage_filter += other.passed_coverage_filter;
        self.passed_proportion_filter += other.passed_proportion_filter;
        self.quality_breadth += other.quality_breadth;
        self.called_reference += other.called_reference;
        self.called_snp += other.called_snp;
        self.called_degen += other.called_degen;
    }

    /// Values in [`StatCounts::COLUMNS`] order.
    pub fn values(&self) -> [u64; 7] {
        [
            self.was_called,
            self.passed_coverage_filter,
            self.passed_proportion_filter,
            self.quality_breadth,
            self.called_reference,
            self.called_snp,
            self.called_degen,
        ]
    }
}

/// Any/all totals for one sample plus one entry per analysis, in grouping order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleStats {
    pub any: StatCounts,
    pub all: StatCounts,
    pub analyses: Vec<StatCounts>,
}

impl SampleStats {
    pub fn with_analyses(count: usize) -> Self {
        Self {
            any: StatCounts::default(),
            all: StatCounts::default(),
            analyses: vec![StatCounts::default(); count],
        }
    }

    pub fn record(&mut self, flags: &SampleFlags) {
        self.any.add_flags(&flags.any.0);
        self.all.add_flags(&flags.all.0);
        for (counts, analysis) in self.analyses.iter_mut().zip(&flags.analyses) {
            counts.add_flags(analysis);
        }
    }

    pub fn merge(&mut self, other: &SampleStats) {
        self.any.merge(&other.any);
        self.all.merge(&other.all);
        for (counts, analysis) in self.analyses.iter_mut().zip(&other.analyses) {
            counts.merge(analysis);
        }
    }
}

/// Per-sample statistics shaped like the sample grouping, plus any/all over every
/// analysis in the run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleAnalysisStats {
    pub genome_any: StatCounts,
    pub genome_all: StatCounts,
    pub samples: Vec<SampleStats>,
}

impl SampleAnalysisStats {
    /// Zeroed counters for groups of the given sizes.
    pub fn for_group_sizes(sizes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            genome_any: StatCounts::default(),
            genome_all: StatCounts::default(),
            samples: sizes.into_iter().map(SampleStats::with_analyses).collect(),
        }
    }

    pub fn record(&mut self, position: &PositionInfo) {
        self.genome_any.add_flags(&position.genome_any.0);
        self.genome_all.add_flags(&position.genome_all.0);
        for (sample, flags) in self.samples.iter_mut().zip(&position.sample_stats) {
            sample.record(flags);
        }
    }

    /// Analyses per sample, in grouping order.
    pub fn group_sizes(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.analyses.len()).collect()
    }

    /// Index-positional sum. Fails without touching `self` when the grouping shapes
    /// differ.
    pub fn merge(&mut self, other: &SampleAnalysisStats) -> Result<()> {
        let expected = self.group_sizes();
        let found = other.group_sizes();
        if expected != found {
            return Err(AnalysisError::GroupingMismatch { expected, found });
        }

        self.genome_any.merge(&other.genome_any);
        self.genome_all.merge(&other.genome_all);
        for (sample, contig_sample) in self.samples.iter_mut().zip(&other.samples) {
            sample.merge(contig_sample);
        }
        Ok(())
    }
}

/// Position counts for a single contig, or the sum over several.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContigStats {
    pub name: String,
    pub reference_length: u64,
    pub reference_clean: u64,
    pub reference_duplicated: u64,
    pub all_called: u64,
    pub all_passed_coverage: u64,
    pub all_passed_proportion: u64,
    pub all_passed_consensus: u64,
    pub quality_breadth: u64,
    pub any_snps: u64,
    pub best_snps: u64,
}

impl ContigStats {
    pub const COLUMNS: [&'static str; 9] = [
        "reference_clean",
        "reference_duplicated",
        "all_called",
        "all_passed_coverage",
        "all_passed_proportion",
        "all_passed_consensus",
        "quality_breadth",
        "any_snps",
        "best_snps",
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, position: &PositionInfo) {
        self.reference_length += 1;
        self.reference_clean += position.is_reference_clean as u64;
        self.reference_duplicated += position.is_reference_duplicated as u64;
        self.all_called += position.is_all_called as u64;
        self.all_passed_coverage += position.is_all_passed_coverage as u64;
        self.all_passed_proportion += position.is_all_passed_proportion as u64;
        self.all_passed_consensus += position.is_all_passed_consensus as u64;
        self.quality_breadth += position.is_all_quality_breadth as u64;
        self.any_snps += position.is_any_snp as u64;
        self.best_snps += position.is_best_snp as u64;
    }

    pub fn merge(&mut self, other: &ContigStats) {
        self.reference_length += other.reference_length;
        self.reference_clean += other.reference_clean;
        self.reference_duplicated += other.reference_duplicated;
        self.all_called += other.all_called;
        self.all_passed_coverage += other.all_passed_coverage;
        self.all_passed_proportion += other.all_passed_proportion;
        self.all_passed_consensus += other.all_passed_consensus;
        self.quality_breadth += other.quality_breadth;
        self.any_snps += other.any_snps;
        self.best_snps += other.best_snps;
    }

    /// Values in [`ContigStats::COLUMNS`] order.
    pub fn values(&self) -> [u64; 9] {
        [
            self.reference_clean,
            self.reference_duplicated,
            self.all_called,
            self.all_passed_coverage,
            self.all_passed_proportion,
            self.all_passed_consensus,
            self.quality_breadth,
            self.any_snps,
            self.best_snps,
        ]
    }

    /// Field-wise sum of `contigs`, named "Whole Genome".
    pub fn whole_genome<'a>(contigs: impl IntoIterator<Item = &'a ContigStats>) -> Self {
        let mut total = ContigStats::new("Whole Genome");
        for contig in contigs {
            total.merge(contig);
        }
        total
    }
}
