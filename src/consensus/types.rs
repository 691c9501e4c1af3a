use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A coverage or proportion measurement reported by a sample analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    /// The data source does not report this metric (`-`). Always passes its filter.
    Unavailable,
    /// The metric was expected but is absent, e.g. no VCF row (`?`). Always fails.
    Missing,
}

impl Metric {
    pub fn passes(&self, threshold: f64) -> bool {
        match self {
            Metric::Unavailable => true,
            Metric::Missing => false,
            Metric::Value(value) => *value >= threshold,
        }
    }

    /// The single character written to the per-analysis filter columns.
    pub fn filter_symbol(&self, threshold: f64) -> u8 {
        match self {
            Metric::Unavailable => b'-',
            Metric::Missing => b'?',
            Metric::Value(_) if self.passes(threshold) => b'Y',
            Metric::Value(_) => b'N',
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" => Ok(Metric::Unavailable),
            "?" => Ok(Metric::Missing),
            other => other
                .parse::<f64>()
                .map(Metric::Value)
                .map_err(|_| format!("invalid metric value '{}'", other)),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(value) => write!(f, "{}", value),
            Metric::Unavailable => f.write_str("-"),
            Metric::Missing => f.write_str("?"),
        }
    }
}

/// Reduce a base call to A/C/G/T, everything else becomes N.
pub fn simplify_call(call: u8) -> u8 {
    match call.to_ascii_uppercase() {
        b @ (b'A' | b'C' | b'G' | b'T') => b,
        _ => b'N',
    }
}

/// X means no value, N means any value.
pub fn is_no_call(call: u8) -> bool {
    matches!(call, b'X' | b'N')
}

/// One analysis's call at one contig position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionCallRecord {
    /// 1-based ordinal of the position within its contig.
    pub position: u64,
    pub call: u8,
    pub simple_call: u8,
    pub coverage: Metric,
    pub proportion: Metric,
}

impl PositionCallRecord {
    pub fn new(position: u64, call: u8, coverage: Metric, proportion: Metric) -> Self {
        let call = call.to_ascii_uppercase();
        Self {
            position,
            call,
            simple_call: simplify_call(call),
            coverage,
            proportion,
        }
    }

    /// A position the analysis has no data for at all.
    pub fn no_call(position: u64) -> Self {
        Self::new(position, b'X', Metric::Unavailable, Metric::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePosition {
    pub call: u8,
    pub simple_call: u8,
}

impl ReferencePosition {
    pub fn new(call: u8) -> Self {
        let call = call.to_ascii_uppercase();
        Self {
            call,
            simple_call: simplify_call(call),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateFlag {
    #[default]
    Unique,
    Duplicated,
}

impl DuplicateFlag {
    pub fn from_symbol(symbol: u8) -> Self {
        if symbol == b'1' {
            DuplicateFlag::Duplicated
        } else {
            DuplicateFlag::Unique
        }
    }

    pub fn is_duplicated(&self) -> bool {
        matches!(self, DuplicateFlag::Duplicated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContigInfo {
    pub name: String,
    pub length: u64,
}

/// The per-analysis statistics observed at a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisFlags {
    pub was_called: bool,
    pub passed_coverage_filter: bool,
    pub passed_proportion_filter: bool,
    pub quality_breadth: bool,
    pub called_reference: bool,
    pub called_snp: bool,
    pub called_degen: bool,
}

impl AnalysisFlags {
    pub const fn splat(value: bool) -> Self {
        Self {
            was_called: value,
            passed_coverage_filter: value,
            passed_proportion_filter: value,
            quality_breadth: value,
            called_reference: value,
            called_snp: value,
            called_degen: value,
        }
    }

    fn zip_with(self, other: AnalysisFlags, op: impl Fn(bool, bool) -> bool) -> Self {
        Self {
            was_called: op(self.was_called, other.was_called),
            passed_coverage_filter: op(self.passed_coverage_filter, other.passed_coverage_filter),
            passed_proportion_filter: op(
                self.passed_proportion_filter,
                other.passed_proportion_filter,
            ),
            quality_breadth: op(self.quality_breadth, other.quality_breadth),
            called_reference: op(self.called_reference, other.called_reference),
            called_snp: op(self.called_snp, other.called_snp),
            called_degen: op(self.called_degen, other.called_degen),
        }
    }
}

/// A stat is set if it held for at least one analysis. Starts all-false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyStats(pub AnalysisFlags);

impl AnyStats {
    pub fn new() -> Self {
        Self(AnalysisFlags::splat(false))
    }

    pub fn observe(&mut self, flags: &AnalysisFlags) {
        self.0 = self.0.zip_with(*flags, |a, b| a || b);
    }
}

impl Default for AnyStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A stat stays set only while it held for every analysis. Starts all-true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllStats(pub AnalysisFlags);

impl AllStats {
    pub fn new() -> Self {
        Self(AnalysisFlags::splat(true))
    }

    pub fn observe(&mut self, flags: &AnalysisFlags) {
        self.0 = self.0.zip_with(*flags, |a, b| a && b);
    }
}

impl Default for AllStats {
    fn default() -> Self {
        Self::new()
    }
}

/// One sample's statistics at one position, in the order of its analyses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleFlags {
    pub any: AnyStats,
    pub all: AllStats,
    pub analyses: Vec<AnalysisFlags>,
}

impl SampleFlags {
    pub fn from_analyses(analyses: Vec<AnalysisFlags>) -> Self {
        let mut any = AnyStats::new();
        let mut all = AllStats::new();
        for flags in &analyses {
            any.observe(flags);
            all.observe(flags);
        }
        Self { any, all, analyses }
    }
}

/// Everything learned about a single reference position across all analyses.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionInfo {
    pub is_all_called: bool,
    pub is_reference_clean: bool,
    pub is_reference_duplicated: bool,
    pub is_all_passed_coverage: bool,
    pub is_all_passed_proportion: bool,
    pub is_all_passed_consensus: bool,
    pub is_all_quality_breadth: bool,
    pub is_any_snp: bool,
    pub is_best_snp: bool,
    pub is_missing_data: bool,

    pub was_called: u32,
    pub called_reference: u32,
    pub called_snp: u32,
    pub called_degen: u32,
    pub passed_coverage_filter: u32,
    pub passed_proportion_filter: u32,
    pub num_a: u32,
    pub num_c: u32,
    pub num_g: u32,
    pub num_t: u32,
    pub num_n: u32,

    /// Reference call followed by every analysis call.
    pub call_str: Vec<u8>,
    pub call_was_made: Vec<u8>,
    pub passed_depth_filter: Vec<u8>,
    pub passed_proportion_filter_str: Vec<u8>,
    pub pattern: Vec<u8>,

    pub genome_any: AnyStats,
    pub genome_all: AllStats,
    pub sample_stats: Vec<SampleFlags>,
}

impl PositionInfo {
    pub fn num_analyses(&self) -> usize {
        self.call_was_made.len()
    }

    pub fn reference_call(&self) -> u8 {
        self.call_str[0]
    }

    pub fn analysis_calls(&self) -> &[u8] {
        &self.call_str[1..]
    }
}
