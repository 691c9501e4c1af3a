use crate::consensus::sink::PositionSink;
use crate::consensus::types::PositionInfo;
use crate::error::Result;
use std::collections::HashMap;
use std::io::{self, Write};

const STAT_COLUMNS: [&str; 16] = [
    "#SNPcall",
    "#Indelcall",
    "#Refcall",
    "#CallWasMade",
    "#PassedDepthFilter",
    "#PassedProportionFilter",
    "#A",
    "#C",
    "#G",
    "#T",
    "#Indel",
    "#NXdegen",
    "Contig",
    "Position",
    "InDupRegion",
    "SampleConsensus",
];

/// Per-analysis filter strings, left out of the best-SNP matrix.
const FILTER_COLUMNS: [&str; 3] = ["CallWasMade", "PassedDepthFilter", "PassedProportionFilter"];

const PATTERN_COLUMNS: [&str; 2] = ["Pattern", "Pattern#"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// Every position.
    Master,
    /// Positions where every sample has a quality call and at least one is a SNP.
    BestSnp,
    /// Positions with at least one quality SNP, calls lacking quality shown as `N`.
    MissingData,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 3] = [MatrixKind::Master, MatrixKind::BestSnp, MatrixKind::MissingData];

    pub fn suffix(&self) -> &'static str {
        match self {
            MatrixKind::Master => "master",
            MatrixKind::BestSnp => "bestsnp",
            MatrixKind::MissingData => "missingdata",
        }
    }

    fn includes(&self, info: &PositionInfo) -> bool {
        match self {
            MatrixKind::Master => true,
            MatrixKind::BestSnp => info.is_best_snp,
            MatrixKind::MissingData => info.is_missing_data,
        }
    }

    fn has_filter_columns(&self) -> bool {
        *self != MatrixKind::BestSnp
    }
}

/// Writes one matrix for one contig.
///
/// `Pattern#` numbers each distinct pattern from `1` in order of first appearance
/// within the matrix.
pub struct MatrixWriter<W: Write> {
    contig: String,
    kind: MatrixKind,
    writer: W,
    row: Vec<u8>,
    patterns: HashMap<Vec<u8>, usize>,
}

impl<W: Write> MatrixWriter<W> {
    /// Writes the header immediately.
    pub fn new(contig: &str, kind: MatrixKind, identifiers: &[String], mut writer: W) -> io::Result<Self> {
        let mut header: Vec<&str> = vec!["LocusID", "Reference"];
        header.extend(identifiers.iter().map(String::as_str));
        header.extend(STAT_COLUMNS);
        if kind.has_filter_columns() {
            header.extend(FILTER_COLUMNS);
        }
        header.extend(PATTERN_COLUMNS);
        writeln!(writer, "{}", header.join("\t"))?;

        Ok(Self {
            contig: contig.to_string(),
            kind,
            writer,
            row: Vec::with_capacity(256),
            patterns: HashMap::new(),
        })
    }

    fn build_row(&mut self, position: u64, info: &PositionInfo) -> io::Result<()> {
        let row = &mut self.row;
        let total = info.num_analyses();
        row.clear();

        write!(row, "{}::{}\t", self.contig, position)?;
        row.push(info.reference_call());
        for (i, &call) in info.analysis_calls().iter().enumerate() {
            row.push(b'\t');
            if self.kind == MatrixKind::MissingData && info.pattern[i + 1] == b'N' {
                row.push(b'N');
            } else {
                row.push(call);
            }
        }

        write!(
            row,
            "\t{}\t0\t{}\t{}/{}\t{}/{}\t{}/{}\t{}\t{}\t{}\t{}\t0\t{}\t{}\t{}\t{}\t{}\t",
            info.called_snp,
            info.called_reference,
            info.was_called,
            total,
            info.passed_coverage_filter,
            total,
            info.passed_proportion_filter,
            total,
            info.num_a,
            info.num_c,
            info.num_g,
            info.num_t,
            info.num_n,
            self.contig,
            position,
            python_bool(info.is_reference_duplicated),
            python_bool(info.is_all_passed_consensus),
        )?;
        if self.kind.has_filter_columns() {
            row.extend_from_slice(&info.call_was_made);
            row.push(b'\t');
            row.extend_from_slice(&info.passed_depth_filter);
            row.push(b'\t');
            row.extend_from_slice(&info.passed_proportion_filter_str);
            row.push(b'\t');
        }

        let next = self.patterns.len() + 1;
        let number = *self.patterns.entry(info.pattern.clone()).or_insert(next);
        row.extend_from_slice(&info.pattern);
        writeln!(row, "\t{}", number)?;
        Ok(())
    }
}

fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

impl<W: Write> PositionSink for MatrixWriter<W> {
    fn write(&mut self, position: u64, info: &PositionInfo) -> Result<()> {
        if !self.kind.includes(info) {
            return Ok(());
        }
        self.build_row(position, info)?;
        self.writer.write_all(&self.row)?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
