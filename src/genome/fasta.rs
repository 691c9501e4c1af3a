use crate::consensus::source::{PositionStream, SampleAnalysis};
use crate::consensus::types::{ContigInfo, Metric, PositionCallRecord};
use crate::error::{AnalysisError, Result};
use crate::genome::memory::MemoryGenome;
use bio::io::fasta;
use log::{debug, warn};
use niffler::get_reader;
use std::fs::File;
use std::io::BufReader;
use std::iter;
use std::path::Path;
use std::sync::Arc;

/// Prefix carried by contig names in sample FASTA files.
const FRANKEN_PREFIX: &str = "franken::";

/// Read every record of a (possibly compressed) FASTA file, in file order.
pub fn read_contigs(path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let file = File::open(path)?;
    let (inner_reader, _compression) = get_reader(Box::new(file)).map_err(|e| {
        AnalysisError::Source {
            stream: path.display().to_string(),
            message: e.to_string(),
        }
    })?;
    let reader = fasta::Reader::new(BufReader::with_capacity(1024 * 1024, inner_reader));

    let mut contigs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AnalysisError::Source {
            stream: path.display().to_string(),
            message: e.to_string(),
        })?;
        let name = record.id().trim_start_matches(FRANKEN_PREFIX).to_string();
        contigs.push((name, record.seq().to_vec()));
    }
    debug!("Read {} contigs from {}", contigs.len(), path.display());
    Ok(contigs)
}

/// Load a reference FASTA, or a duplicate-region mask stored as FASTA of `0`/`1`.
pub fn load_genome(path: &Path) -> Result<MemoryGenome> {
    let genome = read_contigs(path)?
        .into_iter()
        .fold(MemoryGenome::new(), |genome, (name, sequence)| {
            genome.with_contig(&name, &sequence)
        });
    Ok(genome)
}

/// A sample analysis read from a FrankenFasta: one call per reference position and no
/// depth or proportion data.
///
/// Once the reference contigs are known (see [`FastaAnalysis::with_reference`]),
/// contigs the file lacks and positions between the end of a sequence and the end of
/// the reference contig read as `X`. Sequences longer than the reference contig are
/// passed through unchanged so the mismatch surfaces downstream.
#[derive(Debug, Clone)]
pub struct FastaAnalysis {
    name: String,
    identifier: String,
    contigs: Vec<(String, Arc<Vec<u8>>)>,
    reference_lengths: Vec<ContigInfo>,
}

impl FastaAnalysis {
    pub fn open(name: &str, identifier: &str, path: &Path) -> Result<Self> {
        let contigs = read_contigs(path)?
            .into_iter()
            .map(|(contig, calls)| (contig, Arc::new(calls)))
            .collect();
        Ok(Self::from_contigs(name, identifier, contigs))
    }

    pub fn from_contigs(name: &str, identifier: &str, contigs: Vec<(String, Arc<Vec<u8>>)>) -> Self {
        Self {
            name: name.to_string(),
            identifier: identifier.to_string(),
            contigs,
            reference_lengths: Vec::new(),
        }
    }

    /// Pad every contig to the length of the matching reference contig.
    pub fn with_reference(mut self, contigs: &[ContigInfo]) -> Self {
        self.reference_lengths = contigs.to_vec();
        self
    }

    fn reference_length(&self, contig: &str) -> Option<u64> {
        self.reference_lengths
            .iter()
            .find(|info| info.name == contig)
            .map(|info| info.length)
    }
}

impl SampleAnalysis for FastaAnalysis {
    fn name(&self) -> &str {
        &self.name
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn get_contig(&self, contig: &str) -> Result<PositionStream<PositionCallRecord>> {
        let calls = match self.contigs.iter().find(|(name, _)| name == contig) {
            Some((_, calls)) => Arc::clone(calls),
            None => {
                warn!("{} has no contig {}; treating it as uncalled", self.identifier, contig);
                Arc::new(Vec::new())
            }
        };

        let length = self
            .reference_length(contig)
            .map_or(calls.len(), |length| calls.len().max(length as usize));
        let padded = (0..calls.len())
            .map(move |i| calls[i])
            .chain(iter::repeat(b'X'))
            .take(length);
        Ok(Box::new(padded.enumerate().map(|(i, call)| {
            Ok(PositionCallRecord::new(
                i as u64 + 1,
                call,
                Metric::Unavailable,
                Metric::Unavailable,
            ))
        })))
    }
}
