//! In-memory genomes and analyses, handy for tests and for callers that already
//! hold their calls in memory.

use crate::consensus::source::{DuplicateMask, PositionStream, ReferenceGenome, SampleAnalysis};
use crate::consensus::types::{
    ContigInfo, DuplicateFlag, Metric, PositionCallRecord, ReferencePosition,
};
use crate::error::{AnalysisError, Result};
use std::sync::Arc;

/// Named sequences kept in insertion order. Serves as a reference or a duplicate mask.
#[derive(Debug, Clone, Default)]
pub struct MemoryGenome {
    contigs: Vec<(String, Arc<Vec<u8>>)>,
}

impl MemoryGenome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contig(mut self, name: &str, sequence: &[u8]) -> Self {
        self.contigs
            .push((name.to_string(), Arc::new(sequence.to_vec())));
        self
    }

    fn sequence(&self, contig: &str, source_name: &str) -> Result<Arc<Vec<u8>>> {
        self.contigs
            .iter()
            .find(|(name, _)| name == contig)
            .map(|(_, sequence)| Arc::clone(sequence))
            .ok_or_else(|| AnalysisError::MissingContig {
                source_name: source_name.to_string(),
                contig: contig.to_string(),
            })
    }
}

impl ReferenceGenome for MemoryGenome {
    fn contigs(&self) -> Vec<ContigInfo> {
        self.contigs
            .iter()
            .map(|(name, sequence)| ContigInfo {
                name: name.clone(),
                length: sequence.len() as u64,
            })
            .collect()
    }

    fn positions(&self, contig: &str) -> Result<PositionStream<ReferencePosition>> {
        let sequence = self.sequence(contig, "reference")?;
        Ok(Box::new(
            (0..sequence.len()).map(move |i| Ok(ReferencePosition::new(sequence[i]))),
        ))
    }
}

impl DuplicateMask for MemoryGenome {
    fn positions(&self, contig: &str) -> Result<PositionStream<DuplicateFlag>> {
        let sequence = self.sequence(contig, "duplicates")?;
        Ok(Box::new(
            (0..sequence.len()).map(move |i| Ok(DuplicateFlag::from_symbol(sequence[i]))),
        ))
    }
}

/// A sample analysis whose records are held in memory.
#[derive(Debug, Clone)]
pub struct MemoryAnalysis {
    name: String,
    identifier: String,
    contigs: Vec<(String, Arc<Vec<PositionCallRecord>>)>,
}

impl MemoryAnalysis {
    pub fn new(name: &str, identifier: &str) -> Self {
        Self {
            name: name.to_string(),
            identifier: identifier.to_string(),
            contigs: Vec::new(),
        }
    }

    /// Calls without coverage or proportion data.
    pub fn with_contig(self, contig: &str, calls: &[u8]) -> Self {
        let records = calls
            .iter()
            .enumerate()
            .map(|(i, &call)| {
                PositionCallRecord::new(i as u64 + 1, call, Metric::Unavailable, Metric::Unavailable)
            })
            .collect();
        self.with_records(contig, records)
    }

    pub fn with_records(mut self, contig: &str, records: Vec<PositionCallRecord>) -> Self {
        self.contigs.push((contig.to_string(), Arc::new(records)));
        self
    }
}

impl SampleAnalysis for MemoryAnalysis {
    fn name(&self) -> &str {
        &self.name
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn get_contig(&self, contig: &str) -> Result<PositionStream<PositionCallRecord>> {
        let records = self
            .contigs
            .iter()
            .find(|(name, _)| name == contig)
            .map(|(_, records)| Arc::clone(records))
            .ok_or_else(|| AnalysisError::MissingContig {
                source_name: self.identifier.clone(),
                contig: contig.to_string(),
            })?;
        Ok(Box::new(
            (0..records.len()).map(move |i| Ok(records[i].clone())),
        ))
    }
}
