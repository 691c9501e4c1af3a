use super::source::{PositionStream, SampleAnalysis};
use super::types::PositionCallRecord;
use crate::error::{AnalysisError, Result};

/// Analyses that share one sample name, in a fixed order.
pub type SampleGroup<'a> = Vec<&'a dyn SampleAnalysis>;

struct Cursor {
    identifier: String,
    stream: PositionStream<PositionCallRecord>,
}

/// Reads the position streams of every analysis in lockstep.
///
/// Each call to [`SamplePositions::advance`] takes exactly one record from every
/// stream and returns them grouped the same way as the analyses were grouped:
///
/// ```text
///   sample groups: ( (a1, a2), (b1) )
///   each step:     ( (a1@pos, a2@pos), (b1@pos) )
/// ```
///
/// The order of records matches the order of analyses, which is how a record is
/// tied back to the analysis that produced it.
pub struct SamplePositions {
    contig: String,
    cursors: Vec<Vec<Cursor>>,
    current: Vec<Vec<PositionCallRecord>>,
    step: u64,
}

impl SamplePositions {
    pub fn new(contig: &str, sample_groups: &[SampleGroup<'_>]) -> Result<Self> {
        let mut cursors = Vec::with_capacity(sample_groups.len());
        for group in sample_groups {
            let mut group_cursors = Vec::with_capacity(group.len());
            for analysis in group {
                group_cursors.push(Cursor {
                    identifier: analysis.identifier().to_string(),
                    stream: analysis.get_contig(contig)?,
                });
            }
            cursors.push(group_cursors);
        }

        let current = cursors
            .iter()
            .map(|group: &Vec<Cursor>| Vec::with_capacity(group.len()))
            .collect();

        Ok(Self {
            contig: contig.to_string(),
            cursors,
            current,
            step: 0,
        })
    }

    /// Number of positions assembled so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.cursors
            .iter()
            .flatten()
            .map(|cursor| cursor.identifier.clone())
            .collect()
    }

    /// Pull the next record from every stream.
    pub fn advance(&mut self) -> Result<&[Vec<PositionCallRecord>]> {
        self.step += 1;
        let step = self.step;

        for (group, records) in self.cursors.iter_mut().zip(self.current.iter_mut()) {
            records.clear();
            for cursor in group.iter_mut() {
                let record = match cursor.stream.next() {
                    Some(record) => record?,
                    None => {
                        return Err(AnalysisError::StreamExhausted {
                            contig: self.contig.clone(),
                            stream: cursor.identifier.clone(),
                            position: step,
                        })
                    }
                };
                if record.position != step {
                    return Err(AnalysisError::OutOfOrder {
                        contig: self.contig.clone(),
                        stream: cursor.identifier.clone(),
                        expected: step,
                        found: record.position,
                    });
                }
                records.push(record);
            }
        }

        Ok(&self.current)
    }

    /// Check that every stream ended together with the reference.
    pub fn finish(&mut self) -> Result<()> {
        for cursor in self.cursors.iter_mut().flatten() {
            if cursor.stream.next().is_some() {
                return Err(AnalysisError::StreamOverrun {
                    contig: self.contig.clone(),
                    stream: cursor.identifier.clone(),
                    length: self.step,
                });
            }
        }
        Ok(())
    }
}
