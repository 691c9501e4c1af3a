use super::types::{ContigInfo, DuplicateFlag, PositionCallRecord, ReferencePosition};
use crate::error::Result;

/// A lazy, single-pass sequence of per-position records for one contig.
pub type PositionStream<T> = Box<dyn Iterator<Item = Result<T>> + Send>;

/// The genome every analysis was compared against.
pub trait ReferenceGenome: Send + Sync {
    /// Contigs in reference order.
    fn contigs(&self) -> Vec<ContigInfo>;

    fn positions(&self, contig: &str) -> Result<PositionStream<ReferencePosition>>;
}

/// Marks reference positions that fall in self-duplicated regions.
pub trait DuplicateMask: Send + Sync {
    fn positions(&self, contig: &str) -> Result<PositionStream<DuplicateFlag>>;
}

/// One aligner/caller combination applied to one sample.
pub trait SampleAnalysis: Send + Sync {
    fn name(&self) -> &str;

    /// Unique label such as `sample1::bwamem,gatk`; reporting only.
    fn identifier(&self) -> &str;

    fn get_contig(&self, contig: &str) -> Result<PositionStream<PositionCallRecord>>;
}
