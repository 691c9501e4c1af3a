//! Genome and sample sources backing the consensus traits.

pub mod fasta;
pub mod memory;

pub use fasta::{load_genome, FastaAnalysis};
pub use memory::{MemoryAnalysis, MemoryGenome};
