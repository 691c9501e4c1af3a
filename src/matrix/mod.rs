//! Tab-separated per-contig matrices of classified positions.

mod writer;

pub use writer::{MatrixKind, MatrixWriter};

use crate::consensus::sink::{MultiSink, PositionSink, SinkFactory};
use crate::error::Result;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

/// Opens one file per contig and matrix kind under `dir`.
#[derive(Debug, Clone)]
pub struct MatrixSinkFactory {
    dir: PathBuf,
    kinds: Vec<MatrixKind>,
}

impl MatrixSinkFactory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            kinds: MatrixKind::ALL.to_vec(),
        }
    }

    pub fn with_kinds(mut self, kinds: &[MatrixKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn path_for(&self, contig: &str, kind: MatrixKind) -> PathBuf {
        self.dir.join(format!("{}_{}.tsv", contig, kind.suffix()))
    }
}

impl SinkFactory for MatrixSinkFactory {
    fn open(&self, contig: &str, identifiers: &[String]) -> Result<Box<dyn PositionSink>> {
        fs::create_dir_all(&self.dir)?;
        let mut sinks: Vec<Box<dyn PositionSink>> = Vec::with_capacity(self.kinds.len());
        for &kind in &self.kinds {
            let file = File::create(self.path_for(contig, kind))?;
            sinks.push(Box::new(MatrixWriter::new(
                contig,
                kind,
                identifiers,
                BufWriter::new(file),
            )?));
        }
        Ok(Box::new(MultiSink::new(sinks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_factory_creates_one_file_per_kind() {
        let dir = tempdir().unwrap();
        let factory = MatrixSinkFactory::new(dir.path().join("matrices"))
            .with_kinds(&[MatrixKind::Master, MatrixKind::BestSnp]);

        let sink = factory
            .open("chr1", &["s1::a".to_string()])
            .unwrap();
        sink.finish().unwrap();

        assert!(factory.path_for("chr1", MatrixKind::Master).exists());
        assert!(factory.path_for("chr1", MatrixKind::BestSnp).exists());
        assert!(!factory.path_for("chr1", MatrixKind::MissingData).exists());
        assert!(dir.path().join("matrices/chr1_master.tsv").exists());
    }
}
