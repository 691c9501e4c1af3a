use thiserror::Error;

/// Errors raised while synchronizing and classifying per-position streams.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("stream '{stream}' ended at position {position} of contig '{contig}' while other streams continue")]
    StreamExhausted {
        contig: String,
        stream: String,
        position: u64,
    },

    #[error("stream '{stream}' continues past the end of contig '{contig}' ({length} positions)")]
    StreamOverrun {
        contig: String,
        stream: String,
        length: u64,
    },

    #[error("stream '{stream}' produced position {found} of contig '{contig}', expected {expected}")]
    OutOfOrder {
        contig: String,
        stream: String,
        expected: u64,
        found: u64,
    },

    #[error("{source_name} has no contig named '{contig}'")]
    MissingContig { source_name: String, contig: String },

    #[error("sample statistics grouped as {found:?} cannot be merged into {expected:?}")]
    GroupingMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("contig '{contig}' failed")]
    ContigTask {
        contig: String,
        #[source]
        source: Box<AnalysisError>,
    },

    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("{stream}: {message}")]
    Source { stream: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub(crate) fn in_contig(self, contig: &str) -> Self {
        match self {
            AnalysisError::ContigTask { .. } => self,
            other => AnalysisError::ContigTask {
                contig: contig.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// True for errors caused by misaligned or truncated input streams.
    pub fn is_stream_mismatch(&self) -> bool {
        match self {
            AnalysisError::StreamExhausted { .. }
            | AnalysisError::StreamOverrun { .. }
            | AnalysisError::OutOfOrder { .. } => true,
            AnalysisError::ContigTask { source, .. } => source.is_stream_mismatch(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
