use super::types::PositionInfo;
use crate::error::Result;

/// Receives every classified position of one contig, in position order.
///
/// Dropping a sink without calling [`PositionSink::finish`] must still release its
/// resources; `finish` is where buffered output is flushed and errors reported.
pub trait PositionSink {
    fn write(&mut self, position: u64, info: &PositionInfo) -> Result<()>;

    fn finish(self: Box<Self>) -> Result<()>;
}

/// Opens one sink per contig task. Shared read-only by every worker.
pub trait SinkFactory: Send + Sync {
    /// `identifiers` lists the analyses in the order their calls appear in
    /// [`PositionInfo::call_str`].
    fn open(&self, contig: &str, identifiers: &[String]) -> Result<Box<dyn PositionSink>>;
}

/// Discards every position.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSinkFactory;

struct NullSink;

impl PositionSink for NullSink {
    fn write(&mut self, _position: u64, _info: &PositionInfo) -> Result<()> {
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

impl SinkFactory for NullSinkFactory {
    fn open(&self, _contig: &str, _identifiers: &[String]) -> Result<Box<dyn PositionSink>> {
        Ok(Box::new(NullSink))
    }
}

/// Fans every position out to several sinks.
pub struct MultiSink {
    sinks: Vec<Box<dyn PositionSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn PositionSink>>) -> Self {
        Self { sinks }
    }
}

impl PositionSink for MultiSink {
    fn write(&mut self, position: u64, info: &PositionInfo) -> Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.write(position, info)?;
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        let mut first_error = None;
        for sink in self.sinks {
            if let Err(e) = sink.finish() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
