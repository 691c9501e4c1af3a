pub mod contig_profiler;
pub mod position_profiler;
