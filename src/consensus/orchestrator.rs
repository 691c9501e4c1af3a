use crate::consensus::options::AnalysisOptions;
use crate::consensus::profilers::contig_profiler::{profile_contig, ContigResult};
use crate::consensus::sink::SinkFactory;
use crate::consensus::source::{DuplicateMask, ReferenceGenome, SampleAnalysis};
use crate::consensus::stats::{ContigStats, SampleAnalysisStats};
use crate::consensus::sync::SampleGroup;
use crate::consensus::types::ContigInfo;
use crate::error::{AnalysisError, Result};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use crossbeam_channel::{unbounded, Receiver};
use indicatif::ProgressBar;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// A sample name and the identifiers of its analyses, in grouping order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleInfo {
    pub name: String,
    pub analyses: Vec<String>,
}

/// Everything a run produces besides the per-position stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeSummary {
    /// One entry per reference contig, in reference order.
    pub contigs: Vec<ContigStats>,
    /// Whole-genome per-sample statistics, shaped like `groups`.
    pub samples: SampleAnalysisStats,
    pub groups: Vec<SampleInfo>,
}

impl GenomeSummary {
    fn empty(groups: Vec<SampleInfo>) -> Self {
        let samples = SampleAnalysisStats::for_group_sizes(groups.iter().map(|g| g.analyses.len()));
        Self {
            contigs: Vec::new(),
            samples,
            groups,
        }
    }

    fn add_contig(&mut self, result: ContigResult) -> Result<()> {
        self.samples
            .merge(&result.sample_stats)
            .map_err(|e| e.in_contig(&result.stats.name))?;
        self.contigs.push(result.stats);
        Ok(())
    }

    pub fn whole_genome(&self) -> ContigStats {
        ContigStats::whole_genome(&self.contigs)
    }

    pub fn reference_length(&self) -> u64 {
        self.contigs.iter().map(|c| c.reference_length).sum()
    }
}

/// Sort analyses by sample name then identifier, and group equal sample names.
pub fn group_analyses<'a>(analyses: &[&'a dyn SampleAnalysis]) -> Vec<SampleGroup<'a>> {
    let mut sorted = analyses.to_vec();
    sorted.sort_by(|a, b| {
        a.name()
            .cmp(b.name())
            .then_with(|| a.identifier().cmp(b.identifier()))
    });

    let mut groups: Vec<SampleGroup<'a>> = Vec::new();
    for analysis in sorted {
        match groups.last_mut() {
            Some(group) if group[0].name() == analysis.name() => group.push(analysis),
            _ => groups.push(vec![analysis]),
        }
    }
    groups
}

/// Runs one contig task per reference contig on a fixed pool of workers and folds
/// the results into whole-genome totals.
///
/// Workers take contigs in reference order. Results may arrive in any order; they
/// are parked in a buffer keyed by submission number and folded strictly in
/// reference order, so the totals do not depend on the number of workers.
pub struct SampleAnalysisOrchestrator<'a> {
    options: AnalysisOptions,
    reference: &'a dyn ReferenceGenome,
    duplicates: Option<&'a dyn DuplicateMask>,
    sample_groups: Vec<SampleGroup<'a>>,
}

impl<'a> SampleAnalysisOrchestrator<'a> {
    pub fn new(
        options: AnalysisOptions,
        reference: &'a dyn ReferenceGenome,
        duplicates: Option<&'a dyn DuplicateMask>,
        analyses: &[&'a dyn SampleAnalysis],
    ) -> Self {
        Self {
            options,
            reference,
            duplicates,
            sample_groups: group_analyses(analyses),
        }
    }

    pub fn sample_groups(&self) -> &[SampleGroup<'a>] {
        &self.sample_groups
    }

    pub fn groups(&self) -> Vec<SampleInfo> {
        self.sample_groups
            .iter()
            .map(|group| SampleInfo {
                name: group[0].name().to_string(),
                analyses: group.iter().map(|a| a.identifier().to_string()).collect(),
            })
            .collect()
    }

    pub fn run(&self, sinks: &dyn SinkFactory) -> Result<GenomeSummary> {
        self.options.validate()?;

        let contigs = self.reference.contigs();
        let workers = self.options.threads.min(contigs.len()).max(1);
        if let Ok(cpus) = thread::available_parallelism() {
            if self.options.threads > cpus.get() {
                warn!(
                    "{} threads requested but only {} CPUs are available",
                    self.options.threads, cpus
                );
            }
        }
        info!(
            "Analyzing {} contigs across {} samples ({} analyses) with {} workers",
            contigs.len(),
            self.sample_groups.len(),
            self.sample_groups.iter().map(Vec::len).sum::<usize>(),
            workers
        );

        let progress = self.progress_bar(contigs.iter().map(|c| c.length).sum());
        let cancelled = AtomicBool::new(false);

        let (job_tx, job_rx) = unbounded::<(usize, ContigInfo)>();
        for job in contigs.iter().cloned().enumerate() {
            // The receiver is alive until every worker exits.
            let _ = job_tx.send(job);
        }
        drop(job_tx);
        let (result_tx, result_rx) = unbounded::<(usize, Result<ContigResult>)>();

        let (folded, panicked) = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let cancelled = &cancelled;
                let progress = &progress;
                handles.push(scope.spawn(move || {
                    while let Ok((sequence, contig)) = job_rx.recv() {
                        if cancelled.load(Ordering::SeqCst) {
                            break;
                        }
                        let result = self
                            .analyze_contig(&contig, sinks, progress)
                            .map_err(|e| {
                                cancelled.store(true, Ordering::SeqCst);
                                error!("Contig {} failed: {}", contig.name, e);
                                e.in_contig(&contig.name)
                            });
                        if result_tx.send((sequence, result)).is_err() {
                            break;
                        }
                    }
                }));
            }
            drop(result_tx);

            let folded = self.fold_results(&contigs, result_rx, &cancelled);

            let mut panicked = None;
            for handle in handles {
                if let Err(payload) = handle.join() {
                    panicked.get_or_insert_with(|| panic_message(payload));
                }
            }
            (folded, panicked)
        });

        match (folded, panicked) {
            (Err(e), _) if !matches!(e, AnalysisError::WorkerPanicked(_)) => {
                progress.abandon_with_message("Analysis failed");
                Err(e)
            }
            (_, Some(message)) => {
                progress.abandon_with_message("Analysis failed");
                error!("A worker panicked: {}", message);
                Err(AnalysisError::WorkerPanicked(message))
            }
            (folded, None) => {
                let summary = folded?;
                progress.finish_with_message("Analysis complete");
                info!(
                    "Analyzed {} positions on {} contigs",
                    summary.reference_length(),
                    summary.contigs.len()
                );
                Ok(summary)
            }
        }
    }

    fn analyze_contig(
        &self,
        contig: &ContigInfo,
        sinks: &dyn SinkFactory,
        progress: &ProgressBar,
    ) -> Result<ContigResult> {
        info!("Processing {} ({} bp)", contig.name, contig.length);
        profile_contig(
            &self.options,
            contig,
            self.reference,
            self.duplicates,
            &self.sample_groups,
            sinks,
            progress,
        )
    }

    /// Fold contig results in submission order. The first failure received wins.
    fn fold_results(
        &self,
        contigs: &[ContigInfo],
        results: Receiver<(usize, Result<ContigResult>)>,
        cancelled: &AtomicBool,
    ) -> Result<GenomeSummary> {
        let mut summary = GenomeSummary::empty(self.groups());
        let mut pending: BTreeMap<usize, ContigResult> = BTreeMap::new();
        let mut next = 0;

        while next < contigs.len() {
            let (sequence, result) = match results.recv() {
                Ok(message) => message,
                Err(_) => {
                    cancelled.store(true, Ordering::SeqCst);
                    return Err(AnalysisError::WorkerPanicked(format!(
                        "no result received for contig {}",
                        contigs[next].name
                    )));
                }
            };

            match result {
                Ok(result) => {
                    pending.insert(sequence, result);
                }
                Err(e) => {
                    cancelled.store(true, Ordering::SeqCst);
                    return Err(e);
                }
            }

            while let Some(result) = pending.remove(&next) {
                if let Err(e) = summary.add_contig(result) {
                    cancelled.store(true, Ordering::SeqCst);
                    return Err(e);
                }
                next += 1;
            }
        }
        Ok(summary)
    }

    fn progress_bar(&self, total_positions: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        match ProgressBarBuilder::new("Analyzing positions")
            .with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .with_length(total_positions)
            .with_tick()
            .build()
        {
            Ok(progress) => progress,
            Err(e) => {
                warn!("Progress display disabled: {}", e);
                ProgressBar::hidden()
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
