use crate::consensus::options::AnalysisOptions;
use crate::consensus::types::{
    is_no_call, AllStats, AnalysisFlags, AnyStats, DuplicateFlag, PositionCallRecord,
    PositionInfo, ReferencePosition, SampleFlags,
};

/// Compare every analysis at a single reference position.
///
/// `samples` holds one record per analysis, grouped by sample name. Quality breadth
/// for the whole position requires, for every sample, that each analysis made a
/// call, passed both filters, and agrees with the other analyses of the sample, on a
/// clean, non-duplicated reference base.
pub fn analyze_position(
    options: &AnalysisOptions,
    reference: &ReferencePosition,
    duplicate: DuplicateFlag,
    samples: &[Vec<PositionCallRecord>],
) -> PositionInfo {
    let is_reference_clean = reference.simple_call != b'N';
    let is_reference_duplicated = duplicate.is_duplicated();
    let quality_reference = is_reference_clean && !is_reference_duplicated;

    let num_analyses: usize = samples.iter().map(Vec::len).sum();

    // Assume true until proven otherwise.
    let mut info = PositionInfo {
        is_all_called: true,
        is_reference_clean,
        is_reference_duplicated,
        is_all_passed_coverage: true,
        is_all_passed_proportion: true,
        is_all_passed_consensus: true,
        is_all_quality_breadth: quality_reference,
        is_any_snp: false,
        is_best_snp: false,
        is_missing_data: false,
        was_called: 0,
        called_reference: 0,
        called_snp: 0,
        called_degen: 0,
        passed_coverage_filter: 0,
        passed_proportion_filter: 0,
        num_a: 0,
        num_c: 0,
        num_g: 0,
        num_t: 0,
        num_n: 0,
        call_str: Vec::with_capacity(num_analyses + 1),
        call_was_made: Vec::with_capacity(num_analyses),
        passed_depth_filter: Vec::with_capacity(num_analyses),
        passed_proportion_filter_str: Vec::with_capacity(num_analyses),
        pattern: Vec::with_capacity(num_analyses + 1),
        genome_any: AnyStats::new(),
        genome_all: AllStats::new(),
        sample_stats: Vec::with_capacity(samples.len()),
    };

    info.call_str.push(reference.call);
    let mut pattern = PatternBuilder::default();
    info.pattern.push(pattern.symbol(reference.simple_call, is_reference_clean));

    for sample in samples {
        let is_consensus = match sample.first() {
            Some(first) => sample.iter().all(|a| a.simple_call == first.simple_call),
            None => true,
        };
        let mut is_sample_quality = is_consensus;
        let mut analyses = Vec::with_capacity(sample.len());

        for analysis in sample {
            let flags = classify_analysis(options, reference, quality_reference, analysis);

            info.call_str.push(analysis.call);
            info.call_was_made
                .push(if flags.was_called { b'Y' } else { b'N' });
            info.passed_depth_filter
                .push(analysis.coverage.filter_symbol(options.coverage_threshold));
            info.passed_proportion_filter_str
                .push(analysis.proportion.filter_symbol(options.proportion_threshold));
            info.pattern.push(pattern.symbol(
                analysis.simple_call,
                flags.was_called && flags.quality_breadth,
            ));

            match analysis.simple_call {
                b'A' => info.num_a += 1,
                b'C' => info.num_c += 1,
                b'G' => info.num_g += 1,
                b'T' => info.num_t += 1,
                _ => info.num_n += 1,
            }
            info.was_called += flags.was_called as u32;
            info.passed_coverage_filter += flags.passed_coverage_filter as u32;
            info.passed_proportion_filter += flags.passed_proportion_filter as u32;
            info.called_reference += flags.called_reference as u32;
            info.called_snp += flags.called_snp as u32;
            info.called_degen += flags.called_degen as u32;

            info.is_all_called &= flags.was_called;
            info.is_all_passed_coverage &= flags.passed_coverage_filter;
            info.is_all_passed_proportion &= flags.passed_proportion_filter;
            is_sample_quality &= flags.was_called && flags.quality_breadth;

            info.genome_any.observe(&flags);
            info.genome_all.observe(&flags);
            analyses.push(flags);
        }

        info.is_all_passed_consensus &= is_consensus;
        info.is_all_quality_breadth &= is_sample_quality;
        info.sample_stats.push(SampleFlags::from_analyses(analyses));
    }

    info.is_any_snp = info.called_snp > 0;
    info.is_best_snp = info.is_all_quality_breadth && info.is_any_snp;
    info.is_missing_data = info.is_any_snp;
    info
}

fn classify_analysis(
    options: &AnalysisOptions,
    reference: &ReferencePosition,
    quality_reference: bool,
    analysis: &PositionCallRecord,
) -> AnalysisFlags {
    let mut flags = AnalysisFlags {
        was_called: !is_no_call(analysis.call),
        passed_coverage_filter: analysis.coverage.passes(options.coverage_threshold),
        passed_proportion_filter: analysis.proportion.passes(options.proportion_threshold),
        ..AnalysisFlags::default()
    };

    // Only count significant measurements.
    if flags.passed_coverage_filter && flags.passed_proportion_filter && quality_reference {
        flags.quality_breadth = true;
        if !flags.was_called {
            flags.called_degen = true;
        } else if analysis.call == reference.call {
            flags.called_reference = true;
        } else {
            flags.called_snp = true;
        }
    }
    flags
}

/// Numbers distinct bases in order of first appearance, starting at '1'.
#[derive(Default)]
struct PatternBuilder {
    seen: Vec<u8>,
}

impl PatternBuilder {
    fn symbol(&mut self, simple_call: u8, usable: bool) -> u8 {
        if !usable || simple_call == b'N' {
            return b'N';
        }
        let index = match self.seen.iter().position(|&b| b == simple_call) {
            Some(index) => index,
            None => {
                self.seen.push(simple_call);
                self.seen.len() - 1
            }
        };
        b'1' + index as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::types::Metric;

    fn options() -> AnalysisOptions {
        AnalysisOptions::new(10.0, 0.9, 1)
    }

    fn call(call: u8, coverage: f64, proportion: f64) -> PositionCallRecord {
        PositionCallRecord::new(1, call, Metric::Value(coverage), Metric::Value(proportion))
    }

    fn analyze(reference: u8, duplicate: u8, samples: &[Vec<PositionCallRecord>]) -> PositionInfo {
        analyze_position(
            &options(),
            &ReferencePosition::new(reference),
            DuplicateFlag::from_symbol(duplicate),
            samples,
        )
    }

    #[test]
    fn test_snp_between_two_samples_is_best_snp() {
        let info = analyze(
            b'A',
            b'0',
            &[vec![call(b'A', 15.0, 0.95)], vec![call(b'G', 15.0, 0.95)]],
        );

        assert!(info.is_all_called);
        assert!(info.is_all_quality_breadth);
        assert!(info.is_any_snp);
        assert!(info.is_best_snp);
        assert!(info.is_missing_data);
        assert_eq!(info.num_a, 1);
        assert_eq!(info.num_g, 1);
        assert_eq!(info.called_reference, 1);
        assert_eq!(info.called_snp, 1);
        assert_eq!(info.call_str, b"AAG");
        assert_eq!(info.call_was_made, b"YY");
        assert_eq!(info.passed_depth_filter, b"YY");
        assert_eq!(info.pattern, b"112");
    }

    #[test]
    fn test_uncalled_sample_blocks_quality_breadth() {
        let info = analyze(
            b'A',
            b'0',
            &[vec![call(b'A', 15.0, 0.95)], vec![call(b'N', 15.0, 0.95)]],
        );

        assert!(!info.is_all_called);
        assert!(!info.is_all_quality_breadth);
        assert!(!info.is_best_snp);
        assert!(!info.is_any_snp);
        assert_eq!(info.called_degen, 1);
        assert_eq!(info.num_n, 1);
        assert_eq!(info.call_was_made, b"YN");
        assert_eq!(info.pattern, b"11N");
        // The N call still passed its filters on a clean reference.
        assert!(info.sample_stats[1].analyses[0].quality_breadth);
        assert!(!info.sample_stats[1].analyses[0].was_called);
    }

    #[test]
    fn test_best_snp_requires_every_sample_quality_breadth() {
        let info = analyze(
            b'A',
            b'0',
            &[vec![call(b'G', 15.0, 0.95)], vec![call(b'A', 2.0, 0.95)]],
        );

        assert!(info.is_any_snp);
        assert!(!info.is_all_quality_breadth);
        assert!(!info.is_best_snp);
        assert!(!info.is_all_passed_coverage);
        assert!(info.is_all_passed_proportion);
        assert_eq!(info.passed_depth_filter, b"YN");
    }

    #[test]
    fn test_consensus_failure_within_sample() {
        let info = analyze(
            b'A',
            b'0',
            &[vec![call(b'A', 15.0, 0.95), call(b'C', 15.0, 0.95)]],
        );

        assert!(!info.is_all_passed_consensus);
        assert!(!info.is_all_quality_breadth);
        assert!(!info.is_best_snp);
        assert!(info.is_any_snp);
        assert!(info.is_missing_data);
        // Per-analysis quality breadth is unaffected by consensus.
        let sample = &info.sample_stats[0];
        assert!(sample.all.0.quality_breadth);
        assert!(sample.any.0.called_snp);
        assert!(!sample.all.0.called_snp);
    }

    #[test]
    fn test_missing_data_ignores_consensus_of_other_samples() {
        let info = analyze(
            b'A',
            b'0',
            &[
                vec![call(b'G', 15.0, 0.95)],
                vec![call(b'A', 15.0, 0.95), call(b'C', 15.0, 0.95)],
            ],
        );

        assert!(info.is_any_snp);
        assert!(!info.is_all_passed_consensus);
        assert!(!info.is_best_snp);
        assert!(info.is_missing_data);
    }

    #[test]
    fn test_any_all_per_sample() {
        let info = analyze(
            b'A',
            b'0',
            &[
                vec![call(b'A', 15.0, 0.95), call(b'X', 15.0, 0.95)],
                vec![call(b'A', 15.0, 0.95)],
            ],
        );

        let first = &info.sample_stats[0];
        assert!(first.any.0.was_called);
        assert!(!first.all.0.was_called);
        assert!(first.any.0.called_degen);
        assert!(!first.all.0.called_degen);

        let second = &info.sample_stats[1];
        assert!(second.any.0.was_called && second.all.0.was_called);
        assert!(second.all.0.called_reference);

        assert!(info.genome_any.0.called_degen);
        assert!(!info.genome_all.0.was_called);
        assert!(info.genome_all.0.quality_breadth);
    }

    #[test]
    fn test_sentinels_ignore_thresholds() {
        for threshold in [0.0, 1.0, 10.0, 1000.0] {
            let options = AnalysisOptions::new(threshold, 0.0, 1);
            let unavailable =
                PositionCallRecord::new(1, b'A', Metric::Unavailable, Metric::Unavailable);
            let missing = PositionCallRecord::new(1, b'A', Metric::Missing, Metric::Missing);
            let info = analyze_position(
                &options,
                &ReferencePosition::new(b'A'),
                DuplicateFlag::Unique,
                &[vec![unavailable], vec![missing]],
            );
            assert!(info.sample_stats[0].analyses[0].passed_coverage_filter);
            assert!(!info.sample_stats[1].analyses[0].passed_coverage_filter);
            assert_eq!(info.passed_depth_filter, b"-?");
            assert_eq!(info.passed_proportion_filter_str, b"-?");
            assert_eq!(info.passed_coverage_filter, 1);
        }
    }

    #[test]
    fn test_duplicated_or_unclean_reference_fails_quality_breadth() {
        let samples = [vec![call(b'G', 15.0, 0.95)]];

        let duplicated = analyze(b'A', b'1', &samples);
        assert!(duplicated.is_reference_duplicated);
        assert!(!duplicated.is_all_quality_breadth);
        assert!(!duplicated.is_any_snp);
        assert_eq!(duplicated.called_snp, 0);

        let unclean = analyze(b'N', b'0', &samples);
        assert!(!unclean.is_reference_clean);
        assert!(!unclean.is_all_quality_breadth);
        assert_eq!(unclean.pattern, b"NN");
    }

    #[test]
    fn test_tallies_cover_every_analysis() {
        let samples = vec![
            vec![call(b'A', 15.0, 0.95), call(b'R', 15.0, 0.95)],
            vec![call(b'c', 1.0, 0.1), call(b'X', 15.0, 0.95), call(b'T', 15.0, 0.95)],
            vec![call(b'G', 15.0, 0.95)],
        ];
        let info = analyze(b'A', b'0', &samples);

        let total = info.num_a + info.num_c + info.num_g + info.num_t + info.num_n;
        assert_eq!(total as usize, 6);
        assert_eq!(info.num_analyses(), 6);
        assert_eq!(info.num_n, 2);
        assert_eq!(info.num_c, 1);
        assert_eq!(info.analysis_calls(), b"ARCXTG");
        assert_eq!(info.reference_call(), b'A');
    }

    #[test]
    fn test_no_analyses() {
        let info = analyze(b'C', b'0', &[]);
        assert!(info.is_all_called);
        assert!(info.is_all_quality_breadth);
        assert!(!info.is_best_snp);
        assert_eq!(info.call_str, b"C");
    }
}
