use crate::consensus::orchestrator::{GenomeSummary, SampleInfo};
use crate::consensus::stats::{ContigStats, SampleAnalysisStats, StatCounts};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const GENERAL_STATS_FILE: &str = "general_stats.tsv";
pub const SAMPLE_STATS_FILE: &str = "sample_stats.tsv";

/// Write both statistics tables into `dir`.
pub fn write_reports(dir: &Path, summary: &GenomeSummary) -> io::Result<()> {
    let mut general = BufWriter::new(File::create(dir.join(GENERAL_STATS_FILE))?);
    write_general_stats(&mut general, &summary.contigs)?;
    general.flush()?;

    let mut samples = BufWriter::new(File::create(dir.join(SAMPLE_STATS_FILE))?);
    write_sample_stats(
        &mut samples,
        &summary.samples,
        &summary.groups,
        summary.reference_length(),
    )?;
    samples.flush()
}

/// One row per contig preceded by the whole-genome sum. Every count is followed by
/// its share of the contig's reference length.
pub fn write_general_stats<W: Write>(writer: &mut W, contigs: &[ContigStats]) -> io::Result<()> {
    let mut header = vec!["Contig".to_string(), "reference_length".to_string()];
    for column in ContigStats::COLUMNS {
        header.push(column.to_string());
        header.push(format!("{} (%)", column));
    }
    writeln!(writer, "{}", header.join("\t"))?;
    writeln!(writer)?;

    let whole_genome = ContigStats::whole_genome(contigs);
    for contig in std::iter::once(&whole_genome).chain(contigs) {
        write!(writer, "{}\t{}", contig.name, contig.reference_length)?;
        write_counts(writer, &contig.values(), contig.reference_length)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Whole-genome any/all rows, then for each sample its any/all rows and one row per
/// analysis. Blocks are separated by blank lines.
pub fn write_sample_stats<W: Write>(
    writer: &mut W,
    stats: &SampleAnalysisStats,
    groups: &[SampleInfo],
    reference_length: u64,
) -> io::Result<()> {
    let mut header = vec!["Sample".to_string(), "Sample::Analysis".to_string()];
    for column in StatCounts::COLUMNS {
        header.push(column.to_string());
        header.push(format!("{} (%)", column));
    }
    writeln!(writer, "{}", header.join("\t"))?;
    writeln!(writer)?;

    write_sample_row(writer, "[any]", "", &stats.genome_any, reference_length)?;
    write_sample_row(writer, "[all]", "", &stats.genome_all, reference_length)?;

    for (group, sample) in groups.iter().zip(&stats.samples) {
        writeln!(writer)?;
        write_sample_row(writer, &group.name, "[any]", &sample.any, reference_length)?;
        write_sample_row(writer, &group.name, "[all]", &sample.all, reference_length)?;
        for (identifier, counts) in group.analyses.iter().zip(&sample.analyses) {
            write_sample_row(writer, &group.name, identifier, counts, reference_length)?;
        }
    }
    Ok(())
}

fn write_sample_row<W: Write>(
    writer: &mut W,
    sample: &str,
    analysis: &str,
    counts: &StatCounts,
    reference_length: u64,
) -> io::Result<()> {
    write!(writer, "{}\t{}", sample, analysis)?;
    write_counts(writer, &counts.values(), reference_length)?;
    writeln!(writer)
}

fn write_counts<W: Write>(writer: &mut W, values: &[u64], total: u64) -> io::Result<()> {
    for value in values {
        write!(writer, "\t{}\t{}", value, percent(*value, total))?;
    }
    Ok(())
}

fn percent(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", count as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contig(name: &str, values: [u64; 10]) -> ContigStats {
        ContigStats {
            name: name.to_string(),
            reference_length: values[0],
            reference_clean: values[1],
            reference_duplicated: values[2],
            all_called: values[3],
            all_passed_coverage: values[4],
            all_passed_proportion: values[5],
            all_passed_consensus: values[6],
            quality_breadth: values[7],
            any_snps: values[8],
            best_snps: values[9],
        }
    }

    #[test]
    fn test_general_stats_layout() {
        let contigs = vec![
            contig("contig0_name", [10, 9, 8, 7, 6, 5, 4, 3, 2, 1]),
            contig("contig1_name", [20, 19, 18, 17, 16, 15, 14, 13, 12, 11]),
        ];
        let mut out = Vec::new();
        write_general_stats(&mut out, &contigs).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Contig\treference_length\treference_clean\treference_clean (%)\treference_duplicated\treference_duplicated (%)\tall_called\tall_called (%)\tall_passed_coverage\tall_passed_coverage (%)\tall_passed_proportion\tall_passed_proportion (%)\tall_passed_consensus\tall_passed_consensus (%)\tquality_breadth\tquality_breadth (%)\tany_snps\tany_snps (%)\tbest_snps\tbest_snps (%)"
        );
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2],
            "Whole Genome\t30\t28\t93.33%\t26\t86.67%\t24\t80.00%\t22\t73.33%\t20\t66.67%\t18\t60.00%\t16\t53.33%\t14\t46.67%\t12\t40.00%"
        );
        assert_eq!(
            lines[3],
            "contig0_name\t10\t9\t90.00%\t8\t80.00%\t7\t70.00%\t6\t60.00%\t5\t50.00%\t4\t40.00%\t3\t30.00%\t2\t20.00%\t1\t10.00%"
        );
        assert_eq!(
            lines[4],
            "contig1_name\t20\t19\t95.00%\t18\t90.00%\t17\t85.00%\t16\t80.00%\t15\t75.00%\t14\t70.00%\t13\t65.00%\t12\t60.00%\t11\t55.00%"
        );
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_sample_stats_layout() {
        let mut stats = SampleAnalysisStats::for_group_sizes([2, 1]);
        stats.samples[1].analyses[0].called_snp = 21;
        let groups = vec![
            SampleInfo {
                name: "sample0".to_string(),
                analyses: vec![
                    "sample0::aligner,snpcaller".to_string(),
                    "sample0::aligner,snpcaller".to_string(),
                ],
            },
            SampleInfo {
                name: "sample1".to_string(),
                analyses: vec!["sample1::aligner,snpcaller".to_string()],
            },
        ];

        let mut out = Vec::new();
        write_sample_stats(&mut out, &stats, &groups, 42).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        let zeros = "\t0\t0.00%".repeat(7);
        assert_eq!(
            lines[0],
            "Sample\tSample::Analysis\twas_called\twas_called (%)\tpassed_coverage_filter\tpassed_coverage_filter (%)\tpassed_proportion_filter\tpassed_proportion_filter (%)\tquality_breadth\tquality_breadth (%)\tcalled_reference\tcalled_reference (%)\tcalled_snp\tcalled_snp (%)\tcalled_degen\tcalled_degen (%)"
        );
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], format!("[any]\t{}", zeros));
        assert_eq!(lines[3], format!("[all]\t{}", zeros));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], format!("sample0\t[any]{}", zeros));
        assert_eq!(lines[6], format!("sample0\t[all]{}", zeros));
        assert_eq!(lines[7], format!("sample0\tsample0::aligner,snpcaller{}", zeros));
        assert_eq!(lines[8], format!("sample0\tsample0::aligner,snpcaller{}", zeros));
        assert_eq!(lines[9], "");
        assert_eq!(lines[10], format!("sample1\t[any]{}", zeros));
        assert_eq!(lines[11], format!("sample1\t[all]{}", zeros));
        assert_eq!(
            lines[12],
            "sample1\tsample1::aligner,snpcaller\t0\t0.00%\t0\t0.00%\t0\t0.00%\t0\t0.00%\t0\t0.00%\t21\t50.00%\t0\t0.00%"
        );
        assert_eq!(lines.len(), 13);
    }

    #[test]
    fn test_empty_genome_reports_zero_percent() {
        let mut out = Vec::new();
        write_general_stats(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Whole Genome\t0\t0\t0.00%\t0\t0.00%\t0\t0.00%\t0\t0.00%\t0\t0.00%\t0\t0.00%\t0\t0.00%\t0\t0.00%\t0\t0.00%\n"));
    }
}
