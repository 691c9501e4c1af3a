use nasp_tools::commands::analyze::{run, AnalyzeArgs};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn args(dir: &Path, samples: Vec<String>) -> AnalyzeArgs {
    AnalyzeArgs {
        reference: dir.join("reference.fasta"),
        duplicates: Some(dir.join("duplicates.txt")),
        output_dir: dir.join("out"),
        coverage: Some(10.0),
        proportion: Some(0.9),
        threads: Some(2),
        json: true,
        no_matrices: false,
        samples,
    }
}

#[test]
fn test_analyze_writes_matrices_and_statistics() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("reference.fasta"), ">chr1 test\nACGTACGT\n>chr2\nGGCC\n");
    write(&dir.path().join("duplicates.txt"), ">chr1\n00000011\n>chr2\n0000\n");
    write(&dir.path().join("s1.fasta"), ">franken::chr1\nACGTACGA\n>franken::chr2\nGGCA\n");
    write(&dir.path().join("s2.fasta"), ">franken::chr1\nACGTAC\n>franken::chr2\nGGCC\n");

    run(args(
        dir.path(),
        vec![
            format!("s1::bwa,gatk={}", dir.path().join("s1.fasta").display()),
            dir.path().join("s2.fasta").display().to_string(),
        ],
    ))
    .unwrap();

    let out = dir.path().join("out");
    for contig in ["chr1", "chr2"] {
        for kind in ["master", "bestsnp", "missingdata"] {
            assert!(out.join(format!("matrices/{}_{}.tsv", contig, kind)).exists());
        }
    }

    let master = fs::read_to_string(out.join("matrices/chr1_master.tsv")).unwrap();
    let header = master.lines().next().unwrap();
    assert!(header.starts_with("LocusID\tReference\ts1::bwa,gatk\ts2::frankenfasta\t"));
    assert_eq!(master.lines().count(), 9);
    // s2 stops after six bases; the rest reads as uncalled.
    assert!(master.lines().nth(7).unwrap().starts_with("chr1::7\tG\tG\tX\t"));

    let general = fs::read_to_string(out.join("statistics/general_stats.tsv")).unwrap();
    let lines: Vec<&str> = general.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[2].starts_with("Whole Genome\t12\t12\t100.00%\t2\t16.67%\t"));
    assert!(lines[3].starts_with("chr1\t8\t"));
    assert!(lines[4].starts_with("chr2\t4\t"));
    // Only chr2:4 is a SNP on a clean, unique base called by every sample.
    assert!(lines[2].ends_with("\t1\t8.33%\t1\t8.33%"));

    let samples = fs::read_to_string(out.join("statistics/sample_stats.tsv")).unwrap();
    assert!(samples.contains("\ns1\ts1::bwa,gatk\t12\t100.00%\t"));
    assert!(samples.contains("\ns2\ts2::frankenfasta\t10\t83.33%\t"));

    let json = fs::read_to_string(out.join("statistics/summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["whole_genome"]["reference_length"], 12);
    assert_eq!(value["groups"][1]["name"], "s2");
}

#[test]
fn test_analyze_rejects_mismatched_duplicates() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("reference.fasta"), ">chr1\nACGT\n");
    write(&dir.path().join("duplicates.txt"), ">chr1\n00\n");
    write(&dir.path().join("s1.fasta"), ">franken::chr1\nACGT\n");

    let mut analyze = args(
        dir.path(),
        vec![dir.path().join("s1.fasta").display().to_string()],
    );
    analyze.json = false;
    let err = run(analyze).unwrap_err();

    assert!(format!("{:#}", err).contains("duplicates"));
    assert!(!dir.path().join("out/statistics/general_stats.tsv").exists());
}

#[test]
fn test_analyze_rejects_invalid_thresholds() {
    let dir = tempdir().unwrap();
    let mut analyze = args(dir.path(), vec!["missing.fasta".to_string()]);
    analyze.proportion = Some(1.5);

    let err = run(analyze).unwrap_err();
    assert!(format!("{:#}", err).contains("proportion threshold"));
}

#[test]
fn test_analyze_rejects_sample_longer_than_reference() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("reference.fasta"), ">chr1\nACGT\n");
    write(&dir.path().join("duplicates.txt"), ">chr1\n0000\n");
    write(&dir.path().join("s1.fasta"), ">franken::chr1\nACGTACGTAC\n");

    let mut analyze = args(
        dir.path(),
        vec![dir.path().join("s1.fasta").display().to_string()],
    );
    analyze.json = false;
    let err = run(analyze).unwrap_err();

    assert!(format!("{:#}", err).contains("continues past the end of contig 'chr1'"));
    assert!(!dir.path().join("out/statistics/general_stats.tsv").exists());
}
