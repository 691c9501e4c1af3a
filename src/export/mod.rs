use crate::consensus::stats::ContigStats;
use crate::consensus::GenomeSummary;
use chrono::{DateTime, Utc};
use serde::de::{Deserializer, Error};
use serde::{Deserialize, Serialize, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const SUMMARY_FILE: &str = "summary.json";

/// JSON rendition of a finished run.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryExport {
    pub version: String,
    #[serde(serialize_with = "serialize_datetime", deserialize_with = "deserialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub tool_version: String,

    pub metadata: ExportMetadata,
    pub whole_genome: ContigStats,

    #[serde(flatten)]
    pub summary: GenomeSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub reference: String,
    pub duplicates: Option<String>,
    pub coverage_threshold: f64,
    pub proportion_threshold: f64,
}

impl SummaryExport {
    pub fn new(summary: GenomeSummary, metadata: ExportMetadata) -> Self {
        Self {
            version: "1.0".to_string(),
            created_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            metadata,
            whole_genome: summary.whole_genome(),
            summary,
        }
    }

    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::stats::SampleAnalysisStats;
    use crate::consensus::SampleInfo;

    #[test]
    fn test_summary_round_trips_through_json() {
        let mut contig = ContigStats::new("chr1");
        contig.reference_length = 12;
        contig.best_snps = 3;
        let summary = GenomeSummary {
            contigs: vec![contig],
            samples: SampleAnalysisStats::for_group_sizes([1]),
            groups: vec![SampleInfo {
                name: "s1".to_string(),
                analyses: vec!["s1::a".to_string()],
            }],
        };
        let export = SummaryExport::new(
            summary.clone(),
            ExportMetadata {
                reference: "ref.fasta".to_string(),
                duplicates: None,
                coverage_threshold: 10.0,
                proportion_threshold: 0.9,
            },
        );

        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"whole_genome\""));
        let parsed: SummaryExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary, summary);
        assert_eq!(parsed.whole_genome.name, "Whole Genome");
        assert_eq!(parsed.whole_genome.best_snps, 3);
        assert_eq!(parsed.created_at.timestamp(), export.created_at.timestamp());
    }
}
