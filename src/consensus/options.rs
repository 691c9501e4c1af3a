use crate::error::{AnalysisError, Result};

pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 10.0;
pub const DEFAULT_PROPORTION_THRESHOLD: f64 = 0.9;

#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    /// Minimum depth for a call to pass the coverage filter.
    pub coverage_threshold: f64,
    /// Minimum fraction of reads supporting a call to pass the proportion filter.
    pub proportion_threshold: f64,
    pub threads: usize,
    pub show_progress: bool,
}

impl AnalysisOptions {
    pub fn new(coverage_threshold: f64, proportion_threshold: f64, threads: usize) -> Self {
        Self {
            coverage_threshold,
            proportion_threshold,
            threads,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.coverage_threshold.is_finite() || self.coverage_threshold < 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "coverage threshold must be a non-negative number, got {}",
                self.coverage_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.proportion_threshold) {
            return Err(AnalysisError::Configuration(format!(
                "proportion threshold must be between 0 and 1, got {}",
                self.proportion_threshold
            )));
        }
        if self.threads == 0 {
            return Err(AnalysisError::Configuration(
                "at least one worker thread is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(DEFAULT_COVERAGE_THRESHOLD, DEFAULT_PROPORTION_THRESHOLD, threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(AnalysisOptions::new(10.0, 0.9, 4).validate().is_ok());
        assert!(AnalysisOptions::new(0.0, 0.0, 1).validate().is_ok());

        for options in [
            AnalysisOptions::new(-1.0, 0.9, 4),
            AnalysisOptions::new(f64::NAN, 0.9, 4),
            AnalysisOptions::new(10.0, 1.5, 4),
            AnalysisOptions::new(10.0, f64::NAN, 4),
            AnalysisOptions::new(10.0, 0.9, 0),
        ] {
            assert!(matches!(
                options.validate(),
                Err(AnalysisError::Configuration(_))
            ));
        }
    }
}
