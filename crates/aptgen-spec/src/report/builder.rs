//! Builder pattern for creating reports.

use super::{Report, ReportError, ReportWarning, RoundSummary, REPORT_VERSION};
use crate::error::{ValidationError, ValidationWarning};
use crate::hash::round_hash;

/// Builder for creating reports ergonomically.
pub struct ReportBuilder {
    manifest_hash: String,
    source_hash: Option<String>,
    source_version: Option<String>,
    ok: bool,
    errors: Vec<ReportError>,
    warnings: Vec<ReportWarning>,
    rounds: Vec<RoundSummary>,
    duration_ms: u64,
    driver_version: String,
}

impl ReportBuilder {
    /// Creates a new report builder.
    ///
    /// # Example
    ///
    /// ```
    /// use aptgen_spec::report::ReportBuilder;
    ///
    /// let report = ReportBuilder::new("a1b2c3".to_string(), "aptgen v0.1.0".to_string())
    ///     .ok(true)
    ///     .duration_ms(12)
    ///     .build();
    /// assert!(report.ok);
    /// assert!(report.output_hash.is_none());
    /// ```
    pub fn new(manifest_hash: String, driver_version: String) -> Self {
        Self {
            manifest_hash,
            source_hash: None,
            source_version: None,
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            rounds: Vec::new(),
            duration_ms: 0,
            driver_version,
        }
    }

    /// Sets the ok status.
    pub fn ok(mut self, ok: bool) -> Self {
        self.ok = ok;
        self
    }

    /// Sets the hash of the manifest file bytes.
    pub fn source_hash(mut self, hash: impl Into<String>) -> Self {
        self.source_hash = Some(hash.into());
        self
    }

    /// Sets the source version the rounds ran with.
    pub fn source_version(mut self, version: impl Into<String>) -> Self {
        self.source_version = Some(version.into());
        self
    }

    /// Adds an error to the report.
    pub fn error(mut self, error: ReportError) -> Self {
        self.errors.push(error);
        self.ok = false;
        self
    }

    /// Adds errors from ValidationErrors.
    pub fn validation_errors(mut self, errors: &[ValidationError]) -> Self {
        if !errors.is_empty() {
            self.ok = false;
            self.errors
                .extend(errors.iter().map(ReportError::from_validation_error));
        }
        self
    }

    /// Adds a warning to the report.
    pub fn warning(mut self, warning: ReportWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Adds warnings from ValidationWarnings.
    pub fn validation_warnings(mut self, warnings: &[ValidationWarning]) -> Self {
        self.warnings
            .extend(warnings.iter().map(ReportWarning::from_validation_warning));
        self
    }

    /// Adds a completed round.
    pub fn round(mut self, round: RoundSummary) -> Self {
        self.rounds.push(round);
        self
    }

    /// Adds multiple completed rounds.
    pub fn rounds(mut self, rounds: Vec<RoundSummary>) -> Self {
        self.rounds.extend(rounds);
        self
    }

    /// Sets the execution duration in milliseconds.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Builds the final report. The output hash is derived from the rounds'
    /// written artifacts and is absent when nothing was written.
    pub fn build(self) -> Report {
        let outputs: Vec<_> = self
            .rounds
            .iter()
            .flat_map(|r| r.outputs.iter().cloned())
            .collect();
        let output_hash = if outputs.is_empty() {
            None
        } else {
            Some(round_hash(&outputs))
        };

        Report {
            report_version: REPORT_VERSION,
            manifest_hash: self.manifest_hash,
            source_hash: self.source_hash,
            source_version: self.source_version,
            ok: self.ok,
            errors: self.errors,
            warnings: self.warnings,
            rounds: self.rounds,
            output_hash,
            duration_ms: self.duration_ms,
            driver_version: self.driver_version,
        }
    }
}
