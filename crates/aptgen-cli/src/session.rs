//! Multi-round processing sessions.
//!
//! Files written in one round are compilation inputs of the next: each becomes
//! an element (package, file stem, no annotations) presented in the following
//! round. The session stops after the first round that writes nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use aptgen_spec::{
    AnnotatedElement, ArtifactKey, ReportWarning, RoundSummary, SourceVersion, WarningCode,
    WrittenArtifact, GENERATED_DIR_OPTION,
};
use walkdir::WalkDir;

use crate::driver::{GenerationDriver, RoundInput, RoundOutcome};
use crate::error::{RoundError, SessionError};
use crate::registry::ProcessorRegistry;

/// Default upper bound on the number of rounds in a session.
pub const DEFAULT_MAX_ROUNDS: u32 = 16;

/// A processing session over one registry.
pub struct Session {
    driver: GenerationDriver,
    registry: ProcessorRegistry,
    max_rounds: u32,
    clean: bool,
}

/// Result of a session that converged.
#[derive(Debug, Clone, Default)]
pub struct SessionOutcome {
    /// Every round that ran, including the final one that wrote nothing.
    pub rounds: Vec<RoundOutcome>,
    /// Session-level and round warnings, in the order raised.
    pub warnings: Vec<ReportWarning>,
}

impl SessionOutcome {
    /// Files written across all rounds.
    pub fn written(&self) -> impl Iterator<Item = &WrittenArtifact> {
        self.rounds.iter().flat_map(|r| r.written.iter())
    }

    /// Report summaries for every round.
    pub fn summaries(&self) -> Vec<RoundSummary> {
        self.rounds.iter().map(RoundOutcome::summary).collect()
    }
}

impl Session {
    /// Creates a session.
    pub fn new(driver: GenerationDriver, registry: ProcessorRegistry) -> Self {
        Self {
            driver,
            registry,
            max_rounds: DEFAULT_MAX_ROUNDS,
            clean: false,
        }
    }

    /// Sets the round limit.
    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Empties the output directory before the first round.
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// The registry the session drives.
    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    /// The driver the session drives.
    pub fn driver(&self) -> &GenerationDriver {
        &self.driver
    }

    /// Runs rounds until one writes nothing.
    pub fn run(
        &mut self,
        elements: Vec<AnnotatedElement>,
        source_version: SourceVersion,
    ) -> Result<SessionOutcome, SessionError> {
        let mut outcome = SessionOutcome {
            rounds: Vec::new(),
            warnings: self.unrecognized_options(),
        };

        if self.clean {
            self.clean_output()
                .map_err(|error| fail(1, error, &outcome))?;
        }

        let mut history: BTreeMap<ArtifactKey, String> = BTreeMap::new();
        let mut presented: BTreeSet<String> = BTreeSet::new();
        let mut pending = elements;
        let mut round = 1u32;

        loop {
            if round > 1 {
                pending.retain(|e| !presented.contains(&e.qualified_name()));
                if pending.is_empty() {
                    tracing::debug!("no new elements after round {}", round - 1);
                    break;
                }
            }
            if round > self.max_rounds {
                return Err(fail(
                    round,
                    RoundError::RoundLimitExceeded(self.max_rounds),
                    &outcome,
                ));
            }

            let input = RoundInput {
                round,
                source_version,
                elements: std::mem::take(&mut pending),
            };
            let result = self
                .driver
                .run_round_with_history(&input, &mut self.registry, &history)
                .map_err(|error| fail(round, error, &outcome))?;

            presented.extend(input.elements.iter().map(AnnotatedElement::qualified_name));
            for written in &result.written {
                history.insert(
                    written.key(),
                    format!("'{}' (round {})", written.processor, round),
                );
                pending.push(AnnotatedElement::new(
                    written.package.clone(),
                    file_stem(written.file_name()),
                ));
            }

            let done = !result.needs_another_round();
            outcome.warnings.extend(result.warnings.iter().cloned());
            outcome.rounds.push(result);
            if done {
                break;
            }
            round += 1;
        }

        tracing::info!(
            rounds = outcome.rounds.len(),
            written = outcome.written().count(),
            "session converged"
        );
        Ok(outcome)
    }

    fn unrecognized_options(&self) -> Vec<ReportWarning> {
        let supported = self.registry.supported_options();
        self.driver
            .options()
            .iter()
            .filter(|(key, _)| *key != GENERATED_DIR_OPTION && !supported.contains(*key))
            .map(|(key, _)| {
                let message = format!("option '{}' is not recognized by any processor", key);
                tracing::warn!("{}", message);
                ReportWarning::new(WarningCode::UnrecognizedOption.code(), message)
            })
            .collect()
    }

    fn clean_output(&self) -> Result<(), RoundError> {
        let dir = self.driver.output_dir()?;
        if !dir.exists() {
            return Ok(());
        }
        tracing::info!("cleaning {}", dir.display());
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| RoundError::Io {
                path: dir.clone(),
                source: e.into(),
            })?;
            remove_entry(entry.path(), entry.file_type().is_dir())?;
        }
        Ok(())
    }
}

fn remove_entry(path: &Path, is_dir: bool) -> Result<(), RoundError> {
    let result = if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|source| RoundError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

fn fail(round: u32, error: RoundError, outcome: &SessionOutcome) -> SessionError {
    SessionError {
        round,
        error,
        completed: outcome.summaries(),
    }
}
