//! Processor options (`-A key=value`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Option key naming the generated-sources output directory.
pub const GENERATED_DIR_OPTION: &str = "kapt.kotlin.generated";

/// Errors produced while parsing processor options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// The entry is not of the form `key=value`.
    #[error("processor option must be of the form key=value: '{0}'")]
    Malformed(String),
}

/// Key/value options handed to every processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessorOptions {
    values: BTreeMap<String, String>,
}

impl ProcessorOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `key=value` entries. Each entry must split into exactly two parts
    /// with a non-empty key.
    ///
    /// # Example
    /// ```
    /// use aptgen_spec::options::ProcessorOptions;
    ///
    /// let opts = ProcessorOptions::parse(["debug=true", "kapt.kotlin.generated=out"]).unwrap();
    /// assert_eq!(opts.get("debug"), Some("true"));
    /// assert_eq!(opts.generated_dir(), Some("out"));
    /// ```
    pub fn parse<I, S>(entries: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::new();
        for entry in entries {
            let (key, value) = parse_entry(entry.as_ref())?;
            options.values.insert(key, value);
        }
        Ok(options)
    }

    /// Sets an option, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the generated-sources directory, if configured.
    pub fn generated_dir(&self) -> Option<&str> {
        self.get(GENERATED_DIR_OPTION).filter(|v| !v.is_empty())
    }

    /// Iterates options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no options are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_entry(entry: &str) -> Result<(String, String), OptionsError> {
    let parts: Vec<&str> = entry.split('=').collect();
    match parts.as_slice() {
        [key, value] if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(OptionsError::Malformed(entry.to_string())),
    }
}
