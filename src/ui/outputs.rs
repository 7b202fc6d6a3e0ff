//! Step outputs in the `GITHUB_OUTPUT` file format.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use uuid::Uuid;

use crate::error::Result;

/// Ordered `(name, value)` outputs of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutputs {
    entries: Vec<(String, String)>,
}

impl ActionOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any earlier value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render one output entry.
///
/// Multi-line values use the heredoc form with a random delimiter.
pub fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
    } else {
        format!("{}={}\n", name, value)
    }
}

/// Append `outputs` to the file at `path`
pub fn write_github_output(path: &Path, outputs: &ActionOutputs) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    for (name, value) in outputs.iter() {
        file.write_all(format_output(name, value).as_bytes())?;
    }

    Ok(())
}

/// Print outputs to stdout when no output file is configured
pub fn print_outputs(outputs: &ActionOutputs) {
    for (name, value) in outputs.iter() {
        print!("{}", format_output(name, value));
    }
}
