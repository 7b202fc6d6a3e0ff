//! Collaborators that consume the commits since the previous tag
//!
//! The workflow only relies on the two traits below. The defaults keep the
//! release policy fixed to patch bumps and render a plain commit listing.

use crate::domain::{Commit, VersionBump};

/// Decides which version component to bump from the commits since the last tag
pub trait CommitAnalyzer: Send + Sync {
    fn analyze(&self, commits: &[Commit]) -> VersionBump;
}

/// Renders changelog text from the commits since the last tag
pub trait NotesGenerator: Send + Sync {
    fn generate(&self, commits: &[Commit]) -> String;
}

/// Analyzer that always requests a patch bump
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOnlyAnalyzer;

impl CommitAnalyzer for PatchOnlyAnalyzer {
    fn analyze(&self, _commits: &[Commit]) -> VersionBump {
        VersionBump::Patch
    }
}

/// Lists each commit subject with its abbreviated hash, oldest first
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitListNotes;

impl NotesGenerator for CommitListNotes {
    fn generate(&self, commits: &[Commit]) -> String {
        commits
            .iter()
            .filter(|commit| !commit.subject().is_empty())
            .map(|commit| format!("- {} ({})", commit.subject(), commit.short_hash()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
