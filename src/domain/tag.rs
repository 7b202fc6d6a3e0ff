use semver::Version;
use tracing::debug;

use super::version::{cmp_precedence, parse_prefixed_version};

/// Commit pointer used by the fallback tag when no prefixed tag exists
pub const FALLBACK_COMMIT: &str = "HEAD";

/// Represents a git tag as reported by the tag repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
    pub commit_url: String,
}

impl Tag {
    /// Create a new tag pointing at `commit_sha`
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            commit_sha: commit_sha.into(),
            commit_url: String::new(),
        }
    }

    /// Attach the API URL of the tagged commit
    pub fn with_commit_url(mut self, url: impl Into<String>) -> Self {
        self.commit_url = url.into();
        self
    }

    /// Synthetic `<prefix>0.0.0` tag used when nothing matches the prefix
    pub fn fallback(prefix: &str) -> Self {
        Tag::new(format!("{}0.0.0", prefix), FALLBACK_COMMIT)
    }

    /// Extract the version carried by this tag under `prefix`
    pub fn version(&self, prefix: &str) -> Option<Version> {
        parse_prefixed_version(&self.name, prefix)
    }
}

/// Tags split by whether they follow the prefix + semver naming scheme
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagPartition {
    /// Valid tags, highest version first
    pub valid: Vec<(Tag, Version)>,
    /// Tags missing the prefix or carrying an unparsable version
    pub invalid: Vec<Tag>,
}

/// Split `tags` into valid and invalid tags for `prefix`.
///
/// Valid tags are sorted by descending version precedence. The sort is
/// stable, so tags with equal precedence keep their listing order.
pub fn partition_tags(tags: &[Tag], prefix: &str) -> TagPartition {
    let mut partition = TagPartition::default();

    for tag in tags {
        match tag.version(prefix) {
            Some(version) => partition.valid.push((tag.clone(), version)),
            None => partition.invalid.push(tag.clone()),
        }
    }

    partition
        .valid
        .sort_by(|(_, a), (_, b)| cmp_precedence(b, a));

    partition
}

/// Select the tag carrying the highest version under `prefix`.
///
/// Falls back to [`Tag::fallback`] when no tag is valid.
pub fn select_latest_tag(tags: &[Tag], prefix: &str) -> Tag {
    let partition = partition_tags(tags, prefix);

    for tag in &partition.invalid {
        debug!(tag = %tag.name, "Found invalid tag");
    }
    for (tag, _) in &partition.valid {
        debug!(tag = %tag.name, "Found valid tag");
    }

    partition
        .valid
        .into_iter()
        .next()
        .map(|(tag, _)| tag)
        .unwrap_or_else(|| Tag::fallback(prefix))
}
