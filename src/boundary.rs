use std::fmt;

/// Warnings raised at the edges of the tag history.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag matched the prefix, so versioning starts from zero
    NoPrefixedTags { prefix: String },
    /// Only the first page of tags was read and it was full
    TagListTruncated { fetched: usize },
    /// No new commits since the latest tag
    NoNewCommits {
        latest_tag: String,
        current_commit: String,
    },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoPrefixedTags { prefix } => {
                write!(
                    f,
                    "No tag matches prefix '{}' followed by a semantic version; starting from {}0.0.0",
                    prefix, prefix
                )
            }
            BoundaryWarning::TagListTruncated { fetched } => {
                write!(
                    f,
                    "Only the first {} tags were considered; set fetch_all_tags to 'true' to read every page",
                    fetched
                )
            }
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit,
            } => {
                let short_hash = current_commit.get(..7).unwrap_or(current_commit);
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag, short_hash
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_prefixed_tags_display() {
        let warning = BoundaryWarning::NoPrefixedTags {
            prefix: "release-".to_string(),
        };
        assert!(warning.to_string().contains("release-0.0.0"));
    }

    #[test]
    fn test_no_new_commits_shortens_hash() {
        let warning = BoundaryWarning::NoNewCommits {
            latest_tag: "v1.0.0".to_string(),
            current_commit: "abc1234def5678".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("v1.0.0"));
        assert!(msg.contains("abc1234"));
        assert!(!msg.contains("abc1234d"));
    }

    #[test]
    fn test_no_new_commits_short_hash_kept() {
        let warning = BoundaryWarning::NoNewCommits {
            latest_tag: "v1.0.0".to_string(),
            current_commit: "abc".to_string(),
        };
        assert!(warning.to_string().ends_with("(current: abc)"));
    }

    #[test]
    fn test_truncated_display() {
        let warning = BoundaryWarning::TagListTruncated { fetched: 100 };
        assert!(warning.to_string().contains("first 100 tags"));
    }
}
