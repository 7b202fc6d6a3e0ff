use std::cmp::Ordering;

use semver::Version;

use crate::error::{AutotagError, Result};

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    /// Bump version according to bump type
    ///
    /// Prerelease and build metadata are always dropped. Returns `None` when
    /// the incremented component would overflow.
    pub fn apply(self, version: &Version) -> Option<Version> {
        let (major, minor, patch) = match self {
            VersionBump::Major => (version.major.checked_add(1)?, 0, 0),
            VersionBump::Minor => (version.major, version.minor.checked_add(1)?, 0),
            VersionBump::Patch => (version.major, version.minor, version.patch.checked_add(1)?),
        };

        Some(Version::new(major, minor, patch))
    }
}

/// Parse the semantic version carried by a tag name after removing `prefix`.
///
/// A single leading `v` on the remainder is tolerated, so `release-v1.2.3`
/// under prefix `release-` parses as `1.2.3`.
///
/// # Example
/// ```
/// # use git_autotag::domain::version::parse_prefixed_version;
/// let v = parse_prefixed_version("release-1.10.0", "release-").unwrap();
/// assert_eq!(v.to_string(), "1.10.0");
/// assert!(parse_prefixed_version("other-1.0.0", "release-").is_none());
/// ```
pub fn parse_prefixed_version(tag_name: &str, prefix: &str) -> Option<Version> {
    let remainder = tag_name.strip_prefix(prefix)?;
    let remainder = remainder.strip_prefix('v').unwrap_or(remainder);
    Version::parse(remainder).ok()
}

/// Compare two versions by SemVer precedence (build metadata ignored)
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Apply `bump` to `previous` and check that the result is still a valid
/// semantic version.
pub fn next_version(previous: &Version, bump: VersionBump) -> Result<Version> {
    let incremented = bump
        .apply(previous)
        .ok_or_else(|| AutotagError::parse("Could not increment version."))?;

    let rendered = incremented.to_string();
    Version::parse(&rendered)
        .map_err(|_| AutotagError::parse(format!("{} is not a valid semver.", rendered)))
}

/// Resolve the version that follows the one carried by `tag_name`
pub fn resolve_next_version(tag_name: &str, prefix: &str, bump: VersionBump) -> Result<Version> {
    let previous = parse_prefixed_version(tag_name, prefix)
        .ok_or_else(|| AutotagError::parse("Could not parse previous tag."))?;

    next_version(&previous, bump)
}

/// Join the configured prefix and a version into a tag name
pub fn build_tag_name(prefix: &str, version: &Version) -> String {
    format!("{}{}", prefix, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_prefixed_version() {
        assert_eq!(parse_prefixed_version("v1.2.3", "v"), Some(v("1.2.3")));
        assert_eq!(
            parse_prefixed_version("release-1.1.0", "release-"),
            Some(v("1.1.0"))
        );
        assert_eq!(parse_prefixed_version("1.2.3", ""), Some(v("1.2.3")));
    }

    #[test]
    fn test_parse_tolerates_leading_v() {
        assert_eq!(parse_prefixed_version("v1.2.3", ""), Some(v("1.2.3")));
        assert_eq!(
            parse_prefixed_version("release-v2.0.0", "release-"),
            Some(v("2.0.0"))
        );
    }

    #[test]
    fn test_parse_prefixed_version_invalid() {
        assert!(parse_prefixed_version("release-abc", "release-").is_none());
        assert!(parse_prefixed_version("other-9.9.9", "release-").is_none());
        assert!(parse_prefixed_version("v1.2", "v").is_none());
        assert!(parse_prefixed_version("v1.2.3.4", "v").is_none());
        assert!(parse_prefixed_version("v01.2.3", "v").is_none());
    }

    #[test]
    fn test_prefix_is_literal() {
        assert!(parse_prefixed_version("rXlease-1.0.0", "r.lease-").is_none());
    }

    #[test]
    fn test_version_bump_major() {
        assert_eq!(VersionBump::Major.apply(&v("1.2.3")), Some(v("2.0.0")));
    }

    #[test]
    fn test_version_bump_minor() {
        assert_eq!(VersionBump::Minor.apply(&v("1.2.3")), Some(v("1.3.0")));
    }

    #[test]
    fn test_version_bump_patch() {
        assert_eq!(VersionBump::Patch.apply(&v("1.2.3")), Some(v("1.2.4")));
    }

    #[test]
    fn test_patch_bump_drops_prerelease_and_build() {
        let next = VersionBump::Patch.apply(&v("1.2.3-beta.1+build.7")).unwrap();
        assert_eq!(next.to_string(), "1.2.4");
        assert!(next.pre.is_empty());
        assert!(next.build.is_empty());
    }

    #[test]
    fn test_patch_bump_keeps_major_minor() {
        for input in ["0.0.0", "0.1.9", "3.14.15", "10.0.99-rc.1", "1.0.0+meta"] {
            let previous = v(input);
            let next = next_version(&previous, VersionBump::Patch).unwrap();
            assert_eq!(next.major, previous.major);
            assert_eq!(next.minor, previous.minor);
            assert_eq!(next.patch, previous.patch + 1);
            assert!(next.pre.is_empty() && next.build.is_empty());
        }
    }

    #[test]
    fn test_bump_overflow_is_rejected() {
        let previous = Version::new(1, 2, u64::MAX);
        let err = next_version(&previous, VersionBump::Patch).unwrap_err();
        assert_eq!(err.to_string(), "Could not increment version.");
    }

    #[test]
    fn test_resolve_next_version() {
        let next = resolve_next_version("release-1.1.0", "release-", VersionBump::Patch).unwrap();
        assert_eq!(next, v("1.1.1"));
    }

    #[test]
    fn test_resolve_next_version_from_fallback() {
        let next = resolve_next_version("v0.0.0", "v", VersionBump::Patch).unwrap();
        assert_eq!(next, v("0.0.1"));
    }

    #[test]
    fn test_resolve_next_version_unparsable() {
        let err = resolve_next_version("release-abc", "release-", VersionBump::Patch).unwrap_err();
        assert_eq!(err.to_string(), "Could not parse previous tag.");
    }

    #[test]
    fn test_build_tag_name_round_trips() {
        let version = v("4.5.6-alpha.2+exp.sha");
        let tag = build_tag_name("release-", &version);
        assert_eq!(tag, "release-4.5.6-alpha.2+exp.sha");
        assert_eq!(parse_prefixed_version(&tag, "release-"), Some(version));
    }

    #[test]
    fn test_precedence_is_numeric() {
        assert_eq!(cmp_precedence(&v("1.10.0"), &v("1.2.10")), Ordering::Greater);
        assert_eq!(cmp_precedence(&v("1.0.0"), &v("1.0.0-rc.1")), Ordering::Greater);
        assert_eq!(cmp_precedence(&v("1.0.0-alpha"), &v("1.0.0-alpha.1")), Ordering::Less);
        assert_eq!(cmp_precedence(&v("1.0.0+a"), &v("1.0.0+b")), Ordering::Equal);
    }
}
