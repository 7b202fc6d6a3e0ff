/// Ref prefix stripped to obtain a branch name
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Branches allowed to receive release tags
pub const RELEASE_BRANCHES: [&str; 2] = ["main", "master"];

/// Derive a branch name from a ref (e.g., "refs/heads/main" -> "main")
///
/// Refs without the branch prefix are returned unchanged.
pub fn branch_from_ref(git_ref: &str) -> &str {
    git_ref.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(git_ref)
}

/// Represents a git branch with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_main: bool,
}

impl BranchContext {
    /// Create a new branch context
    pub fn new(name: impl Into<String>) -> Self {
        let name_str = name.into();
        let is_main = RELEASE_BRANCHES.contains(&name_str.as_str());

        BranchContext {
            name: name_str,
            is_main,
        }
    }

    /// Create a branch context from a full ref
    pub fn from_ref(git_ref: &str) -> Self {
        Self::new(branch_from_ref(git_ref))
    }

    /// Check if this is a release branch (main/master)
    pub fn is_release_branch(&self) -> bool {
        self.is_main
    }
}
