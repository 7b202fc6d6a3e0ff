/// A commit returned by a commit-range comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub message: String,
}

impl Commit {
    /// Create a new commit
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Commit {
            hash: hash.into(),
            message: message.into(),
        }
    }

    /// First line of the commit message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Hash abbreviated to seven characters
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_is_first_line() {
        let commit = Commit::new("abc", "fix: handle empty tags\n\nLonger body");
        assert_eq!(commit.subject(), "fix: handle empty tags");
    }

    #[test]
    fn test_subject_of_empty_message() {
        assert_eq!(Commit::new("abc", "").subject(), "");
    }

    #[test]
    fn test_short_hash() {
        let commit = Commit::new("0123456789abcdef", "msg");
        assert_eq!(commit.short_hash(), "0123456");
        assert_eq!(Commit::new("abc", "msg").short_hash(), "abc");
    }
}
