use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{Commit, Tag};
use crate::error::{AutotagError, Result};
use crate::repository::{TagRepository, TAGS_PER_PAGE};

/// Mock tag repository for testing without network or git operations
#[derive(Default)]
pub struct MockTagRepository {
    tags: Vec<Tag>,
    commits: Vec<Commit>,
    list_error: Option<String>,
    compare_error: Option<String>,
    requested_pages: Mutex<Vec<u32>>,
    compared: Mutex<Vec<(String, String)>>,
    created: Mutex<Vec<(String, String)>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTagRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags served by `list_tags`, in listing order
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Tags named `names`, each pointing at a distinct fake commit
    pub fn with_tag_names(self, names: &[&str]) -> Self {
        let tags = names
            .iter()
            .enumerate()
            .map(|(i, name)| Tag::new(*name, format!("{:040x}", i + 1)))
            .collect();
        self.with_tags(tags)
    }

    /// Commits returned by `compare_commits`
    pub fn with_commits(mut self, commits: Vec<Commit>) -> Self {
        self.commits = commits;
        self
    }

    /// Make every `list_tags` call fail with `message`
    pub fn failing_tag_listing(mut self, message: impl Into<String>) -> Self {
        self.list_error = Some(message.into());
        self
    }

    /// Make every `compare_commits` call fail with `message`
    pub fn failing_compare(mut self, message: impl Into<String>) -> Self {
        self.compare_error = Some(message.into());
        self
    }

    /// Pages requested so far, in order
    pub fn requested_pages(&self) -> Vec<u32> {
        locked(&self.requested_pages).clone()
    }

    /// `(base, head)` pairs passed to `compare_commits`
    pub fn compared_ranges(&self) -> Vec<(String, String)> {
        locked(&self.compared).clone()
    }

    /// `(tag_name, commit_sha)` pairs created so far
    pub fn created_refs(&self) -> Vec<(String, String)> {
        locked(&self.created).clone()
    }
}

#[async_trait]
impl TagRepository for MockTagRepository {
    async fn list_tags(&self, page: u32) -> Result<Vec<Tag>> {
        locked(&self.requested_pages).push(page);

        if let Some(message) = &self.list_error {
            return Err(AutotagError::upstream(message.clone()));
        }

        let start = (page.saturating_sub(1) as usize) * TAGS_PER_PAGE;
        Ok(self
            .tags
            .iter()
            .skip(start)
            .take(TAGS_PER_PAGE)
            .cloned()
            .collect())
    }

    async fn create_tag_ref(&self, tag_name: &str, commit_sha: &str) -> Result<()> {
        let mut created = locked(&self.created);
        let exists = self.tags.iter().any(|t| t.name == tag_name)
            || created.iter().any(|(name, _)| name == tag_name);

        if exists {
            return Err(AutotagError::upstream(format!(
                "Reference refs/tags/{} already exists",
                tag_name
            )));
        }

        created.push((tag_name.to_string(), commit_sha.to_string()));
        Ok(())
    }

    async fn compare_commits(&self, base_sha: &str, head_sha: &str) -> Result<Vec<Commit>> {
        locked(&self.compared).push((base_sha.to_string(), head_sha.to_string()));

        if let Some(message) = &self.compare_error {
            return Err(AutotagError::upstream(message.clone()));
        }

        Ok(self.commits.clone())
    }
}
