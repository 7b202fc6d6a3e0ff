use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Oid, Repository as Git2Repo, Sort};
use tracing::debug;

use crate::domain::{Commit, Tag};
use crate::error::{AutotagError, Result};
use crate::repository::{TagRepository, TAGS_PER_PAGE};

/// Tag repository backed by a local clone
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
    /// Sorted commit tags, built on the first page and reused by later pages
    tags: Mutex<Option<Vec<Tag>>>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
            tags: Mutex::new(None),
        }
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Git2Repo) -> Result<T>) -> Result<T> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| AutotagError::upstream("Repository handle is poisoned"))?;
        f(&*repo)
    }

    fn tags_page(&self, page: u32) -> Result<Vec<Tag>> {
        let mut cache = self
            .tags
            .lock()
            .map_err(|_| AutotagError::upstream("Tag cache is poisoned"))?;

        if page <= 1 || cache.is_none() {
            *cache = Some(self.with_repo(commit_tags)?);
        }

        let start = (page.saturating_sub(1) as usize) * TAGS_PER_PAGE;
        Ok(cache
            .as_deref()
            .unwrap_or_default()
            .iter()
            .skip(start)
            .take(TAGS_PER_PAGE)
            .cloned()
            .collect())
    }

    fn invalidate_tags(&self) {
        if let Ok(mut cache) = self.tags.lock() {
            *cache = None;
        }
    }
}

/// Resolve a revision (sha, ref or `HEAD`) to the commit it points at
fn resolve_commit(repo: &Git2Repo, rev: &str) -> Result<Oid> {
    repo.revparse_single(rev)
        .and_then(|object| object.peel_to_commit())
        .map(|commit| commit.id())
        .map_err(|e| {
            AutotagError::upstream(format!("Cannot resolve commit '{}': {}", rev, e.message()))
        })
}

/// Every tag that peels to a commit, sorted by name
fn commit_tags(repo: &Git2Repo) -> Result<Vec<Tag>> {
    let mut names: Vec<String> = repo
        .tag_names(None)?
        .iter()
        .flatten()
        .map(|s| s.to_string())
        .collect();
    names.sort();

    let tags = names
        .into_iter()
        .filter_map(|name| {
            let reference = format!("refs/tags/{}", name);
            match repo
                .revparse_single(&reference)
                .and_then(|object| object.peel_to_commit())
            {
                Ok(commit) => Some(Tag::new(name, commit.id().to_string())),
                Err(e) => {
                    debug!(tag = %name, error = %e, "Skipping tag that does not point at a commit");
                    None
                }
            }
        })
        .collect();

    Ok(tags)
}

fn create_lightweight_tag(repo: &Git2Repo, tag_name: &str, commit_sha: &str) -> Result<()> {
    let oid = resolve_commit(repo, commit_sha)?;
    let object = repo.find_object(oid, None)?;

    repo.tag_lightweight(tag_name, &object, false)
        .map_err(|e| {
            AutotagError::upstream(format!("Cannot create tag '{}': {}", tag_name, e.message()))
        })?;

    Ok(())
}

fn commits_between(repo: &Git2Repo, base_sha: &str, head_sha: &str) -> Result<Vec<Commit>> {
    let head = resolve_commit(repo, head_sha)?;
    let base = resolve_commit(repo, base_sha)?;

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
    revwalk.push(head)?;
    revwalk.hide(base)?;

    let mut commits = Vec::new();
    for oid_result in revwalk {
        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;
        let message = commit.message().unwrap_or("(empty message)").to_string();

        commits.push(Commit::new(oid.to_string(), message));
    }

    Ok(commits)
}

#[async_trait]
impl TagRepository for Git2Repository {
    async fn list_tags(&self, page: u32) -> Result<Vec<Tag>> {
        self.tags_page(page)
    }

    async fn create_tag_ref(&self, tag_name: &str, commit_sha: &str) -> Result<()> {
        self.with_repo(|repo| create_lightweight_tag(repo, tag_name, commit_sha))?;
        self.invalidate_tags();
        Ok(())
    }

    async fn compare_commits(&self, base_sha: &str, head_sha: &str) -> Result<Vec<Commit>> {
        self.with_repo(|repo| commits_between(repo, base_sha, head_sha))
    }
}

