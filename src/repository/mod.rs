//! Tag repository abstraction layer
//!
//! This module provides a trait-based abstraction over the place tags live,
//! allowing the tagging workflow to run against the GitHub REST API, a local
//! clone, or an in-memory substitute for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [TagRepository] trait. The concrete
//! implementations include:
//!
//! - [github::GitHubClient]: GitHub REST API over `reqwest`
//! - [local::Git2Repository]: a local repository opened with `git2`
//! - [mock::MockTagRepository]: a mock implementation for testing
//!
//! Pagination lives outside the implementations, in [list_all_tags], so every
//! backend only has to answer for a single page.

pub mod github;
pub mod local;
pub mod mock;

pub use github::GitHubClient;
pub use local::Git2Repository;
pub use mock::MockTagRepository;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Commit, Tag};
use crate::error::Result;

/// Number of tags requested per page
pub const TAGS_PER_PAGE: usize = 100;

/// Upper bound on pages fetched in a single run
pub const MAX_TAG_PAGES: u32 = 1000;

/// Common tag repository trait for abstraction
///
/// All implementors must be `Send + Sync` so a client can be shared with the
/// workflow for the duration of a run.
///
/// ## Error Handling
///
/// Every failure maps to an upstream [crate::error::AutotagError] variant.
/// Nothing is retried.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List one page of tags (pages start at 1)
    ///
    /// Returns at most [TAGS_PER_PAGE] tags. Ordering is not guaranteed.
    async fn list_tags(&self, page: u32) -> Result<Vec<Tag>>;

    /// Create `refs/tags/<tag_name>` pointing at `commit_sha`
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the ref already exists or the request is rejected
    async fn create_tag_ref(&self, tag_name: &str, commit_sha: &str) -> Result<()>;

    /// Commits reachable from `head_sha` but not from `base_sha`, oldest first
    async fn compare_commits(&self, base_sha: &str, head_sha: &str) -> Result<Vec<Commit>>;
}

/// Result of walking the tag pages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagListing {
    pub tags: Vec<Tag>,
    /// Number of pages requested
    pub pages: u32,
    /// The last page was full but no further page was requested
    pub truncated: bool,
}

/// Fetch tags page by page.
///
/// Stops after the first page unless `fetch_all` is set; otherwise keeps
/// going while pages come back full.
pub async fn list_all_tags<R>(repo: &R, fetch_all: bool) -> Result<TagListing>
where
    R: TagRepository + ?Sized,
{
    let mut listing = TagListing::default();
    let mut page = 1;

    loop {
        let batch = repo.list_tags(page).await?;
        let full = batch.len() >= TAGS_PER_PAGE;
        debug!(page, count = batch.len(), "Fetched tag page");

        listing.tags.extend(batch);
        listing.pages = page;

        if !full {
            return Ok(listing);
        }
        if !fetch_all || page >= MAX_TAG_PAGES {
            listing.truncated = true;
            return Ok(listing);
        }
        page += 1;
    }
}
