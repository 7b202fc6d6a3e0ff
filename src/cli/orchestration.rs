//! Main workflow orchestration logic
//!
//! The workflow runs a fixed sequence of stages. Each stage either succeeds
//! or aborts the run with a single error; the tag is only created by the last
//! stage, so a failed run never leaves a partial result behind.

use std::fmt;

use semver::Version;
use tracing::{debug, info};

use crate::analyzer::{CommitAnalyzer, CommitListNotes, NotesGenerator, PatchOnlyAnalyzer};
use crate::boundary::BoundaryWarning;
use crate::config::ActionInputs;
use crate::domain::tag::select_latest_tag;
use crate::domain::version::{build_tag_name, resolve_next_version};
use crate::domain::{BranchContext, Commit, Tag};
use crate::error::{AutotagError, Result};
use crate::repository::{list_all_tags, TagRepository};
use crate::ui::ActionOutputs;

/// Arguments for the tagging workflow
///
/// Decoupled from clap and the environment so the workflow can be driven
/// programmatically.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowArgs {
    /// Ref that triggered the run (e.g. "refs/heads/main")
    pub git_ref: Option<String>,

    /// Commit receiving the new tag
    pub commit_sha: Option<String>,

    pub tag_prefix: String,

    /// Read every page of tags instead of the first one
    pub fetch_all_tags: bool,

    /// Fetch the commit range and render a changelog
    pub changelog: bool,

    /// Run every stage except tag creation
    pub dry_run: bool,
}

impl WorkflowArgs {
    pub fn from_inputs(inputs: &ActionInputs, dry_run: bool) -> Self {
        WorkflowArgs {
            git_ref: inputs.git_ref.clone(),
            commit_sha: inputs.commit_sha.clone(),
            tag_prefix: inputs.tag_prefix.clone(),
            fetch_all_tags: inputs.fetch_all_tags,
            changelog: inputs.changelog,
            dry_run,
        }
    }
}

/// Workflow stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidateEnvironment,
    ValidateBranch,
    FetchTags,
    SelectTag,
    ParsePreviousVersion,
    FetchCommitRange,
    ResolveNextVersion,
    BuildNewTagName,
    CreateTag,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidateEnvironment => "validate-environment",
            Stage::ValidateBranch => "validate-branch",
            Stage::FetchTags => "fetch-tags",
            Stage::SelectTag => "select-tag",
            Stage::ParsePreviousVersion => "parse-previous-version",
            Stage::FetchCommitRange => "fetch-commit-range",
            Stage::ResolveNextVersion => "resolve-next-version",
            Stage::BuildNewTagName => "build-new-tag-name",
            Stage::CreateTag => "create-tag",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "Entering stage");
}

/// Result of a successful workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Tag the new version was derived from (possibly the zero fallback)
    pub previous_tag: Tag,

    pub previous_version: Version,

    pub new_version: Version,

    pub new_tag: String,

    /// Rendered notes, when the changelog variant ran
    pub changelog: Option<String>,

    /// Whether the tag was created (false in dry-run mode)
    pub created: bool,

    pub warnings: Vec<BoundaryWarning>,
}

impl WorkflowResult {
    /// Step outputs reported to the invoking workflow
    pub fn outputs(&self) -> ActionOutputs {
        let mut outputs = ActionOutputs::new();
        outputs.set("previous_version", self.previous_version.to_string());
        outputs.set("previous_tag", self.previous_tag.name.clone());
        outputs.set("new_version", self.new_version.to_string());
        outputs.set("new_tag", self.new_tag.clone());
        if let Some(changelog) = &self.changelog {
            outputs.set("changelog", changelog.clone());
        }
        outputs
    }
}

/// Tagging workflow over an injected tag repository
pub struct TagWorkflow<R> {
    repo: R,
    analyzer: Box<dyn CommitAnalyzer>,
    notes: Box<dyn NotesGenerator>,
}

impl<R: TagRepository> TagWorkflow<R> {
    /// Create a workflow with the default patch-only analyzer and commit-list notes
    pub fn new(repo: R) -> Self {
        TagWorkflow {
            repo,
            analyzer: Box::new(PatchOnlyAnalyzer),
            notes: Box::new(CommitListNotes),
        }
    }

    pub fn with_analyzer(mut self, analyzer: impl CommitAnalyzer + 'static) -> Self {
        self.analyzer = Box::new(analyzer);
        self
    }

    pub fn with_notes(mut self, notes: impl NotesGenerator + 'static) -> Self {
        self.notes = Box::new(notes);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Run the tagging workflow
    ///
    /// 1. Validate ref and commit inputs
    /// 2. Check the branch is main/master
    /// 3. Fetch tags
    /// 4. Select the latest prefixed tag
    /// 5. Parse its version
    /// 6. Fetch the commit range (changelog variant)
    /// 7. Resolve the next version
    /// 8. Build the new tag name
    /// 9. Create the tag (skipped in dry-run mode)
    pub async fn run(&self, args: &WorkflowArgs) -> Result<WorkflowResult> {
        let mut warnings = Vec::new();
        let prefix = args.tag_prefix.as_str();

        enter(Stage::ValidateEnvironment);
        let git_ref = required(&args.git_ref, "Missing ref (GITHUB_REF).")?;
        let commit_sha = required(&args.commit_sha, "Missing commit (GITHUB_SHA).")?;

        enter(Stage::ValidateBranch);
        let branch = BranchContext::from_ref(git_ref);
        if !branch.is_release_branch() {
            return Err(AutotagError::config(format!(
                "Trying to tag wrong branch '{}'",
                branch.name
            )));
        }

        enter(Stage::FetchTags);
        let listing = list_all_tags(&self.repo, args.fetch_all_tags).await?;
        info!(count = listing.tags.len(), pages = listing.pages, "Fetched tags");
        if listing.truncated {
            warnings.push(BoundaryWarning::TagListTruncated {
                fetched: listing.tags.len(),
            });
        }

        enter(Stage::SelectTag);
        let previous_tag = select_latest_tag(&listing.tags, prefix);
        if previous_tag.name.is_empty() {
            return Err(AutotagError::not_found("Could not find previous tag."));
        }
        if previous_tag == Tag::fallback(prefix) {
            warnings.push(BoundaryWarning::NoPrefixedTags {
                prefix: prefix.to_string(),
            });
        }

        enter(Stage::ParsePreviousVersion);
        let previous_version = previous_tag
            .version(prefix)
            .ok_or_else(|| AutotagError::parse("Could not parse previous tag."))?;
        info!(
            "Previous tag was {}, previous version was {}.",
            previous_tag.name, previous_version
        );

        let commits: Vec<Commit> = if args.changelog {
            enter(Stage::FetchCommitRange);
            let commits = self
                .repo
                .compare_commits(&previous_tag.commit_sha, commit_sha)
                .await?;
            debug!(count = commits.len(), "Fetched commits since previous tag");
            if commits.is_empty() {
                warnings.push(BoundaryWarning::NoNewCommits {
                    latest_tag: previous_tag.name.clone(),
                    current_commit: commit_sha.to_string(),
                });
            }
            commits
        } else {
            Vec::new()
        };

        enter(Stage::ResolveNextVersion);
        let bump = self.analyzer.analyze(&commits);
        let new_version = resolve_next_version(&previous_tag.name, prefix, bump)?;
        info!("New version is {}.", new_version);

        enter(Stage::BuildNewTagName);
        let new_tag = build_tag_name(prefix, &new_version);
        info!("New tag after applying prefix is {}.", new_tag);

        let changelog = args.changelog.then(|| self.notes.generate(&commits));

        enter(Stage::CreateTag);
        let created = if args.dry_run {
            info!(tag = %new_tag, "Dry run, not creating tag");
            false
        } else {
            self.repo.create_tag_ref(&new_tag, commit_sha).await?;
            info!(tag = %new_tag, commit = %commit_sha, "Created tag");
            true
        };

        Ok(WorkflowResult {
            previous_tag,
            previous_version,
            new_version,
            new_tag,
            changelog,
            created,
            warnings,
        })
    }
}

fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AutotagError::config(message))
}
