//! Domain logic - pure tagging rules independent of the tag repository

pub mod branch;
pub mod commit;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use commit::Commit;
pub use tag::{Tag, TagPartition};
pub use version::VersionBump;
