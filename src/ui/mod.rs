//! User interface module - console formatting and step outputs.
//!
//! Separates concerns:
//! - `formatter` - Styled messages and workflow commands
//! - `outputs` - Step outputs written for the invoking workflow

pub mod formatter;
pub mod outputs;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_proposed_tag, display_status,
    display_success,
};
pub use outputs::{print_outputs, write_github_output, ActionOutputs};
