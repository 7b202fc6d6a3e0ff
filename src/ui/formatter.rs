//! Pure formatting functions for UI output.
//!
//! Errors and warnings are rendered as GitHub workflow commands so the runner
//! annotates the job; everything else is plain styled text.

use console::style;

use crate::boundary::BoundaryWarning;

/// Escape a workflow command payload (`%`, CR and LF).
pub fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Render an `::error::` workflow command.
pub fn format_error(message: &str) -> String {
    format!("::error::{}", escape_command_data(message))
}

/// Render a `::warning::` workflow command.
pub fn format_warning(message: &str) -> String {
    format!("::warning::{}", escape_command_data(message))
}

/// Print an error as a workflow command.
///
/// Workflow commands are only picked up from stdout.
pub fn display_error(message: &str) {
    println!("{}", format_error(message));
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a non-fatal boundary warning as a workflow command.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    println!("{}", format_warning(&warning.to_string()));
}

/// Display the tag change computed for this run.
pub fn display_proposed_tag(previous_tag: &str, new_tag: &str) {
    println!("\n{}", style("Tag change:").bold());
    println!("  From: {}", style(previous_tag).red());
    println!("  To:   {}", style(new_tag).green());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_command_data() {
        assert_eq!(escape_command_data("50% done\r\nnext"), "50%25 done%0D%0Anext");
    }

    #[test]
    fn test_format_error() {
        assert_eq!(
            format_error("Trying to tag wrong branch 'develop'"),
            "::error::Trying to tag wrong branch 'develop'"
        );
    }

    #[test]
    fn test_format_warning_is_single_line() {
        let rendered = format_warning("line one\nline two");
        assert_eq!(rendered, "::warning::line one%0Aline two");
        assert!(!rendered.contains('\n'));
    }
}
