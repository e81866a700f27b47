//! Markdown body of a feedback issue.

use super::FeedbackInput;

const DISCLOSURE: &str =
    "_This issue was opened by a bot after a user submitted feedback through the in-app form._";

/// Render the issue body for `input`.
///
/// Section order is fixed: disclosure, optional `From:` line, quoted message,
/// then the collapsible debug profile when the input asks for one. A missing
/// profile renders as an empty section.
pub fn assemble_body(input: &FeedbackInput, debug_profile: Option<&str>) -> String {
    let mut body = String::from(DISCLOSURE);
    if !input.email.is_empty() {
        body.push_str("\n\n__From:__ ");
        body.push_str(&input.email);
    }
    body.push_str("\n\n__Message:__");
    body.push_str("\n\n> ");
    body.push_str(&quote_lines(&input.message));
    if input.include_debug_profile {
        body.push_str("\n\n<details>\n<summary><strong>Debug profile</strong></summary>\n<p>");
        body.push_str("\n\n");
        body.push_str(debug_profile.unwrap_or_default());
        body.push_str("\n\n</p>\n</details>");
    }
    body
}

fn quote_lines(message: &str) -> String {
    message.replace('\n', "\n> ")
}
