//! GitHub issue creation for in-app feedback.

mod token_store;

pub mod api;

pub use api::{CreateIssueError, ISSUE_TITLE, IssuePayload, create_issue};
pub use token_store::{
    AuthToken, DISABLE_KEYRING_ENV, KeyringTokenStore, TOKEN_ENV, TokenError, install_global,
};
