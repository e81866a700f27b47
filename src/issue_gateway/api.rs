//! REST client for opening issues on the feedback repository.

use serde::Serialize;
use url::Url;

use super::AuthToken;
use crate::http_client;

/// Title every in-app feedback issue is opened with.
pub const ISSUE_TITLE: &str = "[In-app feedback]";

/// Status GitHub answers with when the issue was created.
const CREATED: u16 = 201;
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// JSON body of the issue-creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IssuePayload {
    pub title: String,
    pub body: String,
}

impl IssuePayload {
    /// Payload carrying the fixed feedback title and the given body.
    pub fn feedback(body: String) -> Self {
        Self {
            title: ISSUE_TITLE.to_string(),
            body,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateIssueError {
    #[error("Token rejected (HTTP {0})")]
    Unauthorized(u16),
    #[error("Issue rejected: {0}")]
    Rejected(String),
    #[error("Server error (HTTP {code}): {body}")]
    ServerError { code: u16, body: String },
    #[error("Unexpected HTTP {code}: {body}")]
    UnexpectedStatus { code: u16, body: String },
    #[error("HTTP error: {0}")]
    Transport(String),
}

/// POST `payload` to the issues `endpoint`, succeeding only on HTTP 201.
pub fn create_issue(
    endpoint: &Url,
    token: &AuthToken,
    payload: &IssuePayload,
) -> Result<(), CreateIssueError> {
    let request = http_client::agent()
        .post(endpoint.as_str())
        .set("Content-Type", "application/json")
        .set("Accept", "application/json")
        .set("Authorization", &format!("token {}", token.expose()));

    let response = match request.send_json(payload) {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body = http_client::read_response_text(response, MAX_ERROR_BODY_BYTES);
            return Err(map_status_error(code, body));
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(CreateIssueError::Transport(err.to_string()));
        }
    };

    let code = response.status();
    if code == CREATED {
        return Ok(());
    }
    let body = http_client::read_response_text(response, MAX_ERROR_BODY_BYTES);
    Err(CreateIssueError::UnexpectedStatus { code, body })
}

fn map_status_error(code: u16, body: String) -> CreateIssueError {
    match code {
        401 | 403 => CreateIssueError::Unauthorized(code),
        422 => CreateIssueError::Rejected(body),
        500..=599 => CreateIssueError::ServerError { code, body },
        _ => CreateIssueError::UnexpectedStatus { code, body },
    }
}
