//! Turning the feedback form's input into a GitHub issue.
//!
//! The flow is linear: validate, optionally confirm a missing email, assemble
//! the body, dispatch the POST on a worker thread, then dismiss the window.
//! Delivery results only reach the log.

mod body;
mod debug_profile;

pub use body::assemble_body;
pub use debug_profile::{DebugProfileSnapshot, DebugProfileSource, SystemDebugProfile};

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use url::Url;

use crate::config::{ConfigError, FeedbackConfig};
use crate::issue_gateway::{self, AuthToken, CreateIssueError, IssuePayload};

/// What the user typed, captured when they pressed Send.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedbackInput {
    /// Required free-form message.
    pub message: String,
    /// Reply address; empty when the user left it blank.
    pub email: String,
    /// Whether to attach a debug profile.
    pub include_debug_profile: bool,
}

/// Window-side capabilities the submitter drives.
pub trait FeedbackHost {
    /// Ask whether to send without an email. Blocks until the user answers.
    fn confirm_without_email(&mut self) -> bool;
    /// Dismiss the feedback window.
    fn close(&mut self);
}

/// Reasons a submission stopped before anything was sent.
///
/// Both keep the feedback window open.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("Submission cancelled")]
    Cancelled,
}

/// How long the process waits for an in-flight issue POST before exiting.
/// Matches the shared agent's read timeout.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

const FINISH_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handle to a dispatched issue POST.
///
/// Dropping it leaves the request running detached.
#[derive(Debug)]
pub struct PendingDelivery {
    handle: JoinHandle<Result<(), CreateIssueError>>,
}

impl PendingDelivery {
    /// Block until the request finishes.
    pub fn wait(self) -> Result<(), CreateIssueError> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(CreateIssueError::Transport("delivery thread panicked".into())))
    }

    /// Wait up to `timeout` for the request to finish.
    ///
    /// Returns `Err(self)` when it is still running so the caller can decide
    /// whether to keep waiting or abandon it.
    pub fn wait_timeout(self, timeout: Duration) -> Result<Result<(), CreateIssueError>, Self> {
        let deadline = Instant::now() + timeout;
        while !self.handle.is_finished() {
            let now = Instant::now();
            if now >= deadline {
                return Err(self);
            }
            thread::sleep(FINISH_POLL_INTERVAL.min(deadline - now));
        }
        Ok(self.wait())
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Sends captured feedback to the issues endpoint.
pub struct FeedbackSubmitter<P = SystemDebugProfile> {
    endpoint: Url,
    token: AuthToken,
    profiles: P,
}

impl FeedbackSubmitter<SystemDebugProfile> {
    /// Submitter for the configured repository using a live system profile.
    pub fn from_config(config: &FeedbackConfig, token: AuthToken) -> Result<Self, ConfigError> {
        Ok(Self::new(config.issues_endpoint()?, token, SystemDebugProfile))
    }
}

impl<P: DebugProfileSource> FeedbackSubmitter<P> {
    pub fn new(endpoint: Url, token: AuthToken, profiles: P) -> Self {
        Self {
            endpoint,
            token,
            profiles,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Validate `input`, send it, and close the host window.
    ///
    /// Returns once the request is dispatched; its outcome is only logged.
    /// `InvalidInput` and `Cancelled` send nothing and leave the host open.
    pub fn try_submit(
        &self,
        input: FeedbackInput,
        host: &mut impl FeedbackHost,
    ) -> Result<PendingDelivery, SubmitError> {
        if input.message.is_empty() {
            return Err(SubmitError::InvalidInput("message must not be empty"));
        }
        if input.email.is_empty() && !host.confirm_without_email() {
            tracing::debug!("Feedback submission cancelled at missing-email prompt");
            return Err(SubmitError::Cancelled);
        }
        let profile = input
            .include_debug_profile
            .then(|| self.profiles.make_debug_profile());
        let payload = IssuePayload::feedback(assemble_body(&input, profile.as_deref()));
        let delivery = self.dispatch(payload);
        host.close();
        Ok(delivery)
    }

    fn dispatch(&self, payload: IssuePayload) -> PendingDelivery {
        let endpoint = self.endpoint.clone();
        let token = self.token.clone();
        tracing::info!(
            endpoint = %endpoint,
            body_len = payload.body.len(),
            "Dispatching feedback issue"
        );
        let handle = thread::spawn(move || {
            let result = issue_gateway::create_issue(&endpoint, &token, &payload);
            match &result {
                Ok(()) => tracing::info!("Feedback issue created"),
                Err(err) => tracing::warn!("Feedback issue submission failed: {err}"),
            }
            result
        });
        PendingDelivery { handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        answer: bool,
        prompts: usize,
        closed: bool,
    }

    impl FeedbackHost for RecordingHost {
        fn confirm_without_email(&mut self) -> bool {
            self.prompts += 1;
            self.answer
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    fn submitter(profile_calls: &std::cell::Cell<usize>) -> FeedbackSubmitter<impl DebugProfileSource + '_> {
        FeedbackSubmitter::new(
            Url::parse("http://127.0.0.1:9/issues").unwrap(),
            AuthToken::new("token").unwrap(),
            move || {
                profile_calls.set(profile_calls.get() + 1);
                "profile".to_string()
            },
        )
    }

    #[test]
    fn empty_message_is_rejected_before_prompting() {
        let calls = std::cell::Cell::new(0);
        let mut host = RecordingHost::default();
        let err = submitter(&calls)
            .try_submit(FeedbackInput::default(), &mut host)
            .unwrap_err();
        assert!(matches!(err, SubmitError::InvalidInput(_)));
        assert_eq!(host.prompts, 0);
        assert!(!host.closed);
    }

    #[test]
    fn declining_missing_email_cancels_and_keeps_window_open() {
        let calls = std::cell::Cell::new(0);
        let mut host = RecordingHost::default();
        let input = FeedbackInput {
            message: "hello".into(),
            email: String::new(),
            include_debug_profile: true,
        };
        let err = submitter(&calls).try_submit(input, &mut host).unwrap_err();
        assert_eq!(err, SubmitError::Cancelled);
        assert_eq!(host.prompts, 1);
        assert!(!host.closed);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn email_skips_prompt_and_closes_after_dispatch() {
        let calls = std::cell::Cell::new(0);
        let mut host = RecordingHost::default();
        let input = FeedbackInput {
            message: "hello".into(),
            email: "me@example.com".into(),
            include_debug_profile: false,
        };
        let _pending = submitter(&calls).try_submit(input, &mut host).unwrap();
        assert_eq!(host.prompts, 0);
        assert!(host.closed);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn profile_is_built_only_when_requested() {
        let calls = std::cell::Cell::new(0);
        let mut host = RecordingHost {
            answer: true,
            ..RecordingHost::default()
        };
        let input = FeedbackInput {
            message: "hello".into(),
            email: String::new(),
            include_debug_profile: true,
        };
        let _pending = submitter(&calls).try_submit(input, &mut host).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(host.closed);
    }
}
