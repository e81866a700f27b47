use super::state::FeedbackUiState;
use crate::config::FeedbackConfig;
use crate::feedback::{
    DebugProfileSource, FeedbackHost, FeedbackSubmitter, PendingDelivery, SubmitError,
    SystemDebugProfile,
};

/// Drives the feedback form: owns its state and forwards Send to the submitter.
pub struct FeedbackController<P = SystemDebugProfile> {
    pub ui: FeedbackUiState,
    submitter: FeedbackSubmitter<P>,
    issues_page_url: String,
    pending: Option<PendingDelivery>,
}

impl<P: DebugProfileSource> FeedbackController<P> {
    pub fn new(submitter: FeedbackSubmitter<P>, config: &FeedbackConfig) -> Self {
        Self {
            ui: FeedbackUiState::new(config.include_debug_profile),
            submitter,
            issues_page_url: config.issues_page_url(),
            pending: None,
        }
    }

    /// Page listing existing feedback, linked from the form header.
    pub fn issues_page_url(&self) -> &str {
        &self.issues_page_url
    }

    /// Send is offered only while a message is present.
    pub fn can_submit(&self) -> bool {
        !self.ui.closing && !self.ui.message.is_empty()
    }

    /// Submit the current form. The window stays open on validation errors or
    /// when the user backs out of sending without an email.
    pub fn submit(&mut self, host: &mut impl FeedbackHost) {
        if self.ui.closing {
            return;
        }
        match self.submitter.try_submit(self.ui.capture(), host) {
            Ok(delivery) => {
                self.pending = Some(delivery);
                self.ui.closing = true;
                self.ui.last_error = None;
            }
            Err(SubmitError::Cancelled) => {
                self.ui.focus_message_requested = true;
            }
            Err(err @ SubmitError::InvalidInput(_)) => {
                self.ui.last_error = Some(err.to_string());
            }
        }
    }

    /// Hand over the in-flight request so the process can wait for it before exiting.
    pub fn take_pending_delivery(&mut self) -> Option<PendingDelivery> {
        self.pending.take()
    }

    /// Dismiss the form without sending anything.
    pub fn cancel(&mut self, host: &mut impl FeedbackHost) {
        self.ui.closing = true;
        host.close();
    }
}
