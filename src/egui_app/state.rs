use crate::feedback::FeedbackInput;

/// UI state for the feedback form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedbackUiState {
    /// Message input.
    pub message: String,
    /// Optional reply address.
    pub email: String,
    /// "Send debug profile" checkbox.
    pub include_debug_profile: bool,
    /// Whether to focus the message field on the next frame.
    pub focus_message_requested: bool,
    /// Set once the request was dispatched and the window asked to close.
    pub closing: bool,
    /// Last validation error, if any.
    pub last_error: Option<String>,
}

impl FeedbackUiState {
    pub fn new(include_debug_profile: bool) -> Self {
        Self {
            include_debug_profile,
            focus_message_requested: true,
            ..Self::default()
        }
    }

    /// Snapshot the form fields for submission.
    pub fn capture(&self) -> FeedbackInput {
        FeedbackInput {
            message: self.message.clone(),
            email: self.email.clone(),
            include_debug_profile: self.include_debug_profile,
        }
    }
}
