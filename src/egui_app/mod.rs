//! egui front end for the feedback form.

pub mod controller;
pub mod state;
pub mod ui;

pub use controller::FeedbackController;
pub use state::FeedbackUiState;
pub use ui::{FeedbackApp, WINDOW_SIZE};
