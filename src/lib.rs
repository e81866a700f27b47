//! In-app feedback: a small egui form that files GitHub issues.
/// Application directory helpers.
pub mod app_dirs;
/// TOML configuration.
pub mod config;
/// The egui feedback window.
pub mod egui_app;
/// Feedback capture, body assembly and submission.
pub mod feedback;
/// Shared HTTP agent.
pub(crate) mod http_client;
/// GitHub issue creation and token handling.
pub mod issue_gateway;
/// Tracing setup.
pub mod logging;
