//! Entry point for the in-app feedback window.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::sync::mpsc;

use eframe::egui;
use inapp_feedback::egui_app::{FeedbackApp, FeedbackController, WINDOW_SIZE};
use inapp_feedback::feedback::{FeedbackSubmitter, PendingDelivery, SHUTDOWN_GRACE};
use inapp_feedback::{config, issue_gateway, logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let token = issue_gateway::install_global().inspect_err(|err| {
        tracing::error!("Cannot start feedback window: {err}");
    })?;
    let config = config::load_or_default().inspect_err(|err| {
        tracing::error!("Cannot load feedback config: {err}");
    })?;
    let submitter = FeedbackSubmitter::from_config(&config, token.clone())?;
    tracing::info!(endpoint = %submitter.endpoint(), "Feedback window ready");
    let controller = FeedbackController::new(submitter, &config);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Send feedback")
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(WINDOW_SIZE)
            .with_resizable(false)
            .with_minimize_button(true)
            .with_maximize_button(false),
        ..Default::default()
    };

    let (deliveries_tx, deliveries_rx) = mpsc::channel();
    let run_result = eframe::run_native(
        "Send feedback",
        native_options,
        Box::new(move |_cc| Ok(Box::new(FeedbackApp::new(controller, deliveries_tx)))),
    );
    for delivery in deliveries_rx.try_iter() {
        finish_delivery(delivery);
    }
    run_result?;
    Ok(())
}

/// Keep the process alive until the request completes or the grace period runs out.
fn finish_delivery(delivery: PendingDelivery) {
    if delivery.is_finished() {
        let _ = delivery.wait();
        return;
    }
    tracing::info!("Waiting for feedback request to finish before exiting");
    if delivery.wait_timeout(SHUTDOWN_GRACE).is_err() {
        tracing::warn!(
            "Feedback request still running after {}s; exiting without it",
            SHUTDOWN_GRACE.as_secs()
        );
    }
}
