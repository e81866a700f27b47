//! The feedback window.

use std::sync::mpsc::Sender;

use eframe::egui::{self, RichText};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use super::controller::FeedbackController;
use crate::feedback::{DebugProfileSource, FeedbackHost, PendingDelivery, SystemDebugProfile};

/// Initial and minimum size of the feedback viewport.
pub const WINDOW_SIZE: [f32; 2] = [560.0, 440.0];

const FIELD_WIDTH: f32 = 520.0;
const SEND_ANYWAY: &str = "Send anyway";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormAction {
    None,
    Send,
    Cancel,
}

/// eframe app hosting a single feedback form.
///
/// Dispatched requests are handed to `deliveries` so they can outlive the window.
pub struct FeedbackApp<P = SystemDebugProfile> {
    controller: FeedbackController<P>,
    deliveries: Sender<PendingDelivery>,
}

impl<P: DebugProfileSource> FeedbackApp<P> {
    pub fn new(controller: FeedbackController<P>, deliveries: Sender<PendingDelivery>) -> Self {
        Self {
            controller,
            deliveries,
        }
    }

    fn forward_pending_delivery(&mut self) {
        let Some(delivery) = self.controller.take_pending_delivery() else {
            return;
        };
        if self.deliveries.send(delivery).is_err() {
            tracing::warn!("Nobody is waiting for the feedback request; it may be cut short");
        }
    }

    fn render_form(&mut self, ui: &mut egui::Ui) -> FormAction {
        ui.set_min_width(FIELD_WIDTH);
        ui.label(RichText::new("Share improvement ideas, or report bugs").strong());
        let issues_url = self.controller.issues_page_url().to_string();
        ui.hyperlink_to("View existing discussions", issues_url);
        ui.add_space(10.0);

        let state = &mut self.controller.ui;
        let closing = state.closing;
        let message = ui.add_enabled(
            !closing,
            egui::TextEdit::multiline(&mut state.message)
                .hint_text("I think the app could be improved with…")
                .desired_width(FIELD_WIDTH)
                .desired_rows(12),
        );
        if state.focus_message_requested && !message.has_focus() && !closing {
            message.request_focus();
            state.focus_message_requested = false;
        }
        if message.changed() {
            state.last_error = None;
        }
        ui.add_space(6.0);
        ui.add_enabled(
            !closing,
            egui::TextEdit::singleline(&mut state.email)
                .hint_text("Optional: email (if you want a reply)")
                .desired_width(FIELD_WIDTH),
        );
        ui.add_space(6.0);
        ui.add_enabled(
            !closing,
            egui::Checkbox::new(
                &mut state.include_debug_profile,
                "Send debug profile (CPU, memory, etc)",
            ),
        );

        if let Some(err) = state.last_error.as_ref() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, err);
        }

        ui.add_space(10.0);
        let mut action = FormAction::None;
        let can_submit = self.controller.can_submit();
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(can_submit, egui::Button::new("Send"))
                .clicked()
            {
                action = FormAction::Send;
            }
            if ui.button("Cancel").clicked() {
                action = FormAction::Cancel;
            }
        });
        action
    }
}

impl<P: DebugProfileSource> eframe::App for FeedbackApp<P> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut action = FormAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            action = self.render_form(ui);
        });

        if action == FormAction::None {
            action = ctx.input(|i| {
                if i.key_pressed(egui::Key::Escape) {
                    FormAction::Cancel
                } else if i.modifiers.command && i.key_pressed(egui::Key::Enter) {
                    FormAction::Send
                } else {
                    FormAction::None
                }
            });
        }

        let mut host = WindowHost { ctx };
        match action {
            FormAction::None => {}
            FormAction::Cancel => self.controller.cancel(&mut host),
            FormAction::Send if self.controller.can_submit() => {
                self.controller.submit(&mut host);
                self.forward_pending_delivery();
            }
            FormAction::Send => {}
        }
    }
}

/// Native prompt and viewport close for the running window.
struct WindowHost<'a> {
    ctx: &'a egui::Context,
}

impl FeedbackHost for WindowHost<'_> {
    fn confirm_without_email(&mut self) -> bool {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Are you sure you don’t want a response?")
            .set_description("You didn’t write your email, thus can’t receive any response.")
            .set_buttons(MessageButtons::OkCancelCustom(
                SEND_ANYWAY.to_string(),
                "Cancel".to_string(),
            ))
            .show();
        confirms_send(&answer)
    }

    fn close(&mut self) {
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

/// Only an explicit "Send anyway" goes ahead; closing the dialog counts as Cancel.
///
/// Some backends report the custom button as `Ok` instead of its label.
fn confirms_send(answer: &MessageDialogResult) -> bool {
    match answer {
        MessageDialogResult::Custom(label) => label == SEND_ANYWAY,
        MessageDialogResult::Ok => true,
        _ => false,
    }
}
