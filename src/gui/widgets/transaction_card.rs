//! Card widget for one transaction row

use crate::gui::helpers::TransactionRow;
use crate::gui::theme::AppTheme;
use eframe::egui::{self, RichText};

/// What the user did with a card this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    None,
    Refund,
}

/// Render a card; the refund button only exists for refundable rows.
///
/// `refund_enabled` greys the button out while another refund is running.
pub fn transaction_card(
    ui: &mut egui::Ui,
    theme: &AppTheme,
    row: &TransactionRow,
    refund_enabled: bool,
    refund_pending: bool,
) -> CardAction {
    let mut action = CardAction::None;

    // Key the card by transaction id so widget state follows the row
    ui.push_id(&row.key, |ui| {
        theme.frame_card().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(&row.title).heading().strong());
            ui.add_space(theme.spacing_xs);
            ui.label(&row.date_line);
            ui.label(&row.total_line);
            ui.label(RichText::new(&row.status_line).color(theme.text_secondary));

            if row.refundable {
                ui.add_space(theme.spacing_sm);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let hover = if refund_enabled {
                        "Request a refund for this transaction"
                    } else {
                        "Wait for the running refund to finish"
                    };
                    if ui
                        .add_enabled(refund_enabled, theme.button_danger("Refund"))
                        .on_hover_text(hover)
                        .clicked()
                    {
                        action = CardAction::Refund;
                    }
                    if refund_pending {
                        ui.add(egui::Spinner::new());
                    }
                });
            }
        });
    });

    action
}
