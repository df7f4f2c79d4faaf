//! Floating windows: session notes and the template name prompt.

use eframe::egui;

use crate::app::{GeoflowApp, NOTES_TITLE};

impl GeoflowApp {
    /// Free-text notes kept in the session file
    pub fn render_notes_window(&mut self, ctx: &egui::Context) {
        if !self.show_notes {
            return;
        }

        let mut open = true;
        egui::Window::new(NOTES_TITLE)
            .open(&mut open)
            .default_size([360.0, 240.0])
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.notes)
                            .desired_width(f32::INFINITY)
                            .desired_rows(10)
                            .hint_text("Interpretation notes..."),
                    );
                });
            });
        self.show_notes = open;
    }

    /// Prompt for a template name, then save the current layout under it
    pub fn render_template_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_template_dialog {
            return;
        }

        let mut open = true;
        let mut save = false;
        egui::Window::new("Save Track Template")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Template name:");
                let response = ui.text_edit_singleline(&mut self.template_name);
                response.request_focus();
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    save = true;
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let valid = !self.template_name.trim().is_empty();
                    if ui.add_enabled(valid, egui::Button::new("Save")).clicked() {
                        save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_template_dialog = false;
                    }
                });
            });

        if save && !self.template_name.trim().is_empty() {
            let name = self.template_name.trim().to_string();
            self.save_template(&name);
            self.show_template_dialog = false;
        } else if !open {
            self.show_template_dialog = false;
        }
    }
}
