//! Menu bar UI components (File, View, Units, Templates menus).

use eframe::egui;
use strum::IntoEnumIterator;

use crate::app::GeoflowApp;
use crate::state::Theme;
use crate::template::{templates_dir, TrackTemplate};
use crate::units::DepthUnit;

impl GeoflowApp {
    /// Render the application menu bar
    pub fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            // Increase font size for menu items
            ui.style_mut()
                .text_styles
                .insert(egui::TextStyle::Button, egui::FontId::proportional(15.0));

            // File menu
            ui.menu_button("File", |ui| {
                ui.set_min_width(180.0);
                menu_font(ui);

                if ui.button("📂  Open LAS File...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("LAS Files", &["las", "LAS"])
                        .pick_file()
                    {
                        self.load_well_file(path);
                    }
                    ui.close();
                }

                ui.separator();

                if ui.button("💾  Save Session").clicked() {
                    if self.save_session() {
                        self.show_toast_success("Session saved");
                    }
                    ui.close();
                }
            });

            // View menu
            ui.menu_button("View", |ui| {
                ui.set_min_width(180.0);
                menu_font(ui);

                ui.menu_button("🎨  Theme", |ui| {
                    menu_font(ui);
                    for theme in Theme::iter() {
                        if ui
                            .radio_value(&mut self.preferences.theme, theme, theme.label())
                            .clicked()
                        {
                            ui.close();
                        }
                    }
                });

                ui.separator();

                if ui.checkbox(&mut self.show_notes, "📝  Notes").clicked() {
                    ui.close();
                }

                ui.separator();

                let bound = self.selected_well.is_some();
                if ui
                    .add_enabled(bound, egui::Button::new("↕  Fit to Data"))
                    .clicked()
                {
                    self.fit_to_data();
                    ui.close();
                }
            });

            // Units menu
            ui.menu_button("Units", |ui| {
                ui.set_min_width(180.0);
                menu_font(ui);

                ui.label(egui::RichText::new("Depth").strong());
                for (unit, label) in [
                    (DepthUnit::Feet, "Feet (ft)"),
                    (DepthUnit::Meters, "Meters (m)"),
                ] {
                    if ui
                        .radio_value(&mut self.preferences.units.depth, unit, label)
                        .clicked()
                    {
                        // Range editor shows display units
                        self.depth_text_generation = None;
                        ui.close();
                    }
                }
            });

            // Templates menu
            ui.menu_button("Templates", |ui| {
                ui.set_min_width(200.0);
                menu_font(ui);

                if ui.button("Save Track Template...").clicked() {
                    self.template_name.clear();
                    self.show_template_dialog = true;
                    ui.close();
                }

                if ui.button("Load Track Template...").clicked() {
                    let dir = templates_dir(self.project_path());
                    match TrackTemplate::list(&dir) {
                        Ok(files) if files.is_empty() => {
                            self.show_toast("No template files found");
                        }
                        Ok(_) => {
                            if let Some(path) = rfd::FileDialog::new()
                                .set_directory(&dir)
                                .add_filter("JSON files", &["json"])
                                .pick_file()
                            {
                                self.load_template(&path);
                            }
                        }
                        Err(e) => self.show_toast_error(&e.to_string()),
                    }
                    ui.close();
                }
            });
        });
    }
}

/// Slightly larger text inside dropdowns
fn menu_font(ui: &mut egui::Ui) {
    ui.style_mut()
        .text_styles
        .insert(egui::TextStyle::Button, egui::FontId::proportional(14.0));
    ui.style_mut()
        .text_styles
        .insert(egui::TextStyle::Body, egui::FontId::proportional(14.0));
}
