//! Sidebar UI rendering - loaded wells and the curve list of the shown well.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::app::GeoflowApp;
use crate::tracks::TrackKind;
use crate::ui::icons::draw_log_icon;

impl GeoflowApp {
    /// Render the left sidebar with the well list and curve table
    pub fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Wells");
        ui.separator();

        if self.wells.is_empty() {
            self.render_drop_zone(ui);
            return;
        }

        let mut to_select: Option<String> = None;
        let mut clear = false;
        for well in self.wells.iter() {
            let is_selected = self.selected_well.as_deref() == Some(well.name.as_str());
            let response = ui.selectable_label(is_selected, &well.name);
            if response.clicked() {
                if is_selected {
                    clear = true;
                } else {
                    to_select = Some(well.name.clone());
                }
            }

            ui.indent(format!("well_indent_{}", well.name), |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "LAS {} | {} curves | {} samples",
                        if well.version.is_empty() { "?" } else { &well.version },
                        well.curves().len(),
                        well.sample_count()
                    ))
                    .small()
                    .color(egui::Color32::GRAY),
                );
            });
        }

        if let Some(name) = to_select {
            self.select_well(&name);
        } else if clear {
            self.clear_selection();
        }

        ui.add_space(10.0);
        if ui.button("+ Add Well").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("LAS Files", &["las", "LAS"])
                .pick_file()
            {
                self.load_well_file(path);
            }
        }

        ui.add_space(5.0);
        ui.separator();
        self.render_curve_table(ui);
    }

    /// Curves of the shown well with unit, track and description
    fn render_curve_table(&mut self, ui: &mut egui::Ui) {
        let Some(well) = self.selected() else {
            ui.label(egui::RichText::new("Select a well to list its curves").weak());
            return;
        };

        ui.label(egui::RichText::new("Curves").strong());
        let depth_name = well.depth_curve_name().map(str::to_string);
        let tracks = self.section.tracks();

        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(50.0))
            .column(Column::auto().at_least(70.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["Curve", "Unit", "Track", "Description"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for curve in well.curves() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            let mut text = egui::RichText::new(&curve.mnemonic);
                            if depth_name.as_deref() == Some(curve.mnemonic.as_str()) {
                                text = text.strong();
                            }
                            ui.label(text);
                        });
                        row.col(|ui| {
                            ui.label(&curve.unit);
                        });
                        row.col(|ui| {
                            // Layout assignment wins; otherwise the lane the table would pick
                            let track = tracks
                                .iter()
                                .find(|t| t.has_curve(&curve.mnemonic))
                                .map(|t| t.name.clone())
                                .unwrap_or_else(|| {
                                    TrackKind::for_mnemonic(&curve.mnemonic).to_string()
                                });
                            ui.label(track);
                        });
                        row.col(|ui| {
                            ui.label(egui::RichText::new(&curve.description).small());
                        });
                    });
                }
            });
    }

    /// Render the drop zone for when no wells are loaded
    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let primary_color = egui::Color32::from_rgb(44, 160, 44);
        let card_bg = ui.visuals().faint_bg_color;
        let text_gray = egui::Color32::from_rgb(150, 150, 150);

        ui.add_space(20.0);

        egui::Frame::NONE
            .fill(card_bg)
            .corner_radius(12.0)
            .inner_margin(egui::Margin::same(20))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    let icon_size = 32.0;
                    let (icon_rect, _) = ui.allocate_exact_size(
                        egui::vec2(icon_size, icon_size),
                        egui::Sense::hover(),
                    );
                    draw_log_icon(ui, icon_rect, primary_color);

                    ui.add_space(12.0);

                    if ui
                        .add(
                            egui::Button::new(
                                egui::RichText::new("Open a LAS file")
                                    .color(egui::Color32::WHITE)
                                    .size(14.0),
                            )
                            .fill(primary_color),
                        )
                        .clicked()
                    {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("LAS Files", &["las", "LAS"])
                            .pick_file()
                        {
                            self.load_well_file(path);
                        }
                    }

                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("or drop files here")
                            .color(text_gray)
                            .size(12.0),
                    );
                });
            });
    }
}
