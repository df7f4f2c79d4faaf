//! Toolbar (depth range, zoom, derivations) and status bar.

use eframe::egui;

use crate::app::GeoflowApp;
use crate::petro::DerivedCurve;

impl GeoflowApp {
    /// Render the toolbar above the section
    pub fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        let bound = self.selected_well.is_some();

        ui.horizontal_wrapped(|ui| {
            ui.add_enabled_ui(bound, |ui| {
                ui.label("Depth:");
                let min_edit = ui.add(
                    egui::TextEdit::singleline(&mut self.depth_min_text).desired_width(70.0),
                );
                ui.label("to");
                let max_edit = ui.add(
                    egui::TextEdit::singleline(&mut self.depth_max_text).desired_width(70.0),
                );
                let submitted = (min_edit.lost_focus() || max_edit.lost_focus())
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Apply").clicked() || submitted {
                    self.apply_depth_text();
                }

                ui.separator();

                if ui.button("Fit").on_hover_text("Show the whole well").clicked() {
                    self.fit_to_data();
                }
                if ui.button("🔍+").on_hover_text("Zoom in").clicked() {
                    self.zoom_in();
                }
                if ui.button("🔍−").on_hover_text("Zoom out").clicked() {
                    self.zoom_out();
                }

                ui.separator();

                ui.label("GR clean");
                ui.add(egui::DragValue::new(&mut self.shale_params.gr_clean).speed(1.0));
                ui.label("shale");
                ui.add(egui::DragValue::new(&mut self.shale_params.gr_shale).speed(1.0));
                if ui
                    .button("Calculate Vsh")
                    .on_hover_text("Shale volume from the GR curve")
                    .clicked()
                {
                    self.derive_curve(DerivedCurve::ShaleVolume);
                }

                ui.separator();

                ui.label("ρ matrix");
                ui.add(
                    egui::DragValue::new(&mut self.porosity_params.matrix_density)
                        .speed(0.01)
                        .range(0.5..=5.0),
                );
                ui.label("fluid");
                ui.add(
                    egui::DragValue::new(&mut self.porosity_params.fluid_density)
                        .speed(0.01)
                        .range(0.5..=5.0),
                );
                if ui
                    .button("Calculate Porosity")
                    .on_hover_text("Density porosity from the RHOB curve")
                    .clicked()
                {
                    self.derive_curve(DerivedCurve::Porosity);
                }
            });
        });
    }

    /// Render the status bar with the depth readout
    pub fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let text = match (self.selected(), &self.readout) {
                (Some(well), Some(readout)) => {
                    let (factor, unit) = self
                        .render_context()
                        .depth_scale(well.depth_unit());
                    readout.label(factor, unit)
                }
                (Some(_), None) => "Depth: -- | Value: --".to_string(),
                (None, _) => "No well loaded".to_string(),
            };
            ui.label(text);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(extent) = self.section.extent() {
                    ui.label(
                        egui::RichText::new(format!(
                            "{:?} | extent {:.1} - {:.1}",
                            self.section.state(),
                            extent.min(),
                            extent.max()
                        ))
                        .small()
                        .weak(),
                    );
                }
            });
        });
    }
}
