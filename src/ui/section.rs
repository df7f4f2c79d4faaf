//! Well-section rendering: one plot per track, side by side, sharing depth.
//!
//! Depth is plotted as negative y so it increases downwards. All plot-level
//! zoom and drag is disabled; scroll and track-border drags are turned into
//! [`crate::section::SectionView`] transitions instead.

use eframe::egui;
use egui_plot::{HLine, Line, Plot, PlotBounds, PlotPoints};

use crate::app::GeoflowApp;
use crate::section::{readout, SectionFrame};
use crate::state::{SCROLL_ZOOM_IN, SCROLL_ZOOM_OUT, TRACK_DRAG_SENSITIVITY};
use crate::ui::rgb;

/// Width of the drag handle on a track's right border
const HANDLE_WIDTH: f32 = 6.0;

/// Narrowest a track is drawn, whatever its relative width
const MIN_PANEL_PIXELS: f32 = 24.0;

/// Height reserved for a track's title
const TITLE_HEIGHT: f32 = 20.0;

impl GeoflowApp {
    /// Render the section view for the selected well
    pub fn render_section(&mut self, ui: &mut egui::Ui) {
        let Some(well) = self.selected() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Load a LAS file to display a well section")
                        .size(16.0)
                        .weak(),
                );
            });
            return;
        };

        let ctx = self.render_context();
        let (depth_factor, _) = ctx.depth_scale(well.depth_unit());
        let frame = self.section.frame(well, &ctx);
        let cursor = self.readout.as_ref().map(|r| r.depth * depth_factor);

        ui.label(egui::RichText::new(&frame.title).size(15.0).strong());
        ui.add_space(4.0);

        let interaction = draw_tracks(ui, &frame, cursor, ctx.theme.grid());

        if let Some((index, delta)) = interaction.resize {
            if let Err(e) = self.section.resize_track(index, delta) {
                tracing::warn!("Track resize rejected: {}", e);
            }
        }
        if let Some(factor) = interaction.scroll_zoom {
            if let Err(e) = self.section.scale(factor) {
                self.show_toast_error(&e.to_string());
            }
        }
        if let Some(depth) = interaction.hover_depth {
            let source_depth = depth / depth_factor;
            self.readout = self.selected().and_then(|well| readout(well, source_depth));
        }
    }
}

/// User input collected while drawing one frame
#[derive(Default)]
struct TrackInteraction {
    /// Track index and width change from a border drag
    resize: Option<(usize, f64)>,
    /// Span multiplier from the mouse wheel
    scroll_zoom: Option<f64>,
    /// Depth under the pointer, in display units
    hover_depth: Option<f64>,
}

fn draw_tracks(
    ui: &mut egui::Ui,
    frame: &SectionFrame,
    cursor: Option<f64>,
    grid: [u8; 3],
) -> TrackInteraction {
    let mut interaction = TrackInteraction::default();

    let available = ui.available_size();
    let handles = frame.panels.iter().filter(|p| !p.is_depth).count() as f32;
    let plot_width = (available.x - handles * HANDLE_WIDTH).max(0.0);
    let plot_height = (available.y - TITLE_HEIGHT).max(50.0);
    let (depth_min, depth_max) = (frame.depth_min, frame.depth_max);

    ui.horizontal_top(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;

        for panel in &frame.panels {
            let width = (plot_width * panel.width_fraction as f32).max(MIN_PANEL_PIXELS);

            ui.vertical(|ui| {
                ui.set_width(width);
                ui.label(
                    egui::RichText::new(&panel.title)
                        .color(rgb(panel.header_color))
                        .strong(),
                );

                let depth_label = frame.depth_label.clone();
                let mut plot = Plot::new(("section_track", panel.index))
                    .width(width)
                    .height(plot_height)
                    .show_axes([!panel.is_depth, panel.is_depth])
                    .show_grid([!panel.is_depth, true])
                    .allow_zoom(false)
                    .allow_drag(false)
                    .allow_scroll(false)
                    .allow_boxed_zoom(false)
                    .allow_double_click_reset(false)
                    .show_x(false)
                    .y_axis_formatter(|mark, _range| format!("{:.0}", -mark.value));
                if panel.is_depth {
                    plot = plot.y_axis_label(depth_label);
                }

                let response = plot.show(ui, |plot_ui| {
                    let (x_min, x_max) = panel.x_range;
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [x_min, -depth_max],
                        [x_max, -depth_min],
                    ));

                    for series in &panel.series {
                        for segment in &series.segments {
                            let points: PlotPoints =
                                segment.iter().map(|&[value, depth]| [value, -depth]).collect();
                            plot_ui.line(
                                Line::new(series.name.clone(), points)
                                    .color(rgb(series.color))
                                    .width(1.5),
                            );
                        }
                    }

                    if let Some(depth) = cursor {
                        plot_ui.hline(
                            HLine::new("Cursor", -depth)
                                .color(rgb(grid))
                                .width(1.0),
                        );
                    }

                    plot_ui.pointer_coordinate()
                });

                if let Some(pos) = response.inner {
                    interaction.hover_depth = Some(-pos.y);
                }
                if response.response.hovered() {
                    let scroll = ui.input(|i| i.raw_scroll_delta.y);
                    if scroll > 0.0 {
                        interaction.scroll_zoom = Some(SCROLL_ZOOM_IN);
                    } else if scroll < 0.0 {
                        interaction.scroll_zoom = Some(SCROLL_ZOOM_OUT);
                    }
                }
            });

            // The depth track keeps its width
            if !panel.is_depth {
                let (rect, response) = ui.allocate_exact_size(
                    egui::vec2(HANDLE_WIDTH, plot_height + TITLE_HEIGHT),
                    egui::Sense::drag(),
                );
                let active = response.hovered() || response.dragged();
                let color = if active {
                    ui.visuals().selection.bg_fill
                } else {
                    ui.visuals().widgets.noninteractive.bg_stroke.color
                };
                ui.painter()
                    .rect_filled(rect.shrink2(egui::vec2(2.0, 0.0)), 0.0, color);
                if active {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                }
                if response.dragged() {
                    let dx = response.drag_delta().x as f64;
                    if dx != 0.0 {
                        interaction.resize = Some((panel.index, dx * TRACK_DRAG_SENSITIVITY));
                    }
                }
            }
        }
    });

    interaction
}
