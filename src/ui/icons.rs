//! Custom icon drawing utilities.

use eframe::egui;

/// Draw a small log-strip icon: a framed lane with a wiggling curve
pub fn draw_log_icon(ui: &mut egui::Ui, rect: egui::Rect, color: egui::Color32) {
    let painter = ui.painter();
    let stroke = egui::Stroke::new(2.0, color);

    let lane = rect.shrink2(egui::vec2(rect.width() * 0.2, 0.0));
    painter.rect_stroke(lane, 3.0, stroke, egui::StrokeKind::Inside);

    // Curve zig-zagging down the lane
    let steps = 6;
    let points: Vec<egui::Pos2> = (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            let offset = if i % 2 == 0 { 0.3 } else { 0.7 };
            egui::pos2(
                lane.left() + lane.width() * offset,
                lane.top() + lane.height() * t,
            )
        })
        .collect();
    painter.add(egui::Shape::line(points, stroke));
}
