//! UI rendering modules for the geoflow application.
//!
//! Each submodule adds `render_*` methods to [`crate::app::GeoflowApp`]:
//! - `menu` - Menu bar (File, View, Units, Templates)
//! - `toolbar` - Depth range, zoom and derivation controls, status bar
//! - `sidebar` - Loaded wells and curve table
//! - `section` - Multi-track well-section plots
//! - `notes` - Notes window and template name dialog
//! - `toast` - Toast notification system
//! - `icons` - Custom icon drawing utilities

use eframe::egui;

pub mod icons;
pub mod menu;
pub mod notes;
pub mod section;
pub mod sidebar;
pub mod toast;
pub mod toolbar;

/// Convert an RGB triple to an egui color
pub(crate) fn rgb(color: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(color[0], color[1], color[2])
}
