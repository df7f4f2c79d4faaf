//! Core application constants and shared UI-facing types.
//!
//! Tunables for the section view, autosave cadence and the theme/toast
//! vocabulary shared by the front end and the session file.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{EnumIter, EnumString};

// ============================================================================
// Constants
// ============================================================================

/// Narrowest a track may become when resized
pub const MIN_TRACK_WIDTH: f64 = 0.1;

/// Depth window shown before any well is bound
pub const DEFAULT_DEPTH_RANGE: (f64, f64) = (0.0, 1000.0);

/// Span multipliers for mouse-wheel zoom
pub const SCROLL_ZOOM_IN: f64 = 0.9;
pub const SCROLL_ZOOM_OUT: f64 = 1.1;

/// Span multipliers for the toolbar zoom buttons
pub const BUTTON_ZOOM_IN: f64 = 0.7;
pub const BUTTON_ZOOM_OUT: f64 = 1.4;

/// Width change per pixel of horizontal drag on a track border
pub const TRACK_DRAG_SENSITIVITY: f64 = 0.01;

/// Fraction of the data span added on each side of a track's x-range
pub const TRACK_X_MARGIN: f64 = 0.1;

/// Interval between session autosaves
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_millis(5000);

/// Longest text payload captured into the session file
pub const MAX_TEXT_VIEW_CHARS: usize = 100_000;

/// Curves shown in the depth readout, in priority order (first three present win)
pub const READOUT_CURVES: &[&str] = &["GR", "RHOB", "NPHI", "RT"];
pub const READOUT_MAX_VALUES: usize = 3;

/// Session file name inside the project directory
pub const WORKSPACE_FILE: &str = "workspace.json";

/// Template directory name inside the project directory
pub const TEMPLATES_DIR: &str = "templates";

/// Seconds a toast stays on screen
pub const TOAST_SECONDS: u64 = 3;

// ============================================================================
// Core Types
// ============================================================================

/// Visual theme. Stored by name in the session's `layout.theme`.
#[derive(
    Clone, Copy, Debug, Default, EnumIter, EnumString, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    HighContrast,
}

impl Theme {
    /// Theme for a stored name; unknown names fall back to the default
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Name stored in the session file
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::HighContrast => "high_contrast",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
            Theme::HighContrast => "High Contrast",
        }
    }

    pub fn is_dark(&self) -> bool {
        !matches!(self, Theme::Light)
    }

    /// Color used for curves declared as "black", which would vanish on a dark background
    pub fn foreground(&self) -> [u8; 3] {
        match self {
            Theme::Dark => [220, 220, 220],
            Theme::Light => [0, 0, 0],
            Theme::HighContrast => [255, 255, 0],
        }
    }

    pub fn grid(&self) -> [u8; 3] {
        match self {
            Theme::Dark => [70, 70, 70],
            Theme::Light => [200, 200, 200],
            Theme::HighContrast => [128, 128, 128],
        }
    }
}

/// Toast flavour for user feedback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastType {
    Info,
    Success,
    Error,
}

impl ToastType {
    pub fn color(&self) -> [u8; 3] {
        match self {
            ToastType::Info => [71, 108, 155],
            ToastType::Success => [113, 120, 78],
            ToastType::Error => [135, 30, 28],
        }
    }

    pub fn text_color(&self) -> [u8; 3] {
        [246, 247, 235]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names_round_trip() {
        use strum::IntoEnumIterator;
        for theme in Theme::iter() {
            assert_eq!(Theme::from_name(theme.name()), theme);
        }
        assert_eq!(Theme::from_name("light"), Theme::Light);
        assert_eq!(Theme::from_name("high_contrast"), Theme::HighContrast);
        assert_eq!(Theme::from_name("NeonButtons"), Theme::Dark);
    }
}
