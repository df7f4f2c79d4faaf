//! Display tracks and the mnemonic → track lookup.
//!
//! A track is a vertical lane of the well section. Which lane a curve lands
//! in is decided by [`TrackKind::for_mnemonic`], a fixed table over the
//! common logging mnemonics; anything unknown goes to the gamma-ray lane.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::state::MIN_TRACK_WIDTH;

/// The lanes of the default well-section layout, in display order
#[derive(
    AsRefStr, Clone, Copy, Debug, Display, EnumCount, EnumIter, PartialEq, Eq, Hash,
)]
pub enum TrackKind {
    Depth,
    #[strum(serialize = "GR")]
    GammaRay,
    Resistivity,
    Density,
    Neutron,
}

impl TrackKind {
    /// Position of this lane in the default layout
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        TrackKind::iter().nth(index)
    }

    /// Track a curve belongs to. Total over all strings: unmapped mnemonics
    /// fall back to the gamma-ray track. Duplicate suffixes (`GR:1`) and
    /// letter case are ignored.
    pub fn for_mnemonic(mnemonic: &str) -> Self {
        let base = mnemonic.split(':').next().unwrap_or(mnemonic).trim();
        match base.to_ascii_uppercase().as_str() {
            "DEPT" | "DEPTH" | "MD" | "TVD" => TrackKind::Depth,
            "GR" | "GR_EDTC" | "CGR" => TrackKind::GammaRay,
            "RT" | "ILD" | "LLD" | "MSFL" | "LLS" => TrackKind::Resistivity,
            "RHOB" | "RHOZ" | "DRHO" => TrackKind::Density,
            "NPHI" | "NPOR" | "TNPH" => TrackKind::Neutron,
            _ => TrackKind::GammaRay,
        }
    }

    pub fn default_width(self) -> f64 {
        match self {
            TrackKind::Depth => 0.5,
            _ => 1.0,
        }
    }

    pub fn default_color(self) -> &'static str {
        match self {
            TrackKind::Depth => "black",
            TrackKind::GammaRay => "green",
            TrackKind::Resistivity => "blue",
            TrackKind::Density => "red",
            TrackKind::Neutron => "purple",
        }
    }

    pub fn default_track(self) -> Track {
        Track::new(self.to_string(), self.default_width(), self.default_color())
    }
}

/// Index of the track a curve should be drawn in
pub fn track_for_curve(mnemonic: &str) -> usize {
    TrackKind::for_mnemonic(mnemonic).index()
}

/// Depth, GR, Resistivity, Density, Neutron
pub fn default_tracks() -> Vec<Track> {
    TrackKind::iter().map(TrackKind::default_track).collect()
}

/// Line color for a curve
pub fn curve_color(mnemonic: &str) -> &'static str {
    let base = mnemonic.split(':').next().unwrap_or(mnemonic).trim();
    match base.to_ascii_uppercase().as_str() {
        "GR" | "GR_EDTC" => "green",
        "RHOB" | "RHOZ" => "red",
        "NPHI" | "NPOR" => "blue",
        "RT" | "ILD" | "LLD" => "purple",
        "DT" | "DTC" => "orange",
        _ => "black",
    }
}

/// Named colors accepted in track and template definitions
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("red", [214, 39, 40]),
    ("green", [44, 160, 44]),
    ("blue", [31, 119, 180]),
    ("purple", [148, 103, 189]),
    ("orange", [255, 127, 14]),
    ("brown", [140, 86, 75]),
    ("pink", [227, 119, 194]),
    ("olive", [188, 189, 34]),
    ("cyan", [23, 190, 207]),
    ("magenta", [255, 0, 255]),
    ("yellow", [255, 215, 0]),
    ("navy", [0, 0, 128]),
];

/// Parse a color name or `#rrggbb` / `#rgb` hex string into RGB
pub fn parse_color(color: &str) -> Option<[u8; 3]> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            6 => Some([
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            ]),
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, i) in rgb.iter_mut().zip(0..3) {
                    let v = channel(hex.get(i..i + 1)?)?;
                    *slot = v * 17;
                }
                Some(rgb)
            }
            _ => None,
        };
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(color))
        .map(|(_, rgb)| *rgb)
}

/// A vertical display lane holding zero or more curves
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    /// Relative width; never below [`MIN_TRACK_WIDTH`]
    pub width: f64,
    pub color: String,
    #[serde(default)]
    pub curves: Vec<String>,
}

impl Track {
    pub fn new(name: impl Into<String>, width: f64, color: impl Into<String>) -> Self {
        let mut track = Self {
            name: name.into(),
            width: MIN_TRACK_WIDTH,
            color: color.into(),
            curves: Vec::new(),
        };
        track.set_width(width);
        track
    }

    /// Set the width, applying the minimum floor
    pub fn set_width(&mut self, width: f64) {
        self.width = if width.is_finite() {
            width.max(MIN_TRACK_WIDTH)
        } else {
            MIN_TRACK_WIDTH
        };
    }

    /// Add a curve to this track (no-op if already present)
    pub fn add_curve(&mut self, curve_name: &str) {
        if !self.has_curve(curve_name) {
            self.curves.push(curve_name.to_string());
        }
    }

    /// Remove a curve from this track (no-op if absent)
    pub fn remove_curve(&mut self, curve_name: &str) {
        self.curves.retain(|c| c != curve_name);
    }

    pub fn has_curve(&self, curve_name: &str) -> bool {
        self.curves.iter().any(|c| c == curve_name)
    }
}
