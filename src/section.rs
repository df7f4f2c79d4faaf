//! Well-section view: the depth window and track layout shown for one well.
//!
//! [`SectionView`] is a small state machine driven by user actions (bind a
//! well, zoom, pan, fit, resize a track, apply a template). Every accepted
//! transition bumps [`SectionView::generation`]; the front end redraws the
//! whole section from [`SectionView::frame`] whenever it changes. Rejected
//! transitions leave the view untouched.

use thiserror::Error;

use crate::state::{
    Theme, DEFAULT_DEPTH_RANGE, READOUT_CURVES, READOUT_MAX_VALUES, TRACK_X_MARGIN,
};
use crate::template::TrackTemplate;
use crate::tracks::{curve_color, default_tracks, parse_color, track_for_curve, Track, TrackKind};
use crate::units::UnitPreferences;
use crate::well::Well;

#[derive(Debug, Error, PartialEq)]
pub enum SectionError {
    #[error("invalid depth range: minimum ({min}) must be below maximum ({max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("invalid zoom factor {0}")]
    InvalidFactor(f64),

    #[error("no track at position {0}")]
    NoSuchTrack(usize),

    #[error("no well is shown in the section")]
    NotBound,
}

/// A depth window. Both ends are finite and `min < max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthRange {
    min: f64,
    max: f64,
}

impl DepthRange {
    pub fn new(min: f64, max: f64) -> Result<Self, SectionError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(SectionError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Range covering `lo..=hi`; a single-depth extent is widened by half a
    /// unit either side
    fn covering(lo: f64, hi: f64) -> Option<Self> {
        Self::new(lo, hi)
            .or_else(|_| Self::new(lo - 0.5, hi + 0.5))
            .ok()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, depth: f64) -> bool {
        (self.min..=self.max).contains(&depth)
    }

    /// Span multiplied by `factor` about the centre
    pub fn scaled(&self, factor: f64) -> Result<Self, SectionError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(SectionError::InvalidFactor(factor));
        }
        let half = self.span() * factor / 2.0;
        Self::new(self.center() - half, self.center() + half)
    }

    pub fn shifted(&self, delta: f64) -> Result<Self, SectionError> {
        Self::new(self.min + delta, self.max + delta)
    }
}

impl Default for DepthRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_DEPTH_RANGE.0,
            max: DEFAULT_DEPTH_RANGE.1,
        }
    }
}

/// Where the view is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    /// No well attached
    #[default]
    Unbound,
    /// Showing the bound well's full depth extent
    Bound,
    /// Same well, user-chosen depth window
    Zoomed,
}

/// Track layout plus depth window for the section display
#[derive(Clone, Debug)]
pub struct SectionView {
    tracks: Vec<Track>,
    range: DepthRange,
    /// Full depth extent of the bound well, if it has any finite depth
    extent: Option<DepthRange>,
    well: Option<String>,
    state: ViewState,
    generation: u64,
}

impl Default for SectionView {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionView {
    pub fn new() -> Self {
        Self::with_tracks(default_tracks())
    }

    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            range: DepthRange::default(),
            extent: None,
            well: None,
            state: ViewState::Unbound,
            generation: 0,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn range(&self) -> DepthRange {
        self.range
    }

    pub fn extent(&self) -> Option<DepthRange> {
        self.extent
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Name of the bound well
    pub fn well_name(&self) -> Option<&str> {
        self.well.as_deref()
    }

    /// Counter bumped by every accepted transition
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Attach a well: the depth window becomes its full extent and curves not
    /// yet shown in any track are placed by the mnemonic table.
    pub fn bind(&mut self, well: &Well) {
        self.extent = well
            .depth_extent()
            .and_then(|(lo, hi)| DepthRange::covering(lo, hi));
        if self.extent.is_none() {
            tracing::warn!("Well {} has no finite depth samples", well.name);
        }
        self.range = self.extent.unwrap_or_default();
        self.well = Some(well.name.clone());
        self.state = ViewState::Bound;
        self.assign_curves(well);
        self.touch();
    }

    /// Detach the well and return to the default window
    pub fn unbind(&mut self) {
        self.well = None;
        self.extent = None;
        self.range = DepthRange::default();
        self.state = ViewState::Unbound;
        self.touch();
    }

    /// Place curves of `well` that no track holds yet (for instance freshly
    /// derived ones)
    pub fn sync_curves(&mut self, well: &Well) {
        if self.assign_curves(well) {
            self.touch();
        }
    }

    fn assign_curves(&mut self, well: &Well) -> bool {
        let mut changed = false;
        for name in well.curve_names() {
            if self.tracks.iter().any(|t| t.has_curve(name)) {
                continue;
            }
            // Layouts from templates may have fewer lanes than the table knows
            if let Some(track) = self.tracks.get_mut(track_for_curve(name)) {
                track.add_curve(name);
                changed = true;
            }
        }
        changed
    }

    /// Show `min..max`. An inverted, empty or non-finite window is rejected.
    pub fn zoom(&mut self, min: f64, max: f64) -> Result<(), SectionError> {
        self.set_range(DepthRange::new(min, max)?);
        Ok(())
    }

    /// Multiply the visible span by `factor` about its centre (< 1 zooms in)
    pub fn scale(&mut self, factor: f64) -> Result<(), SectionError> {
        let range = self.range.scaled(factor)?;
        self.set_range(range);
        Ok(())
    }

    /// Move the window by `delta` depth units
    pub fn pan(&mut self, delta: f64) -> Result<(), SectionError> {
        let range = self.range.shifted(delta)?;
        self.set_range(range);
        Ok(())
    }

    fn set_range(&mut self, range: DepthRange) {
        self.range = range;
        if self.state != ViewState::Unbound {
            self.state = ViewState::Zoomed;
        }
        self.touch();
    }

    /// Back to the bound well's full extent
    pub fn fit(&mut self) -> Result<(), SectionError> {
        if self.state == ViewState::Unbound {
            return Err(SectionError::NotBound);
        }
        self.range = self.extent.unwrap_or_default();
        self.state = ViewState::Bound;
        self.touch();
        Ok(())
    }

    /// Grow or shrink one track; the width never drops below the floor
    pub fn resize_track(&mut self, index: usize, delta: f64) -> Result<(), SectionError> {
        let track = self
            .tracks
            .get_mut(index)
            .ok_or(SectionError::NoSuchTrack(index))?;
        let width = track.width + delta;
        track.set_width(width);
        self.touch();
        Ok(())
    }

    /// Replace the track layout with a template's
    pub fn apply_template(&mut self, template: &TrackTemplate) {
        self.tracks = template.tracks.clone();
        self.touch();
    }

    /// Snapshot of the current layout as a named template
    pub fn to_template(&self, name: &str) -> TrackTemplate {
        TrackTemplate::new(name, self.tracks.clone())
    }

    /// Build the render model for `well` under the current view.
    pub fn frame(&self, well: &Well, ctx: &RenderContext) -> SectionFrame {
        let depth = well.depth_values();
        let (depth_factor, depth_unit) = ctx.depth_scale(well.depth_unit());
        let total_width: f64 = self.tracks.iter().map(|t| t.width).sum();

        let panels = self
            .tracks
            .iter()
            .enumerate()
            .map(|(index, track)| {
                let is_depth = index == TrackKind::Depth.index();
                let series: Vec<CurveSeries> = track
                    .curves
                    .iter()
                    .filter_map(|name| well.curve(name))
                    .map(|curve| CurveSeries {
                        name: curve.mnemonic.clone(),
                        unit: curve.unit.clone(),
                        color: ctx.resolve_color(curve_color(&curve.mnemonic)),
                        segments: segments(&curve.samples, &depth, depth_factor),
                    })
                    .collect();

                let x_range = if is_depth {
                    (0.0, 1.0)
                } else {
                    track_x_range(track, well)
                };

                TrackPanel {
                    index,
                    title: track.name.clone(),
                    width_fraction: if total_width > 0.0 {
                        track.width / total_width
                    } else {
                        0.0
                    },
                    header_color: ctx.resolve_color(&track.color),
                    is_depth,
                    x_range,
                    series,
                }
            })
            .collect();

        SectionFrame {
            title: format!("Well Section - {}", well.name),
            depth_min: self.range.min() * depth_factor,
            depth_max: self.range.max() * depth_factor,
            depth_label: if depth_unit.is_empty() {
                "Depth (index)".to_string()
            } else {
                format!("Depth ({})", depth_unit)
            },
            panels,
            generation: self.generation,
        }
    }
}

/// Data x-range across a track's curves, padded by the margin on both sides
fn track_x_range(track: &Track, well: &Well) -> (f64, f64) {
    let bounds = track
        .curves
        .iter()
        .filter_map(|name| well.curve(name))
        .filter_map(|curve| curve.finite_range())
        .reduce(|(lo1, hi1), (lo2, hi2)| (lo1.min(lo2), hi1.max(hi2)));

    match bounds {
        Some((lo, hi)) if hi > lo => {
            let margin = (hi - lo) * TRACK_X_MARGIN;
            (lo - margin, hi + margin)
        }
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    }
}

/// Split a curve into `[value, depth]` polylines, breaking at missing samples
fn segments(samples: &[f64], depth: &[f64], depth_factor: f64) -> Vec<Vec<[f64; 2]>> {
    let mut out = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for (&value, &d) in samples.iter().zip(depth) {
        if value.is_finite() && d.is_finite() {
            current.push([value, d * depth_factor]);
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Display settings passed into rendering
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    pub theme: Theme,
    pub units: UnitPreferences,
}

impl RenderContext {
    /// Multiplier from the well's depth unit to the display unit, and the
    /// display unit's label
    pub fn depth_scale<'a>(&self, source_unit: &'a str) -> (f64, &'a str) {
        self.units.convert_depth(1.0, source_unit)
    }

    /// RGB for a color string. Black and unparsable colors take the theme
    /// foreground so curves stay visible on dark backgrounds.
    pub fn resolve_color(&self, color: &str) -> [u8; 3] {
        match parse_color(color) {
            Some([0, 0, 0]) | None => self.theme.foreground(),
            Some(rgb) => rgb,
        }
    }
}

/// Everything needed to draw one section, with depths in display units
#[derive(Clone, Debug, PartialEq)]
pub struct SectionFrame {
    pub title: String,
    pub depth_min: f64,
    pub depth_max: f64,
    pub depth_label: String,
    pub panels: Vec<TrackPanel>,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackPanel {
    pub index: usize,
    pub title: String,
    /// Share of the total section width
    pub width_fraction: f64,
    pub header_color: [u8; 3],
    pub is_depth: bool,
    pub x_range: (f64, f64),
    pub series: Vec<CurveSeries>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CurveSeries {
    pub name: String,
    pub unit: String,
    pub color: [u8; 3],
    /// Unbroken runs of `[value, depth]` points
    pub segments: Vec<Vec<[f64; 2]>>,
}

/// Curve values at the sample nearest a cursor depth
#[derive(Clone, Debug, PartialEq)]
pub struct DepthReadout {
    pub depth: f64,
    pub index: usize,
    pub values: Vec<(String, f64)>,
}

impl DepthReadout {
    /// Text for the status bar, with the depth converted for display
    pub fn label(&self, depth_factor: f64, depth_unit: &str) -> String {
        let mut text = format!("Depth: {:.1}", self.depth * depth_factor);
        if !depth_unit.is_empty() {
            text.push(' ');
            text.push_str(depth_unit);
        }
        text.push_str(&format!(" | Index: {}", self.index));
        if !self.values.is_empty() {
            let values: Vec<String> = self
                .values
                .iter()
                .map(|(name, value)| format!("{}: {:.3}", name, value))
                .collect();
            text.push_str(" | ");
            text.push_str(&values.join(", "));
        }
        text
    }
}

impl std::fmt::Display for DepthReadout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label(1.0, ""))
    }
}

/// Readout at `depth`: nearest sample index plus the finite values of the
/// first few readout curves the well carries
pub fn readout(well: &Well, depth: f64) -> Option<DepthReadout> {
    let index = well.nearest_index(depth)?;
    let values = READOUT_CURVES
        .iter()
        .filter_map(|&name| {
            let value = *well.curve_data(name)?.get(index)?;
            value.is_finite().then(|| (name.to_string(), value))
        })
        .take(READOUT_MAX_VALUES)
        .collect();

    Some(DepthReadout {
        depth,
        index,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Curve;
    use crate::units::DepthUnit;

    fn well() -> Well {
        Well::new("W-1")
            .with_curve(Curve::new("DEPT", "FT", "", vec![1000.0, 1010.0, 1020.0, 1030.0]))
            .with_curve(Curve::new("GR", "GAPI", "", vec![20.0, f64::NAN, 80.0, 120.0]))
            .with_curve(Curve::new("RHOB", "G/C3", "", vec![2.3, 2.4, 2.5, 2.6]))
            .with_curve(Curve::new("NPHI", "V/V", "", vec![0.3, 0.25, f64::NAN, 0.1]))
            .with_curve(Curve::new("RT", "OHMM", "", vec![5.0, 6.0, 7.0, 8.0]))
            .with_curve(Curve::new("CALI", "IN", "", vec![8.5, 8.5, 8.6, 8.7]))
    }

    #[test]
    fn test_depth_range_validation() {
        assert!(DepthRange::new(0.0, 1.0).is_ok());
        assert!(DepthRange::new(1.0, 1.0).is_err());
        assert!(DepthRange::new(5.0, 1.0).is_err());
        assert!(DepthRange::new(f64::NAN, 1.0).is_err());
        assert!(DepthRange::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_bind_assigns_curves_and_extent() {
        let mut view = SectionView::new();
        assert_eq!(view.state(), ViewState::Unbound);
        assert_eq!(view.range(), DepthRange::default());

        view.bind(&well());
        assert_eq!(view.state(), ViewState::Bound);
        assert_eq!(view.well_name(), Some("W-1"));
        assert_eq!(view.range(), DepthRange::new(1000.0, 1030.0).unwrap());

        let tracks = view.tracks();
        assert_eq!(tracks[0].curves, vec!["DEPT"]);
        assert_eq!(tracks[1].curves, vec!["GR", "CALI"]);
        assert_eq!(tracks[2].curves, vec!["RT"]);
        assert_eq!(tracks[3].curves, vec!["RHOB"]);
        assert_eq!(tracks[4].curves, vec!["NPHI"]);

        // Rebinding does not duplicate assignments
        view.bind(&well());
        assert_eq!(view.tracks()[1].curves, vec!["GR", "CALI"]);
    }

    #[test]
    fn test_bind_degenerate_and_missing_depth() {
        let mut view = SectionView::new();
        let flat = Well::new("flat").with_curve(Curve::new("DEPT", "M", "", vec![500.0, 500.0]));
        view.bind(&flat);
        assert_eq!(view.range(), DepthRange::new(499.5, 500.5).unwrap());

        let no_depth = Well::new("nan").with_curve(Curve::new("DEPT", "M", "", vec![f64::NAN]));
        view.bind(&no_depth);
        assert_eq!(view.range(), DepthRange::default());
        assert_eq!(view.state(), ViewState::Bound);
    }

    #[test]
    fn test_inverted_zoom_is_rejected() {
        let mut view = SectionView::new();
        view.bind(&well());
        view.zoom(1005.0, 1015.0).unwrap();
        let before = view.range();
        let generation = view.generation();

        assert_eq!(
            view.zoom(500.0, 100.0),
            Err(SectionError::InvalidRange {
                min: 500.0,
                max: 100.0
            })
        );
        assert!(view.zoom(300.0, 300.0).is_err());
        assert!(view.zoom(f64::NAN, 300.0).is_err());
        assert_eq!(view.range(), before);
        assert_eq!(view.state(), ViewState::Zoomed);
        assert_eq!(view.generation(), generation);
    }

    #[test]
    fn test_zoom_while_unbound_stays_unbound() {
        let mut view = SectionView::new();
        view.zoom(100.0, 200.0).unwrap();
        assert_eq!(view.state(), ViewState::Unbound);
        assert_eq!(view.range().min(), 100.0);
        assert_eq!(view.fit(), Err(SectionError::NotBound));
    }

    #[test]
    fn test_scale_pan_fit() {
        let mut view = SectionView::new();
        view.bind(&well());

        view.scale(0.9).unwrap();
        let range = view.range();
        assert!((range.span() - 27.0).abs() < 1e-9);
        assert!((range.center() - 1015.0).abs() < 1e-9);
        assert_eq!(view.state(), ViewState::Zoomed);

        view.pan(10.0).unwrap();
        assert!((view.range().center() - 1025.0).abs() < 1e-9);

        assert!(view.scale(0.0).is_err());
        assert!(view.scale(f64::NAN).is_err());

        view.fit().unwrap();
        assert_eq!(view.state(), ViewState::Bound);
        assert_eq!(view.range(), DepthRange::new(1000.0, 1030.0).unwrap());

        view.unbind();
        assert_eq!(view.state(), ViewState::Unbound);
        assert_eq!(view.range(), DepthRange::default());
    }

    #[test]
    fn test_resize_track() {
        let mut view = SectionView::new();
        view.resize_track(1, 0.5).unwrap();
        assert_eq!(view.tracks()[1].width, 1.5);
        view.resize_track(1, -10.0).unwrap();
        assert_eq!(view.tracks()[1].width, 0.1);
        assert_eq!(view.resize_track(9, 1.0), Err(SectionError::NoSuchTrack(9)));
        assert_eq!(view.tracks().len(), 5);
    }

    #[test]
    fn test_generation_counts_accepted_transitions() {
        let mut view = SectionView::new();
        let w = well();
        view.bind(&w);
        view.scale(1.1).unwrap();
        let _ = view.zoom(2.0, 1.0);
        view.fit().unwrap();
        assert_eq!(view.generation(), 3);

        // Nothing new to place
        view.sync_curves(&w);
        assert_eq!(view.generation(), 3);
    }

    #[test]
    fn test_sync_places_derived_curve() {
        let mut view = SectionView::new();
        let mut w = well();
        view.bind(&w);
        w.insert_curve(Curve::new("VSH", "fraction", "Shale Volume", vec![0.0; 4]));
        view.sync_curves(&w);
        assert!(view.tracks()[1].has_curve("VSH"));
    }

    #[test]
    fn test_template_with_fewer_tracks() {
        let mut view = SectionView::new();
        let template = TrackTemplate::new(
            "two",
            vec![Track::new("Depth", 0.5, "black"), Track::new("GR", 2.0, "green")],
        );
        view.apply_template(&template);
        view.bind(&well());
        // Density and neutron curves have no lane to go to
        assert_eq!(view.tracks().len(), 2);
        assert_eq!(view.tracks()[1].curves, vec!["GR", "CALI"]);
    }

    #[test]
    fn test_frame_margins_and_depth_panel() {
        let mut view = SectionView::new();
        let w = well();
        view.bind(&w);
        let frame = view.frame(&w, &RenderContext::default());

        assert_eq!(frame.panels.len(), 5);
        assert_eq!(frame.depth_label, "Depth (ft)");
        assert_eq!((frame.depth_min, frame.depth_max), (1000.0, 1030.0));
        assert!(frame.panels[0].is_depth);
        assert_eq!(frame.panels[0].x_range, (0.0, 1.0));

        // RT spans 5..8, padded 10% each side
        let (lo, hi) = frame.panels[2].x_range;
        assert!((lo - 4.7).abs() < 1e-9);
        assert!((hi - 8.3).abs() < 1e-9);

        let fractions: f64 = frame.panels.iter().map(|p| p.width_fraction).sum();
        assert!((fractions - 1.0).abs() < 1e-9);

        // GR has a gap at the NaN sample
        let gr = &frame.panels[1].series[0];
        assert_eq!(gr.name, "GR");
        assert_eq!(gr.segments.len(), 2);
        assert_eq!(gr.segments[0], vec![[20.0, 1000.0]]);
        assert_eq!(gr.color, [44, 160, 44]);
    }

    #[test]
    fn test_frame_converts_depth_units() {
        let mut view = SectionView::new();
        let w = well();
        view.bind(&w);
        let ctx = RenderContext {
            units: UnitPreferences {
                depth: DepthUnit::Meters,
            },
            ..Default::default()
        };
        let frame = view.frame(&w, &ctx);
        assert_eq!(frame.depth_label, "Depth (m)");
        assert!((frame.depth_min - 304.8).abs() < 1e-6);
    }

    #[test]
    fn test_black_follows_theme() {
        let dark = RenderContext::default();
        assert_eq!(dark.resolve_color("black"), Theme::Dark.foreground());
        assert_eq!(dark.resolve_color("not-a-color"), Theme::Dark.foreground());
        let light = RenderContext {
            theme: Theme::Light,
            ..Default::default()
        };
        assert_eq!(light.resolve_color("black"), [0, 0, 0]);
        assert_eq!(light.resolve_color("red"), [214, 39, 40]);
    }

    #[test]
    fn test_readout_nearest_sample() {
        let w = well();
        let r = readout(&w, 1018.0).unwrap();
        assert_eq!(r.index, 2);
        // NPHI is NaN at this sample, RT fills the third slot
        assert_eq!(
            r.values,
            vec![
                ("GR".to_string(), 80.0),
                ("RHOB".to_string(), 2.5),
                ("RT".to_string(), 7.0)
            ]
        );
        assert_eq!(
            r.to_string(),
            "Depth: 1018.0 | Index: 2 | GR: 80.000, RHOB: 2.500, RT: 7.000"
        );
        assert!(r.label(0.3048, "m").starts_with("Depth: 310.3 m | Index: 2"));

        let r = readout(&w, 990.0).unwrap();
        assert_eq!(r.index, 0);
        assert_eq!(r.values.len(), 3);
        assert_eq!(r.values[2].0, "NPHI");

        assert!(readout(&Well::new("empty"), 1.0).is_none());
    }
}
