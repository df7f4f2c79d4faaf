//! Section Workflow Tests
//!
//! Loads a LAS file from disk and drives it through the library the way the
//! viewer does: bind, zoom, derive a curve, save a layout, persist a session.
//! No window is created.

use std::fs;
use std::path::PathBuf;

use geoflow::parsers::LoadError;
use geoflow::petro::{DerivedCurve, ShaleVolumeParams};
use geoflow::section::{readout, RenderContext, SectionError, SectionView, ViewState};
use geoflow::state::WORKSPACE_FILE;
use geoflow::template::{templates_dir, TrackTemplate};
use geoflow::tracks::TrackKind;
use geoflow::well::WellCollection;
use geoflow::workspace::{ViewDescriptor, WorkspaceState};

const LAS: &str = "\
~VERSION INFORMATION
 VERS.                2.0 : CWLS LOG ASCII STANDARD - VERSION 2.0
 WRAP.                 NO : ONE LINE PER DEPTH STEP
~WELL INFORMATION
 STRT.FT         1000.0000 : START DEPTH
 STOP.FT         1004.0000 : STOP DEPTH
 STEP.FT            1.0000 : STEP
 NULL.           -999.2500 : NULL VALUE
 WELL.              TARO-3 : WELL
~CURVE INFORMATION
 DEPT.FT                   : DEPTH
 GR.GAPI                   : GAMMA RAY
 RHOB.G/C3                 : BULK DENSITY
 ILD.OHMM                  : DEEP RESISTIVITY
~ASCII
1000.0   30.0   2.65   12.0
1001.0   60.0   2.40   -999.25
1002.0   90.0   2.20   8.5
1003.0  120.0   2.10   4.0
1004.0  150.0   2.00   2.5
";

fn write_las(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Loading, binding and the zoom transitions on a real file
#[test]
fn test_load_bind_zoom_fit() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_las(&dir, "taro3.las", LAS);

    let mut wells = WellCollection::new();
    let name = wells.load_well(&path).unwrap();
    assert_eq!(name, "TARO-3");

    let well = wells.get(&name).unwrap();
    assert_eq!(well.sample_count(), 5);
    assert_eq!(well.depth_curve_name(), Some("DEPT"));
    assert!(well.curve_data("ILD").unwrap()[1].is_nan());

    let mut view = SectionView::new();
    assert_eq!(view.state(), ViewState::Unbound);
    view.bind(well);
    assert_eq!(view.state(), ViewState::Bound);
    assert_eq!(view.range().min(), 1000.0);
    assert_eq!(view.range().max(), 1004.0);
    assert!(view.tracks()[TrackKind::Resistivity.index()].has_curve("ILD"));

    let generation = view.generation();
    assert_eq!(
        view.zoom(1003.0, 1001.0),
        Err(SectionError::InvalidRange {
            min: 1003.0,
            max: 1001.0
        })
    );
    assert_eq!(view.generation(), generation);
    assert_eq!(view.state(), ViewState::Bound);

    view.zoom(1001.0, 1003.0).unwrap();
    assert_eq!(view.state(), ViewState::Zoomed);
    assert!(view.generation() > generation);

    view.fit().unwrap();
    assert_eq!(view.state(), ViewState::Bound);
    assert_eq!(view.range().min(), 1000.0);
}

/// A resistivity gap splits the plotted line instead of bridging it
#[test]
fn test_frame_splits_null_samples() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_las(&dir, "taro3.las", LAS);

    let mut wells = WellCollection::new();
    let name = wells.load_well(&path).unwrap();
    let well = wells.get(&name).unwrap();

    let mut view = SectionView::new();
    view.bind(well);
    let frame = view.frame(well, &RenderContext::default());

    assert_eq!(frame.title, "Well Section - TARO-3");
    assert_eq!(frame.panels.len(), view.tracks().len());
    let resistivity = &frame.panels[TrackKind::Resistivity.index()];
    let ild = resistivity
        .series
        .iter()
        .find(|s| s.name == "ILD")
        .unwrap();
    assert_eq!(ild.segments.len(), 2);
    assert_eq!(ild.segments[0].len(), 1);
    assert_eq!(ild.segments[1].len(), 3);

    let value = readout(well, 1002.2).unwrap();
    assert_eq!(value.index, 2);
    assert_eq!(value.depth, 1002.2);
    assert!(value.values.iter().any(|(name, v)| name == "GR" && *v == 90.0));
}

/// A derived curve lands in its track and a saved layout restores it
#[test]
fn test_derive_then_template_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_las(&dir, "taro3.las", LAS);

    let mut wells = WellCollection::new();
    let name = wells.load_well(&path).unwrap();

    let mut view = SectionView::new();
    view.bind(wells.get(&name).unwrap());

    let well = wells.get_mut(&name).unwrap();
    let vsh = well.shale_volume(&ShaleVolumeParams::default()).unwrap();
    assert!((vsh[0] - 0.0).abs() < 1e-9);
    assert!((vsh[2] - 0.5).abs() < 1e-9);
    assert!((vsh[4] - 1.0).abs() < 1e-9);
    well.store_derived(DerivedCurve::ShaleVolume, vsh);

    view.sync_curves(wells.get(&name).unwrap());
    assert!(view.tracks()[TrackKind::GammaRay.index()].has_curve("VSH"));

    view.resize_track(TrackKind::Density.index(), 0.5).unwrap();
    let template = view.to_template("Shaly Sand");
    let dir_templates = templates_dir(dir.path());
    let saved = template.save(&dir_templates).unwrap();
    assert_eq!(TrackTemplate::list(&dir_templates).unwrap(), vec![saved.clone()]);

    let mut fresh = SectionView::new();
    fresh.apply_template(&TrackTemplate::load(&saved).unwrap());
    assert_eq!(fresh.tracks(), view.tracks());
    assert_eq!(fresh.tracks()[TrackKind::Density.index()].width, 1.5);
}

/// Hand-edited session files with comments still load and save cleanly
#[test]
fn test_session_with_comments_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(WORKSPACE_FILE),
        "// geoflow session\n{\n  /* views */\n  \"open_views\": [\n    {\"type\": \"text\", \"title\": \"Notes\", \"content\": \"see http://example.org\"}\n  ],\n  \"layout\": {\"theme\": \"light\", \"split\": 0.3},\n  \"owner\": \"geology\"\n}\n",
    )
    .unwrap();

    let mut workspace = WorkspaceState::new(dir.path());
    assert!(workspace.load().unwrap());
    assert_eq!(
        workspace.session.text_view("Notes"),
        Some("see http://example.org")
    );

    workspace
        .session
        .open_views
        .push(ViewDescriptor::text("Summary", "clean sand 1000-1002"));
    workspace.save().unwrap();

    let mut reloaded = WorkspaceState::new(dir.path());
    assert!(reloaded.load().unwrap());
    assert_eq!(reloaded.session.open_views.len(), 2);
    assert_eq!(reloaded.session.layout.theme.as_deref(), Some("light"));
    assert!(reloaded.session.extra.contains_key("owner"));
    assert!(!dir.path().join("workspace.json.tmp").exists());
}

/// A broken file leaves an existing collection untouched
#[test]
fn test_failed_load_keeps_collection() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_las(&dir, "taro3.las", LAS);
    let bad = write_las(&dir, "broken.las", "~VERSION\n VERS. 2.0 :\n~WELL\n WELL. X :\n");

    let mut wells = WellCollection::new();
    wells.load_well(&good).unwrap();

    let err = wells.load_well(&bad).unwrap_err();
    assert!(matches!(err, LoadError::MissingSection(_)));
    assert_eq!(wells.len(), 1);
    assert_eq!(wells.names(), vec!["TARO-3"]);
}
