use eframe::egui;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::petro::{DerivedCurve, PorosityParams, ShaleVolumeParams};
use crate::section::{DepthReadout, RenderContext, SectionView};
use crate::state::{Theme, ToastType, AUTOSAVE_INTERVAL, BUTTON_ZOOM_IN, BUTTON_ZOOM_OUT};
use crate::template::{templates_dir, TrackTemplate};
use crate::units::UnitPreferences;
use crate::well::{Well, WellCollection};
use crate::workspace::{AutosaveTimer, ViewDescriptor, ViewKind, WorkspaceState};

/// Key for preferences in eframe storage
const PREFERENCES_KEY: &str = "geoflow_preferences";

/// Title of the free-text notes view kept in the session
pub const NOTES_TITLE: &str = "Notes";

/// Title of the section view kept in the session
pub const SECTION_TITLE: &str = "Well Section";

/// Display preferences persisted by eframe between runs
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub units: UnitPreferences,
}

/// What to open at start
#[derive(Clone, Debug, Default)]
pub struct StartupOptions {
    /// Project directory holding the session file and templates
    pub project: PathBuf,
    /// Well files to load before the first frame
    pub files: Vec<PathBuf>,
}

/// Main application state
pub struct GeoflowApp {
    /// All wells loaded this session
    pub(crate) wells: WellCollection,
    /// Well shown in the section view
    pub(crate) selected_well: Option<String>,
    pub(crate) section: SectionView,
    pub(crate) workspace: WorkspaceState,
    pub(crate) preferences: Preferences,
    /// Toast messages for user feedback
    pub(crate) toast_message: Option<(String, Instant, ToastType)>,
    /// Depth range editor contents, in display units
    pub(crate) depth_min_text: String,
    pub(crate) depth_max_text: String,
    /// Section generation the range editor last showed
    pub(crate) depth_text_generation: Option<u64>,
    /// Curve values under the cursor
    pub(crate) readout: Option<DepthReadout>,
    pub(crate) shale_params: ShaleVolumeParams,
    pub(crate) porosity_params: PorosityParams,
    /// Free-text notes, saved as a text view
    pub(crate) notes: String,
    pub(crate) show_notes: bool,
    /// Template name being entered in the save dialog
    pub(crate) template_name: String,
    pub(crate) show_template_dialog: bool,
    pub(crate) last_drop_time: Option<Instant>,
    autosave: AutosaveTimer,
}

impl GeoflowApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: &StartupOptions) -> Self {
        let preferences = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, PREFERENCES_KEY))
            .unwrap_or_default();
        Self::build(options, preferences)
    }

    /// Build the full application state without a window: restore the
    /// session, then load the requested wells.
    pub fn build(options: &StartupOptions, preferences: Preferences) -> Self {
        let mut workspace = WorkspaceState::new(&options.project);
        let restored = workspace.load_or_default();

        let mut app = Self {
            wells: WellCollection::new(),
            selected_well: None,
            section: SectionView::new(),
            preferences,
            toast_message: None,
            depth_min_text: String::new(),
            depth_max_text: String::new(),
            depth_text_generation: None,
            readout: None,
            shale_params: ShaleVolumeParams::default(),
            porosity_params: PorosityParams::default(),
            notes: String::new(),
            show_notes: false,
            template_name: String::new(),
            show_template_dialog: false,
            last_drop_time: None,
            autosave: AutosaveTimer::new(AUTOSAVE_INTERVAL, Instant::now()),
            workspace,
        };

        if restored {
            let session = &app.workspace.session;
            if let Some(theme) = session.theme() {
                app.preferences.theme = theme;
            }
            if let Some(notes) = session.text_view(NOTES_TITLE) {
                app.notes = notes.to_string();
                app.show_notes = true;
            }
        }

        let mut files = options.files.clone();
        if files.is_empty() {
            if let Some(last) = app.workspace.session.last_opened.as_deref() {
                let path = app.project_path().join(last);
                if path.is_file() {
                    files.push(path);
                }
            }
        }
        for path in files {
            app.load_well_file(path);
        }

        app
    }

    /// One-line description of the loaded state
    pub fn summary(&self) -> String {
        let curves: usize = self.wells.iter().map(|w| w.curves().len()).sum();
        format!(
            "{} well(s), {} curve(s), section {:?} on {}",
            self.wells.len(),
            curves,
            self.section.state(),
            self.selected_well.as_deref().unwrap_or("no well")
        )
    }

    pub fn wells(&self) -> &WellCollection {
        &self.wells
    }

    pub fn section(&self) -> &SectionView {
        &self.section
    }

    pub(crate) fn selected(&self) -> Option<&Well> {
        self.selected_well
            .as_deref()
            .and_then(|name| self.wells.get(name))
    }

    pub(crate) fn render_context(&self) -> RenderContext {
        RenderContext {
            theme: self.preferences.theme,
            units: self.preferences.units.clone(),
        }
    }

    pub(crate) fn project_path(&self) -> &Path {
        self.workspace.project_path()
    }

    /// Load a well file and show it. Failures leave everything as it was.
    pub fn load_well_file(&mut self, path: PathBuf) {
        match self.wells.load_well(&path) {
            Ok(name) => {
                self.select_well(&name);
                self.show_toast_success(&format!("Loaded well {}", name));
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                self.show_toast_error(&format!("Failed to load file: {}", e));
            }
        }
    }

    /// Show a well in the section view
    pub fn select_well(&mut self, name: &str) {
        let Some(well) = self.wells.get(name) else {
            return;
        };
        self.section.bind(well);
        self.selected_well = Some(name.to_string());
        self.readout = None;
    }

    /// Show no well
    pub fn clear_selection(&mut self) {
        self.section.unbind();
        self.selected_well = None;
        self.readout = None;
    }

    /// Compute a derived curve for the selected well and store it
    pub fn derive_curve(&mut self, kind: DerivedCurve) {
        let Some(name) = self.selected_well.clone() else {
            self.show_toast("No well loaded");
            return;
        };
        let Some(well) = self.wells.get_mut(&name) else {
            return;
        };

        let result = match kind {
            DerivedCurve::ShaleVolume => well.shale_volume(&self.shale_params),
            DerivedCurve::Porosity => well.porosity(&self.porosity_params),
        };
        match result {
            Ok(samples) => {
                well.store_derived(kind, samples);
                self.section.sync_curves(well);
                self.show_toast_success(&format!("{} calculated", kind.description()));
            }
            Err(e) => {
                tracing::warn!("{} not available for {}: {}", kind.mnemonic(), name, e);
                self.show_toast_error(&format!("{}: {}", kind.description(), e));
            }
        }
    }

    /// Apply the depth range typed into the toolbar (display units)
    pub(crate) fn apply_depth_text(&mut self) {
        let parsed = (
            self.depth_min_text.trim().parse::<f64>(),
            self.depth_max_text.trim().parse::<f64>(),
        );
        let (Ok(min), Ok(max)) = parsed else {
            self.show_toast_error("Depth range must be numeric");
            return;
        };

        let factor = self
            .selected()
            .map(|well| self.render_context().depth_scale(well.depth_unit()).0)
            .unwrap_or(1.0);
        if let Err(e) = self.section.zoom(min / factor, max / factor) {
            self.show_toast_error(&e.to_string());
            // Show the range that is still in effect
            self.depth_text_generation = None;
        }
    }

    /// Refresh the range editor after the view changed
    pub(crate) fn sync_depth_text(&mut self) {
        let generation = self.section.generation();
        if self.depth_text_generation == Some(generation) {
            return;
        }
        let factor = self
            .selected()
            .map(|well| self.render_context().depth_scale(well.depth_unit()).0)
            .unwrap_or(1.0);
        let range = self.section.range();
        self.depth_min_text = format!("{:.1}", range.min() * factor);
        self.depth_max_text = format!("{:.1}", range.max() * factor);
        self.depth_text_generation = Some(generation);
    }

    pub(crate) fn fit_to_data(&mut self) {
        if let Err(e) = self.section.fit() {
            self.show_toast(&e.to_string());
        }
    }

    pub(crate) fn zoom_in(&mut self) {
        if let Err(e) = self.section.scale(BUTTON_ZOOM_IN) {
            self.show_toast_error(&e.to_string());
        }
    }

    pub(crate) fn zoom_out(&mut self) {
        if let Err(e) = self.section.scale(BUTTON_ZOOM_OUT) {
            self.show_toast_error(&e.to_string());
        }
    }

    /// Save the current track layout under `name` in the project templates
    pub fn save_template(&mut self, name: &str) {
        let dir = templates_dir(self.project_path());
        match self.section.to_template(name).save(&dir) {
            Ok(_) => self.show_toast_success(&format!("Template '{}' saved", name.trim())),
            Err(e) => self.show_toast_error(&format!("Failed to save template: {}", e)),
        }
    }

    /// Replace the track layout with a saved template
    pub fn load_template(&mut self, path: &Path) {
        match TrackTemplate::load(path) {
            Ok(template) => {
                self.section.apply_template(&template);
                if let Some(name) = self.selected_well.clone() {
                    self.select_well(&name);
                }
                self.show_toast_success(&format!("Template '{}' loaded", template.name));
            }
            Err(e) => self.show_toast_error(&format!("Failed to load template: {}", e)),
        }
    }

    /// Copy the open views, theme and current file into the session document.
    /// Views this app does not draw (other text tabs, 3D and map views) are
    /// kept as restored.
    pub fn capture_session(&mut self) {
        let mut managed = Vec::new();
        if self.show_notes || !self.notes.is_empty() {
            managed.push(ViewDescriptor::text(NOTES_TITLE, &self.notes));
        }
        managed.push(ViewDescriptor::view(SECTION_TITLE, ViewKind::WellSection));

        let last_opened = self
            .selected()
            .and_then(|well| well.source.as_deref())
            .map(|path| session_path(self.project_path(), path));

        let session = &mut self.workspace.session;
        let restored = std::mem::take(&mut session.open_views);
        session.open_views = merge_views(restored, managed);
        session.last_opened = last_opened;
        session.set_theme(self.preferences.theme);
    }

    /// Capture and write the session file. Failures are reported, never fatal.
    pub fn save_session(&mut self) -> bool {
        self.capture_session();
        match self.workspace.save() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Autosave failed: {}", e);
                self.show_toast_error("Autosave failed");
                false
            }
        }
    }

    /// Save the session when the autosave interval has elapsed
    fn autosave_tick(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        if self.autosave.due(now) {
            let _ = self.save_session();
        }
        ctx.request_repaint_after(self.autosave.remaining(now));
    }

    /// Show an info toast message
    pub(crate) fn show_toast(&mut self, message: &str) {
        self.toast_message = Some((message.to_string(), Instant::now(), ToastType::Info));
    }

    pub(crate) fn show_toast_success(&mut self, message: &str) {
        self.toast_message = Some((message.to_string(), Instant::now(), ToastType::Success));
    }

    pub(crate) fn show_toast_error(&mut self, message: &str) {
        self.toast_message = Some((message.to_string(), Instant::now(), ToastType::Error));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        // Debounce repeated drop events
        if let Some(last_drop) = self.last_drop_time {
            if last_drop.elapsed().as_secs() < 1 {
                return;
            }
        }

        let dropped_files: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });

        if !dropped_files.is_empty() {
            self.last_drop_time = Some(Instant::now());
            for path in dropped_files {
                self.load_well_file(path);
            }
        }
    }

    fn apply_theme(&self, ctx: &egui::Context) {
        let visuals = match self.preferences.theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
            Theme::HighContrast => {
                let mut visuals = egui::Visuals::dark();
                visuals.override_text_color = Some(egui::Color32::WHITE);
                visuals.panel_fill = egui::Color32::BLACK;
                visuals.window_fill = egui::Color32::BLACK;
                visuals.extreme_bg_color = egui::Color32::BLACK;
                visuals
            }
        };
        ctx.set_visuals(visuals);
    }
}

/// Views the app writes itself on every save
fn is_managed(view: &ViewDescriptor) -> bool {
    match view {
        ViewDescriptor::Text { title, .. } => title == NOTES_TITLE,
        ViewDescriptor::View {
            title, view_type, ..
        } => title == SECTION_TITLE && *view_type == ViewKind::WellSection,
    }
}

/// Replace managed entries of `restored` in place with their current state,
/// drop managed entries that are no longer open and append new ones
fn merge_views(restored: Vec<ViewDescriptor>, managed: Vec<ViewDescriptor>) -> Vec<ViewDescriptor> {
    let mut pending: Vec<Option<ViewDescriptor>> = managed.into_iter().map(Some).collect();
    let mut views: Vec<ViewDescriptor> = restored
        .into_iter()
        .filter_map(|view| {
            if !is_managed(&view) {
                return Some(view);
            }
            pending
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|m| m.title() == view.title()))
                .and_then(Option::take)
        })
        .collect();
    views.extend(pending.into_iter().flatten());
    views
}

/// Path of a well file as stored in the session: relative to the project
/// when the file lives inside it, absolute otherwise
fn session_path(project: &Path, file: &Path) -> String {
    let file = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
    let project = project
        .canonicalize()
        .unwrap_or_else(|_| project.to_path_buf());
    file.strip_prefix(&project)
        .unwrap_or(&file)
        .display()
        .to_string()
}

impl eframe::App for GeoflowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.apply_theme(ctx);
        self.autosave_tick(ctx);
        self.sync_depth_text();

        // Toast notifications
        self.render_toast(ctx);

        egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
            self.render_menu_bar(ui);
        });

        egui::TopBottomPanel::top("toolbar_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_toolbar(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status_bar(ui);
            });

        egui::SidePanel::left("wells_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.render_sidebar(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_section(ui);
        });

        self.render_notes_window(ctx);
        self.render_template_dialog(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, PREFERENCES_KEY, &self.preferences);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let _ = self.save_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::ViewState;
    use crate::state::WORKSPACE_FILE;

    const LAS: &str = "~V\n VERS. 2.0 :\n~W\n WELL. KORA-1 : WELL\n~C\n DEPT.FT :\n GR.GAPI :\n RHOB.G/C3 :\n~A\n100 30 2.65\n101 90 1.825\n102 150 1.0\n";

    fn project_with_well() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kora.las");
        std::fs::write(&path, LAS).unwrap();
        (dir, path)
    }

    #[test]
    fn test_build_loads_files_and_binds() {
        let (dir, path) = project_with_well();
        let options = StartupOptions {
            project: dir.path().to_path_buf(),
            files: vec![path],
        };
        let app = GeoflowApp::build(&options, Preferences::default());
        assert_eq!(app.wells().names(), vec!["KORA-1"]);
        assert_eq!(app.section().state(), ViewState::Bound);
        assert!(app.summary().starts_with("1 well(s), 3 curve(s)"));
        // Building never writes the session
        assert!(!dir.path().join(WORKSPACE_FILE).exists());
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = GeoflowApp::build(
            &StartupOptions {
                project: dir.path().to_path_buf(),
                files: Vec::new(),
            },
            Preferences::default(),
        );
        app.load_well_file(dir.path().join("nope.las"));
        assert!(app.wells().is_empty());
        assert_eq!(app.section().state(), ViewState::Unbound);
        assert!(matches!(
            app.toast_message,
            Some((_, _, ToastType::Error))
        ));
    }

    #[test]
    fn test_derive_and_session_round_trip() {
        let (dir, path) = project_with_well();
        let options = StartupOptions {
            project: dir.path().to_path_buf(),
            files: vec![path.clone()],
        };
        let mut app = GeoflowApp::build(&options, Preferences::default());
        app.derive_curve(DerivedCurve::ShaleVolume);
        app.derive_curve(DerivedCurve::Porosity);
        let well = app.wells().get("KORA-1").unwrap();
        assert_eq!(well.curve_data("VSH"), Some(&[0.0, 0.5, 1.0][..]));
        assert!(app.section().tracks()[1].has_curve("VSH"));

        app.preferences.theme = Theme::Light;
        app.notes = "check GR spike".to_string();
        assert!(app.save_session());

        // A fresh start with no files reopens the last well and the notes
        let restored = GeoflowApp::build(
            &StartupOptions {
                project: dir.path().to_path_buf(),
                files: Vec::new(),
            },
            Preferences::default(),
        );
        assert_eq!(restored.preferences.theme, Theme::Light);
        assert_eq!(restored.notes, "check GR spike");
        assert_eq!(restored.selected_well.as_deref(), Some("KORA-1"));
    }

    #[test]
    fn test_save_keeps_views_the_app_does_not_draw() {
        let (dir, path) = project_with_well();
        std::fs::write(
            dir.path().join(WORKSPACE_FILE),
            r#"{
  "open_views": [
    {"type": "text", "title": "script.py", "content": "print('hi')"},
    {"type": "view", "title": "3D View", "view_type": "3D", "content": null},
    {"type": "view", "title": "Well Section", "view_type": "Well Section", "content": null},
    {"type": "view", "title": "Map View", "view_type": "Map", "content": null}
  ]
}"#,
        )
        .unwrap();

        let mut app = GeoflowApp::build(
            &StartupOptions {
                project: dir.path().to_path_buf(),
                files: vec![path],
            },
            Preferences::default(),
        );
        app.notes = "tight streak at 101".to_string();
        assert!(app.save_session());

        let mut reloaded = WorkspaceState::new(dir.path());
        assert!(reloaded.load().unwrap());
        let titles: Vec<&str> = reloaded
            .session
            .open_views
            .iter()
            .map(ViewDescriptor::title)
            .collect();
        assert_eq!(
            titles,
            vec!["script.py", "3D View", SECTION_TITLE, "Map View", NOTES_TITLE]
        );
        assert_eq!(reloaded.session.text_view("script.py"), Some("print('hi')"));
        assert_eq!(
            reloaded.session.open_views[3],
            ViewDescriptor::view("Map View", ViewKind::Map)
        );
    }

    #[test]
    fn test_closed_notes_are_dropped_from_session() {
        let restored = vec![
            ViewDescriptor::text(NOTES_TITLE, ""),
            ViewDescriptor::text("log.txt", "x"),
        ];
        let managed = vec![ViewDescriptor::view(SECTION_TITLE, ViewKind::WellSection)];
        let views = merge_views(restored, managed);
        assert_eq!(
            views,
            vec![
                ViewDescriptor::text("log.txt", "x"),
                ViewDescriptor::view(SECTION_TITLE, ViewKind::WellSection),
            ]
        );
    }

    #[test]
    fn test_last_opened_is_relative_to_project() {
        let (dir, path) = project_with_well();
        let mut app = GeoflowApp::build(
            &StartupOptions {
                project: dir.path().to_path_buf(),
                files: vec![path],
            },
            Preferences::default(),
        );
        app.capture_session();
        assert_eq!(app.workspace.session.last_opened.as_deref(), Some("kora.las"));

        // Reopened through the project, whatever the working directory
        assert!(app.save_session());
        let restored = GeoflowApp::build(
            &StartupOptions {
                project: dir.path().to_path_buf(),
                files: Vec::new(),
            },
            Preferences::default(),
        );
        assert_eq!(restored.selected_well.as_deref(), Some("KORA-1"));
    }

    #[test]
    fn test_depth_text_round_trip() {
        let (dir, path) = project_with_well();
        let mut app = GeoflowApp::build(
            &StartupOptions {
                project: dir.path().to_path_buf(),
                files: vec![path],
            },
            Preferences::default(),
        );
        app.sync_depth_text();
        assert_eq!(app.depth_min_text, "100.0");
        assert_eq!(app.depth_max_text, "102.0");

        app.depth_min_text = "101.5".into();
        app.depth_max_text = "100.5".into();
        app.apply_depth_text();
        assert_eq!(app.section().range().min(), 100.0);
        assert!(matches!(app.toast_message, Some((_, _, ToastType::Error))));

        app.depth_min_text = "100.5".into();
        app.depth_max_text = "101.5".into();
        app.apply_depth_text();
        assert_eq!(app.section().state(), ViewState::Zoomed);
        assert_eq!(app.section().range().min(), 100.5);
    }

    #[test]
    fn test_template_save_and_load() {
        let (dir, path) = project_with_well();
        let mut app = GeoflowApp::build(
            &StartupOptions {
                project: dir.path().to_path_buf(),
                files: vec![path],
            },
            Preferences::default(),
        );
        app.section.resize_track(2, 0.5).unwrap();
        app.save_template("Wide Resistivity");

        let file = templates_dir(dir.path()).join("Wide_Resistivity.json");
        assert!(file.exists());

        app.section.resize_track(2, -0.5).unwrap();
        app.load_template(&file);
        assert_eq!(app.section().tracks()[2].width, 1.5);
        assert_eq!(app.section().state(), ViewState::Bound);
    }
}
