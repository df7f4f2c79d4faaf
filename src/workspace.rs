//! Session persistence: which views are open, layout settings, last file.
//!
//! The session lives in `<project>/workspace.json`. Reads tolerate `//` and
//! `/* */` comments; a top-level `_comment` string is written back as `//`
//! header lines. Saves go through a temporary file that is renamed over the
//! target, so a reader never sees a half-written session.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::state::{Theme, MAX_TEXT_VIEW_CHARS, WORKSPACE_FILE};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid session file {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Kind of a non-text view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    #[serde(rename = "3D")]
    ThreeD,
    Map,
    #[serde(rename = "Well Section")]
    WellSection,
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl ViewKind {
    pub fn label(&self) -> &'static str {
        match self {
            ViewKind::ThreeD => "3D",
            ViewKind::Map => "Map",
            ViewKind::WellSection => "Well Section",
            ViewKind::Unknown => "unknown",
        }
    }
}

/// One entry of `open_views`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewDescriptor {
    Text {
        title: String,
        #[serde(default)]
        content: String,
    },
    View {
        title: String,
        view_type: ViewKind,
        /// Always null; views keep no content in the session
        #[serde(default)]
        content: Option<String>,
    },
}

impl ViewDescriptor {
    /// Text view; content beyond the capture limit is dropped
    pub fn text(title: impl Into<String>, content: &str) -> Self {
        ViewDescriptor::Text {
            title: title.into(),
            content: content.chars().take(MAX_TEXT_VIEW_CHARS).collect(),
        }
    }

    pub fn view(title: impl Into<String>, kind: ViewKind) -> Self {
        ViewDescriptor::View {
            title: title.into(),
            view_type: kind,
            content: None,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ViewDescriptor::Text { title, .. } | ViewDescriptor::View { title, .. } => title,
        }
    }
}

/// Free-form display settings. Keys other than `theme` are kept as found.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Contents of the session file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub open_views: Vec<ViewDescriptor>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub last_opened: Option<String>,
    /// Unknown top-level keys, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    pub fn theme(&self) -> Option<Theme> {
        self.layout.theme.as_deref().map(Theme::from_name)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.layout.theme = Some(theme.name().to_string());
    }

    /// First text view with the given title
    pub fn text_view(&self, title: &str) -> Option<&str> {
        self.open_views.iter().find_map(|view| match view {
            ViewDescriptor::Text { title: t, content } if t == title => Some(content.as_str()),
            _ => None,
        })
    }
}

/// The session file of one project directory
#[derive(Clone, Debug)]
pub struct WorkspaceState {
    project_path: PathBuf,
    path: PathBuf,
    pub session: Session,
}

impl WorkspaceState {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        let path = project_path.join(WORKSPACE_FILE);
        Self {
            project_path,
            path,
            session: Session::default(),
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    /// Read the session file. `Ok(false)` when there is none yet.
    pub fn load(&mut self) -> Result<bool, WorkspaceError> {
        if !self.path.exists() {
            return Ok(false);
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|source| WorkspaceError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        self.session = serde_json::from_str(&strip_json_comments(&raw)).map_err(|source| {
            WorkspaceError::Format {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        tracing::info!(
            "Restored session from {} ({} views)",
            self.path.display(),
            self.session.open_views.len()
        );
        Ok(true)
    }

    /// Read the session, falling back to an empty one on any failure
    pub fn load_or_default(&mut self) -> bool {
        match self.load() {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Failed to load workspace state: {}", e);
                self.session = Session::default();
                false
            }
        }
    }

    /// Serialised session text, with `_comment` rendered as `//` lines
    pub fn render(&self) -> Result<String, WorkspaceError> {
        let mut out = String::new();
        if let Some(comment) = self.session.comment.as_deref() {
            if !comment.trim().is_empty() {
                for line in comment.lines() {
                    out.push_str("// ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        let json =
            serde_json::to_string_pretty(&self.session).map_err(|source| WorkspaceError::Format {
                path: self.path.display().to_string(),
                source,
            })?;
        out.push_str(&json);
        out.push('\n');
        Ok(out)
    }

    /// Write the session atomically: temp file first, then rename over the target
    pub fn save(&self) -> Result<(), WorkspaceError> {
        let text = self.render()?;
        let tmp = self.tmp_path();
        let io_err = |source: std::io::Error| WorkspaceError::Io {
            path: self.path.display().to_string(),
            source,
        };

        std::fs::create_dir_all(&self.project_path).map_err(io_err)?;
        std::fs::write(&tmp, text).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }
}

/// Remove `//` line comments and `/* */` block comments from JSON text.
/// Comment markers inside string literals are left alone.
pub fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                // Keep the newline so line numbers in parse errors still match
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Fixed-interval tick polled from the frame loop
#[derive(Clone, Debug)]
pub struct AutosaveTimer {
    interval: Duration,
    last: Instant,
}

impl AutosaveTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True once per elapsed interval; restarts the countdown when it fires
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// Time left before the next tick
    pub fn remaining(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        let mut session = Session {
            open_views: vec![
                ViewDescriptor::text("Notes", "shale break near 1020 ft"),
                ViewDescriptor::view("Well Section", ViewKind::WellSection),
                ViewDescriptor::view("Map", ViewKind::Map),
            ],
            last_opened: Some("wells/a.las".to_string()),
            ..Default::default()
        };
        session.set_theme(Theme::HighContrast);
        session
    }

    #[test]
    fn test_round_trip_with_comment_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = WorkspaceState::new(dir.path());
        ws.session = sample_session();
        ws.session.comment = Some("edited by hand\nkeep me".to_string());
        ws.save().unwrap();

        let text = std::fs::read_to_string(ws.path()).unwrap();
        assert!(text.starts_with("// edited by hand\n// keep me\n{"));
        assert!(!ws.tmp_path().exists());

        let mut reloaded = WorkspaceState::new(dir.path());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.session.open_views, ws.session.open_views);
        assert_eq!(reloaded.session.theme(), Some(Theme::HighContrast));
        assert_eq!(reloaded.session, ws.session);
    }

    #[test]
    fn test_reads_hand_written_comments() {
        let dir = tempfile::tempdir().unwrap();
        let text = r#"// session
{
  /* views
     open at exit */
  "open_views": [
    {"type": "text", "title": "url // not a comment", "content": "a /* b */ c"},
    {"type": "view", "title": "3D", "view_type": "3D", "content": null}
  ],
  "layout": {"theme": "light", "splitter": [200, 600]}, // trailing
  "last_opened": null,
  "window": {"maximized": true}
}
"#;
        std::fs::write(dir.path().join(WORKSPACE_FILE), text).unwrap();

        let mut ws = WorkspaceState::new(dir.path());
        assert!(ws.load().unwrap());
        assert_eq!(
            ws.session.open_views[0],
            ViewDescriptor::Text {
                title: "url // not a comment".into(),
                content: "a /* b */ c".into()
            }
        );
        assert_eq!(ws.session.open_views[1], ViewDescriptor::view("3D", ViewKind::ThreeD));
        assert_eq!(ws.session.theme(), Some(Theme::Light));
        assert_eq!(
            ws.session.layout.extra["splitter"],
            serde_json::json!([200, 600])
        );
        assert_eq!(ws.session.extra["window"]["maximized"], true);

        // Unknown keys survive a save
        ws.save().unwrap();
        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(ws.path()).unwrap()).unwrap();
        assert_eq!(saved["window"]["maximized"], true);
        assert_eq!(saved["layout"]["splitter"][1], 600);
        assert_eq!(saved["open_views"][1]["view_type"], "3D");
        assert_eq!(saved["open_views"][1]["content"], Value::Null);
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = WorkspaceState::new(dir.path());
        assert!(!ws.load().unwrap());

        std::fs::write(ws.path(), "{ \"open_views\": [ ").unwrap();
        assert!(matches!(ws.load(), Err(WorkspaceError::Format { .. })));

        ws.session = sample_session();
        assert!(!ws.load_or_default());
        assert_eq!(ws.session, Session::default());
    }

    #[test]
    fn test_text_view_truncated() {
        let long = "x".repeat(MAX_TEXT_VIEW_CHARS + 50);
        match ViewDescriptor::text("big", &long) {
            ViewDescriptor::Text { content, .. } => assert_eq!(content.len(), MAX_TEXT_VIEW_CHARS),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_view_kind() {
        let view: ViewDescriptor =
            serde_json::from_str(r#"{"type":"view","title":"?","view_type":"Seismic"}"#).unwrap();
        assert_eq!(view, ViewDescriptor::view("?", ViewKind::Unknown));
        assert_eq!(view.title(), "?");
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_json_comments("{\"a\":1} // x"), "{\"a\":1} ");
        assert_eq!(strip_json_comments("[1,/* 2, */3]"), "[1,3]");
        assert_eq!(
            strip_json_comments(r#"{"k":"esc \" // still string"}"#),
            r#"{"k":"esc \" // still string"}"#
        );
        assert_eq!(strip_json_comments("1 /* open"), "1 ");
    }

    #[test]
    fn test_autosave_timer() {
        let start = Instant::now();
        let mut timer = AutosaveTimer::new(Duration::from_millis(5000), start);
        assert!(!timer.due(start + Duration::from_millis(4999)));
        assert_eq!(
            timer.remaining(start + Duration::from_millis(4000)),
            Duration::from_millis(1000)
        );
        assert!(timer.due(start + Duration::from_millis(5000)));
        // Countdown restarted
        assert!(!timer.due(start + Duration::from_millis(6000)));
        assert!(timer.due(start + Duration::from_millis(10_000)));
        // A clock reading earlier than the last tick never fires
        assert!(!timer.due(start));
    }
}
