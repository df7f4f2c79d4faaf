//! Named track layouts saved as JSON.
//!
//! A template records track names, widths, colors and curve assignments, and
//! is independent of any well. Files live in `<project>/templates/`, named
//! after the template with spaces replaced by underscores.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::TEMPLATES_DIR;
use crate::tracks::Track;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template name is empty")]
    EmptyName,

    #[error("template has no tracks")]
    NoTracks,

    #[error("track '{name}' has invalid width {width}")]
    InvalidWidth { name: String, width: f64 },

    #[error("failed to access template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A saved track layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackTemplate {
    pub name: String,
    pub tracks: Vec<Track>,
}

/// Templates directory of a project
pub fn templates_dir(project: &Path) -> PathBuf {
    project.join(TEMPLATES_DIR)
}

impl TrackTemplate {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            name: name.into(),
            tracks,
        }
    }

    /// File name a template is stored under: `Shallow Logs` → `Shallow_Logs.json`.
    /// Path separators and characters Windows rejects also become `_`, so the
    /// file always lands directly in the templates directory.
    pub fn file_name(name: &str) -> String {
        let stem: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_whitespace() || c.is_control() => '_',
                c => c,
            })
            .collect();
        format!("{}.json", stem)
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.name.trim().is_empty() {
            return Err(TemplateError::EmptyName);
        }
        if self.tracks.is_empty() {
            return Err(TemplateError::NoTracks);
        }
        if let Some(track) = self
            .tracks
            .iter()
            .find(|t| !t.width.is_finite() || t.width <= 0.0)
        {
            return Err(TemplateError::InvalidWidth {
                name: track.name.clone(),
                width: track.width,
            });
        }
        Ok(())
    }

    /// Write the template into `dir` (created if missing). Returns the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, TemplateError> {
        self.validate()?;
        let path = dir.join(Self::file_name(&self.name));
        let io_err = |source: std::io::Error| TemplateError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut template = self.clone();
        template.name = self.name.trim().to_string();
        let json = serde_json::to_string_pretty(&template).map_err(|source| {
            TemplateError::Format {
                path: path.display().to_string(),
                source,
            }
        })?;

        std::fs::create_dir_all(dir).map_err(io_err)?;
        std::fs::write(&path, json).map_err(io_err)?;
        tracing::info!("Saved template '{}' to {}", template.name, path.display());
        Ok(path)
    }

    /// Read a template file. Widths below the floor are raised to it.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let data = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut template: TrackTemplate =
            serde_json::from_str(&data).map_err(|source| TemplateError::Format {
                path: path.display().to_string(),
                source,
            })?;
        template.validate()?;

        for track in &mut template.tracks {
            let width = track.width;
            track.set_width(width);
        }
        tracing::info!(
            "Loaded template '{}' ({} tracks)",
            template.name,
            template.tracks.len()
        );
        Ok(template)
    }

    /// Template files in `dir`, sorted by path. A missing directory holds none.
    pub fn list(dir: &Path) -> Result<Vec<PathBuf>, TemplateError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(dir).map_err(|source| TemplateError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}
