//! Layout file I/O service.
//!
//! This module centralizes all layout file operations, providing a consistent
//! interface for loading, saving, and listing layout files.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Layout, LayoutMetadata};

/// On-disk layout formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFormat {
    /// `.json`
    Json,
    /// `.json5`, read leniently and written as plain JSON
    Json5,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl LayoutFormat {
    /// Extensions recognized as layout files.
    pub const EXTENSIONS: &'static [&'static str] = &["json", "json5", "yaml", "yml", "toml"];

    /// Format for a path, or `None` for an unknown extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "json5" => Some(Self::Json5),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> Result<Layout> {
        let layout = match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Json5 => json5::from_str(content)?,
            Self::Yaml => serde_yml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(layout)
    }

    fn render(self, layout: &Layout) -> Result<String> {
        let content = match self {
            Self::Json | Self::Json5 => serde_json::to_string_pretty(layout)?,
            Self::Yaml => serde_yml::to_string(layout)?,
            Self::Toml => toml::to_string_pretty(layout)?,
        };
        Ok(content)
    }
}

/// Summary of a layout file for pickers and listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutInfo {
    /// File path
    pub path: PathBuf,
    /// Layout name from the metadata
    pub name: String,
    /// Number of keys
    pub key_count: usize,
    /// Last modification time from the metadata
    pub modified: DateTime<Utc>,
}

/// Service for managing layout file I/O operations.
pub struct LayoutService;

impl LayoutService {
    /// Loads a layout.
    ///
    /// Files with an unknown extension are read as JSON.
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use keyviz::services::LayoutService;
    ///
    /// let layout = LayoutService::load(Path::new("my_layout.json"))?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(path: &Path) -> Result<Layout> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file {}", path.display()))?;

        let format = LayoutFormat::from_path(path).unwrap_or_else(|| {
            tracing::warn!(path = %path.display(), "unknown layout extension, reading as JSON");
            LayoutFormat::Json
        });

        let mut layout = format
            .parse(&content)
            .with_context(|| format!("Failed to load layout from {}", path.display()))?;
        stamp_from_file(&mut layout, path);

        tracing::debug!(path = %path.display(), keys = layout.keys.len(), "layout loaded");
        Ok(layout)
    }

    /// Saves a layout.
    ///
    /// Layouts with duplicate ids or scan codes are refused. This performs an
    /// atomic write using a temp file + rename pattern to ensure the file is
    /// never left in a corrupted state.
    pub fn save(layout: &Layout, path: &Path) -> Result<()> {
        layout.validate(1).into_result()?;

        let format = LayoutFormat::from_path(path).unwrap_or(LayoutFormat::Json);
        let content = format
            .render(layout)
            .with_context(|| format!("Failed to serialize layout for {}", path.display()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp file {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to save layout to {}", path.display()))?;

        tracing::info!(path = %path.display(), keys = layout.keys.len(), "layout saved");
        Ok(())
    }

    /// Lists layout files in `dir`, most recently modified first.
    ///
    /// A missing directory yields an empty list; unreadable files are
    /// skipped.
    pub fn list_layouts(dir: &Path) -> Result<Vec<LayoutInfo>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read layouts directory {}", dir.display()))?;

        let mut layouts = Vec::new();
        for entry in entries {
            let path = entry.context("Failed to read directory entry")?.path();
            if !path.is_file() || LayoutFormat::from_path(&path).is_none() {
                continue;
            }
            match Self::load(&path) {
                Ok(layout) => layouts.push(LayoutInfo {
                    name: layout.metadata.name.clone(),
                    key_count: layout.keys.len(),
                    modified: layout.metadata.modified,
                    path,
                }),
                Err(err) => tracing::warn!("skipping layout: {err:#}"),
            }
        }

        layouts.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.path.cmp(&b.path)));
        Ok(layouts)
    }

    /// Path a layout named `name` gets in `dir`.
    #[must_use]
    pub fn default_layout_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.json", sanitize_filename(name)))
    }
}

/// Fills timestamps the file lacks with its modification time.
fn stamp_from_file(layout: &mut Layout, path: &Path) {
    if layout.metadata.is_stamped() {
        return;
    }
    let blank = LayoutMetadata::unstamped();
    let mtime = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => DateTime::<Utc>::from(mtime),
        Err(err) => {
            tracing::debug!(path = %path.display(), "no file time: {err}");
            return;
        }
    };
    if layout.metadata.modified == blank.modified {
        layout.metadata.modified = mtime;
    }
    if layout.metadata.created == blank.created {
        layout.metadata.created = mtime;
    }
}

/// Checks a layout path given on the command line.
///
/// The file must exist, be a regular file and be readable. Returns warnings
/// for suspicious but usable paths.
pub fn validate_layout_path(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        anyhow::bail!("Layout file not found: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Layout path is not a file: {}", path.display());
    }
    fs::File::open(path)
        .with_context(|| format!("Layout file is not readable: {}", path.display()))?;

    let mut warnings = Vec::new();
    if LayoutFormat::from_path(path).is_none() {
        warnings.push(format!(
            "{} may not be a supported layout file format (expected one of: {})",
            path.display(),
            LayoutFormat::EXTENSIONS.join(", ")
        ));
    }
    Ok(warnings)
}

/// Sanitizes a layout name for use as a filename.
///
/// Replaces problematic characters with underscores and converts to lowercase.
///
/// ```
/// # use keyviz::services::layouts::sanitize_filename;
/// assert_eq!(sanitize_filename("My Layout"), "my_layout");
/// assert_eq!(sanitize_filename("Layout/Name:Test"), "layout_name_test");
/// assert_eq!(sanitize_filename("  "), "untitled");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "untitled".to_string();
    }
    trimmed
        .replace(['/', '\\', ':', ' ', '*', '?', '"', '<', '>', '|'], "_")
        .to_lowercase()
}
