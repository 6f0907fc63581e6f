//! Persisted extension-list configuration.
//!
//! A small key-value store, TOML on disk, that remembers which extensions
//! are active plus arbitrary string settings. The checker engine never
//! reads or writes this store: callers resolve an extension list here and
//! hand the engine plain strings, keeping the engine free of hidden global
//! state.

use crate::error::ScoutError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions used until the user configures their own list.
pub const DEFAULT_EXTENSIONS: &[&str] = &["com", "net", "org", "io", "co", "app", "dev", "ai"];

/// On-disk layout of the store file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    /// Active extensions, without leading dots
    #[serde(default)]
    extensions: Vec<String>,

    /// Free-form string settings
    #[serde(default)]
    settings: BTreeMap<String, String>,
}

/// Persisted store of active extensions and string settings.
///
/// Mutating operations persist immediately; there is no separate save step
/// to forget.
#[derive(Debug)]
pub struct ExtensionStore {
    path: PathBuf,
    data: StoreFile,
}

impl ExtensionStore {
    /// Open the store at an explicit path, starting empty when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] when the file exists but cannot be
    /// read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScoutError> {
        let path = path.into();
        let data = if path.exists() {
            let text = fs::read_to_string(&path)
                .map_err(|e| ScoutError::config(format!("cannot read {}: {}", path.display(), e)))?;
            toml::from_str(&text)?
        } else {
            StoreFile::default()
        };
        Ok(Self { path, data })
    }

    /// Open the store at its default location.
    ///
    /// `NAMESCOUT_CONFIG` overrides the path; otherwise
    /// `$XDG_CONFIG_HOME/namescout/config.toml`, falling back to
    /// `$HOME/.config/namescout/config.toml`.
    pub fn open_default() -> Result<Self, ScoutError> {
        Self::open(default_path()?)
    }

    /// Path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a setting, falling back to `default` when unset.
    pub fn get(&self, key: &str, default: &str) -> String {
        self.data
            .settings
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Set a setting and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ScoutError> {
        self.data.settings.insert(key.to_string(), value.to_string());
        self.save()
    }

    /// All settings currently stored.
    pub fn get_all(&self) -> &BTreeMap<String, String> {
        &self.data.settings
    }

    /// Active extensions: the stored list, or the built-in defaults when
    /// nothing has been configured.
    pub fn active_extensions(&self) -> Vec<String> {
        if self.data.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            self.data.extensions.clone()
        }
    }

    /// Add an extension (leading dot and case are normalized away).
    /// Returns false when it was already present.
    pub fn add_extension(&mut self, extension: &str) -> Result<bool, ScoutError> {
        let cleaned = normalize_extension(extension)?;
        if self.data.extensions.is_empty() {
            // First customisation starts from the defaults, not from nothing.
            self.data.extensions = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        }
        if self.data.extensions.contains(&cleaned) {
            return Ok(false);
        }
        self.data.extensions.push(cleaned);
        self.save()?;
        Ok(true)
    }

    /// Remove an extension. Returns false when it was not present.
    pub fn remove_extension(&mut self, extension: &str) -> Result<bool, ScoutError> {
        let cleaned = normalize_extension(extension)?;
        if self.data.extensions.is_empty() {
            self.data.extensions = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        }
        let before = self.data.extensions.len();
        self.data.extensions.retain(|e| e != &cleaned);
        let removed = self.data.extensions.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Drop all customisation: extensions revert to the defaults and
    /// settings are cleared.
    pub fn reset(&mut self) -> Result<(), ScoutError> {
        self.data = StoreFile::default();
        self.save()
    }

    fn save(&self) -> Result<(), ScoutError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ScoutError::config(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let text = toml::to_string_pretty(&self.data)?;
        fs::write(&self.path, text)
            .map_err(|e| ScoutError::config(format!("cannot write {}: {}", self.path.display(), e)))
    }
}

/// Strip a leading dot, lower-case, and validate an extension token.
fn normalize_extension(extension: &str) -> Result<String, ScoutError> {
    let cleaned = extension.trim().trim_start_matches('.').to_lowercase();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ScoutError::config(format!(
            "'{}' is not a valid extension",
            extension
        )));
    }
    Ok(cleaned)
}

fn default_path() -> Result<PathBuf, ScoutError> {
    if let Ok(explicit) = std::env::var("NAMESCOUT_CONFIG") {
        return Ok(PathBuf::from(explicit));
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("namescout").join("config.toml"));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home)
            .join(".config")
            .join("namescout")
            .join("config.toml"));
    }
    Err(ScoutError::config(
        "no config location: set NAMESCOUT_CONFIG, XDG_CONFIG_HOME, or HOME",
    ))
}
