//! Persisted view preferences.
//!
//! Values are kept as strings in a flat key-value storage, the same shape as
//! browser `localStorage`, so a preferences file can be inspected and edited
//! by hand.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::eol::Eol;

pub const LINE_NUMBERS_KEY: &str = "lineNumbersEnabled";
pub const MINIMAP_KEY: &str = "minimapEnabled";
pub const STICKY_SCROLL_KEY: &str = "stickyScrollEnabled";
// Spelling is part of the stored format
pub const DEFAULT_EOL_KEY: &str = "defualtEndOfLine";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPreferences {
    pub line_numbers_enabled: bool,
    pub minimap_enabled: bool,
    pub sticky_scroll_enabled: bool,
    pub default_eol: Eol,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            line_numbers_enabled: true,
            minimap_enabled: true,
            sticky_scroll_enabled: true,
            default_eol: Eol::Lf,
        }
    }
}

impl ViewPreferences {
    /// Stored keys and their string values.
    pub fn entries(&self) -> [(&'static str, String); 4] {
        encode(self)
    }

    pub fn display_flags(&self) -> DisplayFlags {
        DisplayFlags {
            read_only: false,
            line_numbers: self.line_numbers_enabled,
            minimap: self.minimap_enabled,
            sticky_scroll: self.sticky_scroll_enabled,
        }
    }
}

/// Display options handed to the editor surface. Embed links carry their own
/// set, which then wins over the stored preferences for that session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayFlags {
    pub read_only: bool,
    pub line_numbers: bool,
    pub minimap: bool,
    pub sticky_scroll: bool,
}

/// Partial update for [`PreferencesStore::set`]; `None` leaves a field as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub line_numbers_enabled: Option<bool>,
    pub minimap_enabled: Option<bool>,
    pub sticky_scroll_enabled: Option<bool>,
    pub default_eol: Option<Eol>,
}

impl PreferencesPatch {
    /// Patch for a single stored key, e.g. `minimapEnabled` = `false`.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self> {
        let flag = || -> Result<bool> {
            value
                .trim()
                .parse::<bool>()
                .with_context(|| format!("Expected true or false for {}, got {:?}", key, value))
        };
        let mut patch = Self::default();
        match key {
            LINE_NUMBERS_KEY => patch.line_numbers_enabled = Some(flag()?),
            MINIMAP_KEY => patch.minimap_enabled = Some(flag()?),
            STICKY_SCROLL_KEY => patch.sticky_scroll_enabled = Some(flag()?),
            DEFAULT_EOL_KEY => patch.default_eol = Some(value.parse()?),
            other => return Err(anyhow::anyhow!("Unknown preference: {}", other)),
        }
        Ok(patch)
    }
}

pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Storage that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => {
                log::warn!("Preferences file is empty, starting fresh");
                BTreeMap::new()
            }
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(items) => {
                    log::info!("Loaded preferences from: {}", path.display());
                    items
                }
                Err(json_err) => {
                    log::error!("Failed to parse preferences file: {}", json_err);
                    let backup_path = path.with_extension("bak");
                    if let Err(e) = std::fs::copy(&path, &backup_path) {
                        log::warn!("Failed to back up broken preferences: {}", e);
                    } else {
                        log::info!("Backed up broken preferences to: {}", backup_path.display());
                    }
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Preferences file does not exist, it will be created");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read preferences file: {}", path.display())
                })
            }
        };
        Ok(Self { path, items })
    }

    /// `$NOTEPAD_PREFS_PATH`, `$NOTEPAD_CONFIG_DIR/preferences.json`, or the
    /// platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("NOTEPAD_PREFS_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("NOTEPAD_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("preferences.json"));
        }

        ProjectDirs::from("com", "notepad", "notepad")
            .map(|dirs| dirs.config_dir().join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, content).with_context(|| {
            format!("Failed to write preferences file: {}", self.path.display())
        })?;
        log::debug!("Saved preferences to: {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

pub struct PreferencesStore<S> {
    storage: S,
    current: ViewPreferences,
}

impl<S: KeyValueStorage> PreferencesStore<S> {
    /// Seed missing keys with defaults and read the current values.
    pub fn open(mut storage: S) -> Result<Self> {
        let defaults = ViewPreferences::default();
        for (key, value) in encode(&defaults) {
            let missing = storage
                .get_item(key)
                .map_or(true, |stored| stored.trim().is_empty());
            if missing {
                storage.set_item(key, &value)?;
            }
        }
        let current = decode(&storage);
        Ok(Self { storage, current })
    }

    pub fn get(&self) -> ViewPreferences {
        self.current
    }

    /// Merge `patch` and write the changed keys through to storage.
    pub fn set(&mut self, patch: PreferencesPatch) -> Result<ViewPreferences> {
        let mut next = self.current;
        if let Some(value) = patch.line_numbers_enabled {
            next.line_numbers_enabled = value;
        }
        if let Some(value) = patch.minimap_enabled {
            next.minimap_enabled = value;
        }
        if let Some(value) = patch.sticky_scroll_enabled {
            next.sticky_scroll_enabled = value;
        }
        if let Some(value) = patch.default_eol {
            next.default_eol = value;
        }

        // `current` follows each successful write, so a failure part way
        // through leaves it matching storage
        let before = encode(&self.current);
        for ((key, value), (_, old)) in encode(&next).into_iter().zip(before) {
            if value != old {
                self.storage.set_item(key, &value)?;
                copy_key(&mut self.current, &next, key);
            }
        }
        Ok(self.current)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn encode(prefs: &ViewPreferences) -> [(&'static str, String); 4] {
    [
        (LINE_NUMBERS_KEY, prefs.line_numbers_enabled.to_string()),
        (MINIMAP_KEY, prefs.minimap_enabled.to_string()),
        (STICKY_SCROLL_KEY, prefs.sticky_scroll_enabled.to_string()),
        (DEFAULT_EOL_KEY, prefs.default_eol.to_string()),
    ]
}

fn copy_key(target: &mut ViewPreferences, source: &ViewPreferences, key: &str) {
    match key {
        LINE_NUMBERS_KEY => target.line_numbers_enabled = source.line_numbers_enabled,
        MINIMAP_KEY => target.minimap_enabled = source.minimap_enabled,
        STICKY_SCROLL_KEY => target.sticky_scroll_enabled = source.sticky_scroll_enabled,
        DEFAULT_EOL_KEY => target.default_eol = source.default_eol,
        _ => {}
    }
}

fn decode(storage: &impl KeyValueStorage) -> ViewPreferences {
    let defaults = ViewPreferences::default();
    ViewPreferences {
        line_numbers_enabled: read_bool(storage, LINE_NUMBERS_KEY, defaults.line_numbers_enabled),
        minimap_enabled: read_bool(storage, MINIMAP_KEY, defaults.minimap_enabled),
        sticky_scroll_enabled: read_bool(
            storage,
            STICKY_SCROLL_KEY,
            defaults.sticky_scroll_enabled,
        ),
        default_eol: match storage.get_item(DEFAULT_EOL_KEY).map(|v| v.parse::<Eol>()) {
            Some(Ok(eol)) => eol,
            Some(Err(e)) => {
                log::warn!("Ignoring stored {}: {}", DEFAULT_EOL_KEY, e);
                defaults.default_eol
            }
            None => defaults.default_eol,
        },
    }
}

fn read_bool(storage: &impl KeyValueStorage, key: &str, default: bool) -> bool {
    match storage.get_item(key).as_deref().map(str::trim) {
        Some("true") => true,
        Some("false") => false,
        Some(other) => {
            log::warn!("Ignoring stored {}: {:?}", key, other);
            default
        }
        None => default,
    }
}
