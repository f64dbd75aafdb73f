//! Configuration store - parsing, typed access, change tracking, write-back

use std::collections::btree_map::Entry;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::checkpoint::{Change, Checkpoint, ConfigSections, Section, ORPHAN_SECTION};
use crate::error::ConfigError;
use crate::source::{FsAccess, LineSource, TextSink};
use crate::value::{self, Value};

/// Configuration for the store itself
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Fallback directory when a save is requested and no path was ever resolved
    pub default_dir: PathBuf,
    /// File name used within the fallback directory
    pub file_name: String,
    /// Fail `set` on unknown sections/keys instead of creating them
    pub strict: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_dir: PathBuf::from(".warren"),
            file_name: "warren.cfg".to_string(),
            strict: true,
        }
    }
}

/// Section-organized typed configuration with checkpoint/diff/revert.
///
/// Holds the live sections, the checkpoint taken at load time, and a
/// store-wide dirty flag. All text crossing the boundary goes through
/// the value codec.
pub struct ConfigStore {
    /// Live state
    sections: ConfigSections,
    /// Checkpoint taken at load time, baseline for [`ConfigStore::changes`]
    original: Checkpoint,
    /// True once any `set` altered a value or added an entry
    changed: bool,
    /// Resolved file location, `None` when loaded from defaults
    path: Option<PathBuf>,
    /// Store configuration
    config: StoreConfig,
}

impl ConfigStore {
    /// Build a store from raw configuration lines.
    ///
    /// Input that yields no sections at all counts as a failed load: the
    /// store falls back to `defaults` with a warning.
    pub fn from_lines<I>(lines: I, defaults: ConfigSections, config: StoreConfig) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let sections = parse_lines(lines);
        if sections.is_empty() {
            warn!("input yielded no sections, using defaults");
            return Self::seed(defaults, None, config);
        }
        Self::seed(sections, None, config)
    }

    /// Build a store seeded directly from a defaults mapping
    pub fn from_defaults(defaults: ConfigSections, config: StoreConfig) -> Self {
        Self::seed(defaults, None, config)
    }

    /// Load a configuration file from the filesystem.
    ///
    /// A missing file falls back to `defaults` and leaves the path
    /// unresolved; path resolution itself is the caller's job.
    pub fn open(
        path: &Path,
        defaults: ConfigSections,
        config: StoreConfig,
    ) -> Result<Self, ConfigError> {
        Self::open_with(&FsAccess, path, defaults, config)
    }

    /// Load a configuration file through the given line source
    pub fn open_with(
        source: &dyn LineSource,
        path: &Path,
        defaults: ConfigSections,
        config: StoreConfig,
    ) -> Result<Self, ConfigError> {
        match source.read_lines(path)? {
            Some(lines) => {
                let sections = parse_lines(lines);
                if sections.is_empty() {
                    // keep the path: a later save may repair the file
                    warn!(path = %path.display(), "configuration file yielded no sections, using defaults");
                    return Ok(Self::seed(defaults, Some(path.to_path_buf()), config));
                }
                info!(path = %path.display(), sections = sections.len(), "loaded configuration file");
                Ok(Self::seed(sections, Some(path.to_path_buf()), config))
            }
            None => {
                warn!(path = %path.display(), "configuration file missing, using defaults");
                Ok(Self::seed(defaults, None, config))
            }
        }
    }

    fn seed(sections: ConfigSections, path: Option<PathBuf>, config: StoreConfig) -> Self {
        let original = Checkpoint::of(&sections);
        Self {
            sections,
            original,
            changed: false,
            path,
            config,
        }
    }

    /// True when the store holds at least one section
    pub fn is_loaded(&self) -> bool {
        !self.sections.is_empty()
    }

    /// True once any `set` altered a value or added an entry
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Resolved file location, `None` when loaded from defaults
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Live sections, sorted by section name and key
    pub fn sections(&self) -> &ConfigSections {
        &self.sections
    }

    // === Typed Access ===

    /// Get a value. Reads are always strict: a missing section or key
    /// fails regardless of the store's policy.
    pub fn get(&self, section: &str, key: &str) -> Result<&Value, ConfigError> {
        self.sections
            .get(section)
            .and_then(|keys| keys.get(key))
            .ok_or_else(|| ConfigError::KeyNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Set a key in a section.
    ///
    /// Strict mode refuses to invent sections or keys; lenient mode
    /// creates them. The dirty flag rises when a value actually changes
    /// or an entry is added, and never falls here.
    pub fn set(
        &mut self,
        section: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ConfigError> {
        let value = value.into();
        let keys = match self.sections.entry(section.to_string()) {
            Entry::Vacant(_) if self.config.strict => {
                return Err(ConfigError::MissingSection(section.to_string()))
            }
            entry => entry.or_default(),
        };
        match keys.get(key) {
            None if self.config.strict => {
                return Err(ConfigError::MissingKey {
                    section: section.to_string(),
                    key: key.to_string(),
                })
            }
            None => self.changed = true,
            Some(old) if *old != value => self.changed = true,
            Some(_) => {}
        }
        keys.insert(key.to_string(), value);
        Ok(())
    }

    // === Checkpoint & Diff ===

    /// Snapshot the current state
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::of(&self.sections)
    }

    /// List entries that differ from the given checkpoint.
    ///
    /// Returns an empty list whenever the dirty flag is clear; tracking
    /// is store-wide, not per key. The diff is additive-only: entries
    /// removed since the checkpoint are not reported.
    pub fn changes_since(&self, checkpoint: &Checkpoint) -> Result<Vec<Change>, ConfigError> {
        let mut changes = Vec::new();
        if !self.changed {
            return Ok(changes);
        }
        for (name, keys) in &self.sections {
            let base = checkpoint.section(name);
            for (key, current) in keys {
                let differs = match base.and_then(|section| section.get(key)) {
                    None => true,
                    Some(old) => old != current,
                };
                if differs {
                    changes.push(Change {
                        name: format!("{name}.{key}"),
                        text: value::serialize(key, current)?,
                    });
                }
            }
        }
        Ok(changes)
    }

    /// Changes since load, the common case
    pub fn changes(&self) -> Result<Vec<Change>, ConfigError> {
        self.changes_since(&self.original)
    }

    /// Replace the live state wholesale with a checkpoint's contents.
    ///
    /// Does not touch the dirty flag.
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        self.sections = checkpoint.into_sections();
    }

    // === Serialization ===

    /// Write the current state as INI text. Sections and keys come out
    /// sorted, so repeated writes of unchanged state are byte-identical.
    pub fn write(&self, out: &mut dyn Write) -> Result<(), ConfigError> {
        for (name, keys) in &self.sections {
            writeln!(out, "{name}")?;
            for (key, value) in keys {
                writeln!(out, "{key} = {}", value::serialize(key, value)?)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Save the store if it changed.
    ///
    /// Returns `Ok(None)` when there is nothing to do. When no path was
    /// ever resolved, writes under the configured default location and
    /// adopts that path. A successful save clears the dirty flag.
    pub fn save(&mut self, sink: &dyn TextSink) -> Result<Option<PathBuf>, ConfigError> {
        if !self.changed {
            debug!("no configuration changes to save, skipping");
            return Ok(None);
        }
        let path = match &self.path {
            Some(path) => path.clone(),
            None => {
                warn!("no existing configuration file, creating one under the default directory");
                self.config.default_dir.join(&self.config.file_name)
            }
        };
        let mut out = sink.create(&path)?;
        self.write(&mut *out)?;
        out.flush()?;
        self.path = Some(path.clone());
        self.changed = false;
        info!(path = %path.display(), "saved configuration file");
        Ok(Some(path))
    }

    /// Save to a new path and adopt it as the store's path, regardless
    /// of the dirty flag
    pub fn save_as(&mut self, sink: &dyn TextSink, path: &Path) -> Result<PathBuf, ConfigError> {
        self.path = Some(path.to_path_buf());
        self.changed = true;
        self.save(sink)?;
        Ok(path.to_path_buf())
    }

    /// Write the current state to an arbitrary path without touching the
    /// store's own path or dirty flag
    pub fn save_tmp(&self, sink: &dyn TextSink, path: &Path) -> Result<PathBuf, ConfigError> {
        let mut out = sink.create(path)?;
        self.write(&mut *out)?;
        out.flush()?;
        info!(path = %path.display(), "saved temporary configuration copy");
        Ok(path.to_path_buf())
    }
}

/// Parse raw lines into sections.
///
/// Blank lines and `#` comments are skipped. Lines before the first
/// header collect under the orphan section. A repeated header merges
/// into the earlier bucket, later keys overwriting on collision. A line
/// without `=` is dropped with a warning; splitting is on the first `=`.
fn parse_lines<I>(lines: I) -> ConfigSections
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut sections = ConfigSections::new();
    let mut current = ORPHAN_SECTION.to_string();
    let mut pending = Section::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            if sections.contains_key(line) {
                warn!(section = line, "section appears twice, merging keys");
            }
            if !pending.is_empty() {
                sections.entry(current).or_default().append(&mut pending);
            }
            current = line.to_string();
            continue;
        }
        let Some((key, text)) = line.split_once('=') else {
            warn!(line, "line without key=value pair, skipping");
            continue;
        };
        pending.insert(key.trim().to_string(), value::infer(text.trim()));
    }
    if !pending.is_empty() {
        sections.entry(current).or_default().append(&mut pending);
    }
    sections
}
