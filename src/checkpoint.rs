//! Checkpoint data structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A single section's key/value pairs, sorted by key
pub type Section = BTreeMap<String, Value>;

/// All sections, keyed by bracketed section name (brackets included)
pub type ConfigSections = BTreeMap<String, Section>;

/// Reserved section collecting key/value lines seen before any header
pub const ORPHAN_SECTION: &str = "[_orphans_]";

/// Immutable snapshot of all sections at a point in time.
///
/// Used as a diff baseline and revert target. Independent storage:
/// mutating the live store never affects a checkpoint already taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    sections: ConfigSections,
}

impl Checkpoint {
    /// Deep-copy the given sections
    pub fn of(sections: &ConfigSections) -> Self {
        Self {
            sections: sections.clone(),
        }
    }

    /// A section's snapshot, if it existed at checkpoint time
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// All snapshotted sections
    pub fn sections(&self) -> &ConfigSections {
        &self.sections
    }

    /// Consume the checkpoint, yielding its sections (used by revert)
    pub fn into_sections(self) -> ConfigSections {
        self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A single changed entry, reported against a checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Qualified name, `section.key`
    pub name: String,
    /// New value in its INI text form
    pub text: String,
}
