//! # Warren
//!
//! Typed configuration store for section-organized, INI-style files -
//! with checkpoints, change listing and revert.
//!
//! This crate provides:
//! - A type-inferring parser for `[section]` / `key = value` text
//! - Typed get/set access with strict and lenient policies
//! - Checkpoint snapshots, delta reporting and wholesale revert
//! - Deterministic (sorted) write-back
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                   ConfigStore                    │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐ │
//! │  │  sections  │  │  original  │  │  changed   │ │
//! │  │   (live)   │  │(checkpoint)│  │   (flag)   │ │
//! │  └────────────┘  └────────────┘  └────────────┘ │
//! │         │              │                        │
//! │         ▼              ▼                        │
//! │  ┌────────────────────────────────────────────┐ │
//! │  │               ValueCodec                   │ │
//! │  │   TRUE/FALSE ⇄ bool, decimal ⇄ integer,    │ │
//! │  │   raw text ⇄ string                        │ │
//! │  └────────────────────────────────────────────┘ │
//! │                       │                         │
//! │                       ▼                         │
//! │  ┌────────────────────────────────────────────┐ │
//! │  │          LineSource / TextSink             │ │
//! │  │   raw lines in, writable text out          │ │
//! │  └────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Keys carry their type in the first character: `bEnabled` is boolean,
//! `nVolume` and `kShortcut` are integers, `sDevice` is a string. The tag
//! is enforced on write-back; reading infers types from the text alone.
//!
//! ## Example
//!
//! ```rust,ignore
//! use warren::{ConfigStore, StoreConfig, ConfigSections, FsAccess};
//!
//! let store_config = StoreConfig::default();
//! let mut store = ConfigStore::open(path, ConfigSections::new(), store_config)?;
//!
//! // Typed access
//! let volume = store.get("[sound]", "nVolume")?;
//! store.set("[sound]", "nVolume", 50)?;
//!
//! // What changed since load?
//! for change in store.changes()? {
//!     println!("{} = {}", change.name, change.text);
//! }
//!
//! // Roll back, or persist
//! store.save(&FsAccess)?;
//! ```

pub mod checkpoint;
pub mod error;
pub mod source;
pub mod store;
pub mod value;

pub use checkpoint::{Change, Checkpoint, ConfigSections, Section, ORPHAN_SECTION};
pub use error::ConfigError;
pub use source::{FsAccess, LineSource, TextSink};
pub use store::{ConfigStore, StoreConfig};
pub use value::{infer, serialize, KeyTag, Value};
