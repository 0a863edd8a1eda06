//! Hierarchical, YAML-backed configuration trees.
//!
//! This crate keeps a YAML configuration document in memory as a tree of named
//! sections. Values are read and written by delimited paths such as
//! `server.http.port`, without walking nested maps by hand.
//!
//! # Key Features
//!
//! - **Path access**: get, set and remove at any depth; missing intermediate
//!   sections are created on write
//! - **Defaults overlay**: a second tree supplies values for paths the primary
//!   tree does not set, without ever being written to
//! - **Ordered round-trips**: key order survives load and save, and a leading
//!   comment block is kept as the document header
//!
//! # Architecture
//!
//! - [`Configuration`]: the root, owning the section arena, the
//!   [`ConfigOptions`], an optional defaults tree and an optional
//!   [`ConfigStore`]
//! - [`Section`] / [`SectionMut`]: read and write handles on one section
//! - [`Entry`]: the result of a lookup, either a [`Value`] or a section
//! - [`path`]: splitting and joining of delimited paths
//!
//! Parsing and emitting YAML text is done by the `cfgtree-yaml` crate.
//!
//! # Example
//!
//! ```rust
//! use cfgtree::Configuration;
//!
//! let mut defaults = Configuration::new();
//! defaults.set("server.port", 80).unwrap();
//!
//! let mut config = Configuration::new();
//! config.load_from_str("# My service\nserver:\n  host: example.org\n").unwrap();
//! config.set_defaults(defaults);
//!
//! assert_eq!(config.get_string("server.host").as_deref(), Some("example.org"));
//! assert_eq!(config.get_i64("server.port"), Some(80));
//! assert_eq!(config.options().header(), Some("My service"));
//! ```

mod accessors;
mod configuration;
mod convert;
mod defaults;
mod error;
mod header;
mod options;
pub mod path;
mod section;
mod store;
mod value;

pub use configuration::Configuration;
pub use error::{Error, Result};
pub use header::{parse_header, render_header};
pub use options::{ConfigOptions, MAX_INDENT, MIN_INDENT};
pub use section::{Entry, Section, SectionMut};
pub use store::{ConfigStore, FileStore, MemoryStore};
pub use value::Value;
