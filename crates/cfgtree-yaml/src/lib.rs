//! # cfgtree-yaml
//!
//! Ordered YAML parsing and block-style emission.
//!
//! This crate is the text layer under `cfgtree`: it turns YAML text into an
//! ordered tree of [`YamlValue`]s and back. Mapping order is preserved in both
//! directions, which keeps a configuration file's key order stable across a
//! load/save cycle.
//!
//! ## Design
//!
//! Parsing is built on `yaml-rust2`'s event parser, with a small builder that
//! collects events into [`YamlValue`] nodes backed by `indexmap`. Emission is a
//! stateless function taking explicit [`EmitOptions`].
//!
//! ## Example
//!
//! ```rust
//! use cfgtree_yaml::{EmitOptions, emit, parse};
//!
//! let content = r#"
//! title: My Document
//! author: Jane Doe
//! "#;
//!
//! let yaml = parse(content).unwrap();
//! let map = yaml.as_mapping().unwrap();
//! assert_eq!(
//!     emit(map, &EmitOptions::default()),
//!     "title: My Document\nauthor: Jane Doe\n"
//! );
//! ```

mod emitter;
mod error;
mod location;
mod parser;
mod value;

pub use emitter::{EmitOptions, emit, emit_value};
pub use error::{Error, Result};
pub use location::Location;
pub use parser::{parse, parse_named};
pub use value::{Mapping, YamlValue, format_real, resolve_plain_scalar};
