//! Hierarchical, fact-driven configuration resolution.
//!
//! A document names a base data section, a set of override fragments and a
//! `hierarchy` listing override keys as templates. Each template embeds
//! `{{ expression }}` placeholders that read the caller's facts through
//! `lookup`. Resolving the document expands those templates, selects the
//! matching fragments and merges them over the base data, producing a single
//! owned mapping.
//!
//! ```
//! use serde_json::json;
//! use tiny_hiera::{ResolveOptions, resolve_yaml};
//!
//! let document = br#"
//! hierarchy:
//!   order:
//!     - "role:{{ lookup('role') }}"
//!     - common
//!   merge: deep
//! data:
//!   tier: base
//! overrides:
//!   "role:web":
//!     listen: 443
//!   common:
//!     tier: shared
//! "#;
//! let facts = json!({"role": "web"});
//! let resolved = resolve_yaml(
//!     document,
//!     facts.as_object().expect("object"),
//!     &ResolveOptions::default(),
//!     None,
//! )?;
//! assert_eq!(resolved["listen"], json!(443));
//! assert_eq!(resolved["tier"], json!("shared"));
//! # Ok::<(), std::sync::Arc<tiny_hiera::HieraError>>(())
//! ```

use std::sync::Arc;

mod error;
mod logger;
mod options;
mod resolver;
mod result_ext;

pub mod decode;
pub mod expr;
pub mod hierarchy;
pub mod isolate;
pub mod merge;
pub mod normalise;
pub mod query;
pub mod template;

pub use error::{DocumentFormat, HieraError};
pub use hierarchy::{Hierarchy, MergeMode};
pub use isolate::Mapping;
pub use logger::{ResolveLogger, TracingLogger};
pub use options::{DEFAULT_DATA_KEY, ResolveOptions};
pub use query::FactSnapshot;
pub use resolver::{resolve, resolve_bytes, resolve_json, resolve_yaml};
pub use result_ext::HieraResultExt;
pub use template::Expansion;

/// Result type returned by every fallible operation in this crate.
pub type HieraResult<T> = Result<T, Arc<HieraError>>;
