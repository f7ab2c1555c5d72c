//! Athanor - A Recipe-Synthesis Search Engine
//!
//! Athanor answers one question over a combinational craft catalog: given a
//! target element, how can it be built from the four base elements by
//! iterated binary combinations?
//!
//! # Quick Start
//!
//! ```
//! use athanor::{Engine, FindQuery};
//! use athanor_core::Catalog;
//!
//! let catalog = Catalog::from_json(r#"{"tiers":[
//!     {"name":"1","elements":[
//!         {"name":"Mud","local_svg_path":"","original_svg_url":"",
//!          "recipes":[["Water","Earth"]]}]}]}"#).unwrap();
//! let engine = Engine::new(catalog);
//!
//! let result = engine.find(&FindQuery::new("Mud").single_path());
//! assert_eq!(result.tree.count(), 1);
//! ```
//!
//! # Architecture
//!
//! An [`Engine`] is an immutable handle built once from a catalog: tier
//! index and indexed graph at construction, the reverse index lazily on the
//! first DFS query. Queries dispatch through [`Engine::find`] to one of the
//! search families and share no mutable state, so one engine serves
//! concurrent queries without locks. To rebuild (after a fresh scrape),
//! construct a new engine and swap the handle.
//!
//! # Modules
//!
//! - [`engine`] - The engine handle and query coordinator
//! - [`query`] - Query parameters and result types
//! - [`error`] - Error types

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod engine;
pub mod error;
pub mod query;

pub use engine::Engine;
pub use error::{Error, Result};
pub use query::{Algorithm, FindQuery, FindResult, TreeReply, DEFAULT_MAX_PATHS};

// Re-exported for consumers of [`FindResult::search_steps`].
pub use athanor_graph::traversal::SearchStep;
