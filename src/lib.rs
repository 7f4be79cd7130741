//! Propgraph
//!
//! An in-memory property graph store driven by a small textual command
//! protocol.
//!
//! # Data model
//!
//! - Entities have a unique name, exactly one label and string properties
//! - Relationships are directed and typed, with string properties; at most one
//!   exists per `(source, target, type)` triple
//! - A label index answers "which entities carry this label" without a scan
//! - Deleting an entity deletes every relationship it takes part in
//!
//! ## Example Usage
//!
//! ```rust
//! use propgraph::graph::{GraphStore, KeySelector, TypeFilter};
//!
//! let mut store = GraphStore::new();
//! store.add_entity("Person", "Alice").unwrap();
//! store.add_entity("Person", "Bob").unwrap();
//! store.set_property("Alice", "age", "30").unwrap();
//! store.add_relationship("Alice", "Bob", "friend").unwrap();
//!
//! let snapshot = store.get_properties("Alice", &KeySelector::All).unwrap();
//! assert_eq!(snapshot.properties["age"].as_deref(), Some("30"));
//!
//! let neighbors = store.neighbors("Alice", &TypeFilter::All).unwrap();
//! assert_eq!(neighbors[0].name, "Bob");
//! ```
//!
//! The same operations are reachable as text through
//! [`protocol::CommandHandler`]:
//!
//! ```rust
//! use propgraph::{CommandHandler, GraphStore};
//!
//! let mut store = GraphStore::new();
//! let handler = CommandHandler::new();
//! handler.handle_line("ADD_ENTITY{Person, Alice}", &mut store);
//! let response = handler.handle_line("GET_LABELED{Person}", &mut store);
//! assert!(!response.is_error());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod protocol;

// Re-export main types for convenience
pub use graph::{
    Entity, GraphError, GraphResult, GraphStatistics, GraphStore, KeySelector, Label,
    PropertyBag, RelationType, Relationship, RelationshipId, RelationshipRef, TypeFilter,
};

pub use protocol::{
    Command, CommandError, CommandHandler, CommandResult, ErrorKind, Response, Session,
    SessionSummary,
};

pub use config::{ConfigError, ConfigResult, OutputFormat, ShellConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
