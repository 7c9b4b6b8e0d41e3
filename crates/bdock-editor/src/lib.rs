#![forbid(unsafe_code)]

//! Block insertion API.
//!
//! The host editor owns the document state. This crate describes what bdock
//! needs from it ([`StateStore`], [`NodeFactory`]) and layers a small
//! insertion façade on top ([`BlockInserter`]) that:
//!
//! - merges registry default attributes under caller attributes,
//! - resolves a default insertion point from the host's selection,
//! - batches multi-node inserts into a single host transaction,
//! - reports every outcome as an [`InsertOutcome`] instead of failing.
//!
//! [`MemoryEditor`] is an in-memory host used by tests and headless hosts.

mod error;
mod host;
mod insert;
mod memory;
mod node;

pub use error::InsertError;
pub use host::{BlockTypeFilter, EditorHost, NodeFactory, StateStore};
pub use insert::{BlockInserter, BlockRequest, InsertOptions, InsertOutcome};
pub use memory::{MemoryEditor, MutationCounts};
pub use node::{BlockNode, InsertionPoint, NodeId};

pub use bdock_registry::Attributes;
