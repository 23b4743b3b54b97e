//! Deployable Domain - Core types
//!
//! This crate defines the domain model for resolving CI properties in build
//! descriptors. All types here are pure Rust with no I/O dependencies.

pub mod document;
pub mod error;
pub mod problem;
pub mod property;

pub use document::{Document, Node, NodeMap, NodePath, PROPERTIES_KEY, PathSegment};
pub use error::{DomainError, PropertyError};
pub use problem::{Problem, Severity};
pub use property::{CiProperty, PropertySource, parse_definition};
