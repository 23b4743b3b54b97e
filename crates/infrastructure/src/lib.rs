//! Deployable Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: file codecs for XML, YAML and JSON
//! descriptors, a `tracing` diagnostic sink, and property sources read from
//! the environment, `.properties` files and command-line definitions.

pub mod adapters;
pub mod codec;
pub mod sources;

pub use adapters::TracingDiagnosticSink;
pub use codec::{
    DocumentFormat, FileDocumentCodec, FormatError, from_json, from_xml, from_yaml,
    to_json_stable, to_xml, to_yaml,
};
pub use sources::{
    SourceError, environment_source, overrides_source, process_environment,
    properties_file_source, user_source,
};
