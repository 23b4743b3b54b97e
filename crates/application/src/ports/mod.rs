//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the interpolation core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod diagnostic_sink;
mod document_codec;

pub use diagnostic_sink::{Diagnostic, DiagnosticSink, RecordingSink};
pub use document_codec::{CodecError, DocumentCodec};
