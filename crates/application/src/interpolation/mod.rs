//! Placeholder interpolation module
//!
//! Provides scanning and resolution of `${name}` placeholders in documents.
//!
//! # Usage
//!
//! ```
//! use deployable_application::interpolation::{PropertySourceChain, resolve};
//! use deployable_application::ports::RecordingSink;
//! use deployable_domain::{Document, Node, PropertySource};
//!
//! let doc = Document::new(Node::mapping([
//!     ("version", Node::scalar("1.0.0-${revision}${changelist}")),
//!     ("note", Node::scalar("built by ${user.name}")),
//! ]));
//!
//! let chain = PropertySourceChain::ci(
//!     PropertySource::new("user").with_property("revision", "5"),
//!     PropertySource::new("environment"),
//!     PropertySource::new("document"),
//! );
//!
//! let resolved = resolve(&doc, &chain, &RecordingSink::new()).unwrap();
//! assert_eq!(resolved.root().get("version").and_then(Node::as_scalar), Some("1.0.0-5"));
//! let note = resolved.root().get("note").and_then(Node::as_scalar);
//! assert_eq!(note, Some("built by ${user.name}"));
//! ```

pub mod chain;
pub mod engine;
pub mod problems;
pub mod scanner;

pub use chain::{PropertySourceChain, PropertySourceChainBuilder};
pub use engine::{InterpolationFailure, Interpolator, PassStats, resolve};
pub use problems::ProblemCollector;
pub use scanner::{Placeholder, Placeholders, has_placeholders, placeholder_names, scan};
