//! Application use cases (business logic orchestration).

mod resolve_ci_properties;

pub use resolve_ci_properties::*;
