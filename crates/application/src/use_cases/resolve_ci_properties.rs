//! Resolve CI properties use case

use std::path::PathBuf;

use deployable_domain::{CiProperty, Document, PropertySource};

use crate::error::{ApplicationError, ApplicationResult};
use crate::interpolation::{Interpolator, PassStats, PropertySourceChain};
use crate::ports::{DiagnosticSink, DocumentCodec};

/// Input for resolving a descriptor into a deployable descriptor.
#[derive(Debug, Clone)]
pub struct ResolveCiPropertiesInput {
    /// Descriptor to read.
    pub descriptor: PathBuf,
    /// Where the resolved descriptor is written.
    pub output: PathBuf,
    /// User overrides (highest precedence).
    pub user: PropertySource,
    /// Process environment snapshot.
    pub environment: PropertySource,
    /// Properties to resolve; empty means every [`CiProperty`].
    pub recognize: Vec<CiProperty>,
}

impl ResolveCiPropertiesInput {
    /// Creates an input with empty user and environment sources.
    pub fn new(descriptor: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            descriptor: descriptor.into(),
            output: output.into(),
            user: PropertySource::new("user"),
            environment: PropertySource::new("environment"),
            recognize: Vec::new(),
        }
    }

    /// Sets the user overrides.
    #[must_use]
    pub fn with_user(mut self, user: PropertySource) -> Self {
        self.user = user;
        self
    }

    /// Sets the environment snapshot.
    #[must_use]
    pub fn with_environment(mut self, environment: PropertySource) -> Self {
        self.environment = environment;
        self
    }

    /// Restricts resolution to the given properties.
    #[must_use]
    pub fn recognizing(mut self, properties: impl IntoIterator<Item = CiProperty>) -> Self {
        self.recognize = properties.into_iter().collect();
        self
    }
}

/// Output of a successful resolution.
#[derive(Debug)]
pub struct ResolveCiPropertiesOutput {
    /// Absolute path the resolved descriptor was written to.
    pub output: PathBuf,
    /// The resolved descriptor.
    pub document: Document,
    /// Counters of the interpolation pass.
    pub stats: PassStats,
}

/// Reads a descriptor, resolves its CI properties and writes the result.
///
/// The chain is built from the user overrides, the environment and the
/// defaults declared by the descriptor itself, in that order.
pub struct ResolveCiProperties<C, S> {
    codec: C,
    sink: S,
}

impl<C: DocumentCodec, S: DiagnosticSink> ResolveCiProperties<C, S> {
    /// Creates a new `ResolveCiProperties` use case.
    pub const fn new(codec: C, sink: S) -> Self {
        Self { codec, sink }
    }

    /// Executes the use case.
    ///
    /// Nothing is written when interpolation fails.
    ///
    /// # Errors
    /// Returns [`ApplicationError::Read`] or [`ApplicationError::Write`] when
    /// the codec fails, and [`ApplicationError::Interpolation`] when a fatal
    /// problem was recorded.
    pub fn execute(
        &self,
        input: ResolveCiPropertiesInput,
    ) -> ApplicationResult<ResolveCiPropertiesOutput> {
        tracing::debug!(path = %input.descriptor.display(), "loading descriptor");
        let document = self
            .codec
            .read(&input.descriptor)
            .map_err(|source| ApplicationError::Read {
                path: input.descriptor.clone(),
                source,
            })?;

        let mut chain = PropertySourceChain::builder()
            .source(input.user)
            .source(input.environment)
            .source(document.declared_properties());
        if !input.recognize.is_empty() {
            chain = chain.recognize(input.recognize);
        }
        let chain = chain.build();

        let (resolved, stats) =
            Interpolator::new(&self.sink).interpolate_with_stats(&document, &chain)?;

        tracing::debug!(path = %input.output.display(), "writing deployable descriptor");
        self.codec
            .write(&input.output, &resolved)
            .map_err(|source| ApplicationError::Write {
                path: input.output.clone(),
                source,
            })?;

        let output = std::path::absolute(&input.output).unwrap_or(input.output);
        tracing::info!("Resolved CI properties in {}", output.display());

        Ok(ResolveCiPropertiesOutput {
            output,
            document: resolved,
            stats,
        })
    }
}
