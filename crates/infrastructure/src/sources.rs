//! Property sources backed by the process environment, files and the command line.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use deployable_domain::{CiProperty, DomainError, PropertySource, parse_definition};

/// Name of the source built from environment variables.
pub const ENVIRONMENT_SOURCE: &str = "environment";
/// Name of the source built from user definitions.
pub const USER_SOURCE: &str = "user";

/// Errors that can occur while building a property source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The properties file could not be opened.
    #[error("Failed to read properties file {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The properties file is malformed.
    #[error("Invalid properties file {}: {source}", path.display())]
    Properties {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: java_properties::PropertiesError,
    },

    /// A `name=value` definition is invalid.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Snapshots the recognized CI names from a set of environment variables.
///
/// Each name is looked up as written (`revision`) and then upper-cased
/// (`REVISION`); the first hit wins.
pub fn environment_source<I, K, V>(vars: I) -> PropertySource
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: HashMap<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();

    let mut source = PropertySource::new(ENVIRONMENT_SOURCE);
    for property in CiProperty::ALL {
        let name = property.name();
        let value = vars
            .get(name)
            .or_else(|| vars.get(&name.to_ascii_uppercase()));
        if let Some(value) = value {
            source = source.with_property(name, value.clone());
        }
    }
    source
}

/// Snapshots the recognized CI names from the current process environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
#[must_use]
pub fn process_environment() -> PropertySource {
    environment_source(
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
    )
}

/// Loads a Java `.properties` file as a property source named after the file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn properties_file_source(path: &Path) -> Result<PropertySource, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let properties =
        java_properties::read(BufReader::new(file)).map_err(|source| SourceError::Properties {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), count = properties.len(), "Loaded properties file");
    Ok(PropertySource::from_map(path.display().to_string(), properties))
}

/// Parses `name=value` definitions, as given with `-D` on the command line.
///
/// Later definitions of the same name replace earlier ones.
///
/// # Errors
///
/// Returns an error if a definition has an empty name.
pub fn overrides_source<I, S>(definitions: I) -> Result<PropertySource, SourceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut source = PropertySource::new(USER_SOURCE);
    for definition in definitions {
        let (name, value) = parse_definition(definition.as_ref())?;
        source = source.with_property(name, value);
    }
    Ok(source)
}

/// Builds the user source from an optional properties file and definitions.
///
/// Definitions take precedence over the file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or a definition is invalid.
pub fn user_source<I, S>(
    properties_file: Option<&Path>,
    definitions: I,
) -> Result<PropertySource, SourceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut properties = match properties_file {
        Some(path) => properties_file_source(path)?.properties().clone(),
        None => HashMap::new(),
    };
    properties.extend(overrides_source(definitions)?.properties().clone());
    Ok(PropertySource::from_map(USER_SOURCE, properties))
}
