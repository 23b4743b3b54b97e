//! Settings loaded from an optional file and `DEPLOYABLE_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use deployable_domain::CiProperty;
use serde::Deserialize;

/// Settings file looked up in the working directory when none is given.
const DEFAULT_FILE: &str = "deployable";
/// Prefix of the environment variables read into the settings.
const ENV_PREFIX: &str = "DEPLOYABLE";
/// Output location relative to the descriptor's directory.
const DEFAULT_OUTPUT: &str = "target/deployable-pom.xml";

/// Defaults for the `resolve` command.
///
/// Command line flags take precedence over these values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the resolved descriptor is written, relative to the working
    /// directory. Unset means `target/deployable-pom.xml` next to the descriptor.
    pub output: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Properties to resolve; empty means all of them.
    pub recognize: Vec<CiProperty>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: None,
            log_level: "info".to_string(),
            recognize: Vec::new(),
        }
    }
}

impl Settings {
    /// Loads settings from `file` (or `deployable.*` if present) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any source is malformed.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, Self::environment())
    }

    /// Returns where the resolved copy of `descriptor` is written.
    #[must_use]
    pub fn output_for(&self, descriptor: &Path) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            descriptor
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_OUTPUT)
        })
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("recognize")
    }

    fn load_with(file: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let file = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
