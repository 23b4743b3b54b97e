//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use deployable_domain::CiProperty;

/// Resolve CI-friendly version properties in build descriptors.
#[derive(Debug, Parser)]
#[command(name = "deployable", version, about)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (defaults to `deployable.toml` in the working directory, if present).
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve `${sha1}`, `${revision}` and `${changelist}` and write a deployable descriptor
    Resolve {
        /// Descriptor to resolve (XML, YAML or JSON)
        #[arg(default_value = "pom.xml")]
        pom: PathBuf,

        /// Where to write the resolved descriptor
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Define a property, as with Maven's -D (repeatable)
        #[arg(short = 'D', value_name = "NAME=VALUE")]
        define: Vec<String>,

        /// Load additional user properties from a Java .properties file
        #[arg(long, value_name = "FILE")]
        properties_file: Option<PathBuf>,

        /// Only resolve these properties (repeatable; defaults to all)
        #[arg(long, value_name = "NAME")]
        recognize: Vec<CiProperty>,
    },

    /// List the placeholders found in a descriptor
    Scan {
        /// Descriptor to scan
        file: PathBuf,
    },
}
