//! Deployable - Main Entry Point
//!
//! Resolves CI-friendly version properties (`${sha1}`, `${revision}`,
//! `${changelist}`) in a build descriptor and writes the deployable result.

mod cli;
mod settings;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use deployable_application::interpolation::scan;
use deployable_application::ports::DocumentCodec;
use deployable_application::use_cases::{ResolveCiProperties, ResolveCiPropertiesInput};
use deployable_domain::CiProperty;
use deployable_infrastructure::{
    FileDocumentCodec, TracingDiagnosticSink, process_environment, user_source,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::settings::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&settings.log_level))
                .context("Invalid log level")?,
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Resolve {
            pom,
            output,
            define,
            properties_file,
            recognize,
        } => {
            let output = output.unwrap_or_else(|| settings.output_for(&pom));
            let recognize = if recognize.is_empty() {
                settings.recognize
            } else {
                recognize
            };
            let user = user_source(properties_file.as_deref(), &define)
                .context("Invalid user properties")?;

            let input = ResolveCiPropertiesInput::new(pom, output)
                .with_user(user)
                .with_environment(process_environment())
                .recognizing(recognize);

            let use_case =
                ResolveCiProperties::new(FileDocumentCodec::new(), TracingDiagnosticSink::new());
            use_case.execute(input)?;
            Ok(())
        }
        Command::Scan { file } => scan_file(&file),
    }
}

/// Prints each scalar that contains placeholders, with its document path.
fn scan_file(file: &Path) -> anyhow::Result<()> {
    let document = FileDocumentCodec::new()
        .read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut found = 0;
    document.walk_scalars(|path, value| {
        let names: Vec<String> = scan(value)
            .map(|placeholder| {
                let marker = if CiProperty::from_name(placeholder.name).is_some() {
                    ""
                } else {
                    " (ignored)"
                };
                format!("${{{}}}{marker}", placeholder.name)
            })
            .collect();
        if !names.is_empty() {
            found += names.len();
            println!("{path}: {}", names.join(", "));
        }
    });

    tracing::info!("Found {found} placeholder(s) in {}", file.display());
    Ok(())
}
