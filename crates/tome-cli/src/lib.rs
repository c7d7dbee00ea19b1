//! CLI logic for the Tome documentation generator.
//!
//! This module contains the core CLI logic: configuration discovery, the
//! TOML manifest frontend, and the run that ties them to [`Documenter`].

pub mod error_adapter;
pub mod manifest;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;
use miette::GraphicalReportHandler;

use tome::{Documenter, TomeError, generate::GeneratedOutput};

use error_adapter::{render, warnings_to_reportables};
use manifest::Manifest;

/// Run the Tome CLI application
///
/// Loads the configuration, applies the command-line overrides, reads the
/// manifest, builds and resolves the model, reports its warnings, and writes
/// the documentation. Warnings never fail the run.
///
/// # Errors
///
/// Returns `TomeError` for:
/// - Configuration loading errors
/// - Manifest read or validation errors
/// - Location collisions
/// - Rendering or file write errors
pub fn run(args: &Args) -> Result<GeneratedOutput, TomeError> {
    info!(manifest = args.manifest.display().to_string(); "Documenting manifest");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(format) = args.format {
        app_config = app_config.with_format(format);
    }
    if let Some(output) = &args.output {
        app_config = app_config.with_output_directory(output);
    }

    let manifest = Manifest::load(&args.manifest)?;

    let documenter = Documenter::new(app_config);
    let output = documenter.build(&manifest);

    let reporter = GraphicalReportHandler::new();
    for reportable in warnings_to_reportables(output.diagnostics()) {
        eprintln!("{}", render(&reporter, &reportable));
    }

    if let Some(path) = &args.dump_model {
        let json = serde_json::to_string_pretty(output.module())
            .map_err(|err| TomeError::Export(Box::new(err)))?;
        fs::write(path, json)?;
        info!(path = path.display().to_string(); "Model written");
    }

    let generated = documenter.generate(&output)?;
    info!(
        directory = documenter.config().output().directory().display().to_string(),
        pages = generated.pages.len(),
        warnings = output.diagnostics().len();
        "Documentation written"
    );

    Ok(generated)
}
