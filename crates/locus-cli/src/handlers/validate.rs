//! Validation command handler

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use locus_validate::{JsonSchemaPlugin, Orchestrator, PlatformSupportPlugin, ValidationReport};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Handle the validate command
#[instrument(skip(config, output), fields(files = args.files.len()))]
pub async fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("files: {}", args.files.len()));

    for file in &args.files {
        if !file.exists() {
            error!("File not found: {}", file.display());
            return Err(Error::FileNotFound { path: file.clone() });
        }
    }

    output.info(&format!("Validating {} document(s)", args.files.len()))?;
    let orchestrator = Arc::new(build_orchestrator(&args, config)?);
    info!(plugins = ?orchestrator.plugin_names(), "Validator ready");

    let progress = output.progress_bar(args.files.len() as u64, "validating");
    let handles: Vec<_> = args
        .files
        .iter()
        .cloned()
        .map(|file| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::task::spawn_blocking(move || orchestrator.validate_file(&file))
        })
        .collect();

    let mut reports: Vec<ValidationReport> = Vec::with_capacity(handles.len());
    for handle in handles {
        let report = handle
            .await
            .map_err(|e| Error::other(format!("Validation task failed: {}", e)))??;
        debug!(file = %report.file_path, valid = report.valid, "Document validated");
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        reports.push(report);
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    output.reports(&reports)?;

    let invalid = reports.iter().filter(|report| !report.valid).count();
    if invalid > 0 {
        return Err(Error::ValidationFailed {
            invalid,
            total: reports.len(),
        });
    }

    if reports.len() > 1 {
        output.success(&format!("All {} documents are valid", reports.len()))?;
    }
    Ok(())
}

/// Assemble the orchestrator from configuration and flags
pub fn build_orchestrator(args: &ValidateArgs, config: &Config) -> Result<Orchestrator> {
    let mut settings = config.validation.orchestrator.clone();
    if let Some(max_bytes) = args.max_bytes {
        settings = settings.with_max_source_bytes(max_bytes);
    }
    // Concurrent tasks may see the same file twice
    settings = settings.with_position_cache(true);

    let mut orchestrator = Orchestrator::new(settings);

    if config.validation.platform_checks && !args.no_platform_checks {
        orchestrator.register(Box::new(PlatformSupportPlugin::new()));
    }

    if let Some(schema) = args.schema.as_ref().or(config.validation.schema.as_ref()) {
        let _timer = Timer::with_details("schema_loading", &schema.display().to_string());
        if !schema.exists() {
            return Err(Error::FileNotFound { path: schema.clone() });
        }
        orchestrator.register(Box::new(JsonSchemaPlugin::from_file(schema)?));
    }

    Ok(orchestrator)
}
