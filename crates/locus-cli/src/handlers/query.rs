//! Path queries against a JSON file

use super::read_json;
use crate::cli::QueryArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use locus_core::{JqCommand, QueryRunner};
use tracing::{debug, instrument};

/// Handle the query command
#[instrument(skip(config, output), fields(file = %args.file.display(), expression = %args.expression))]
pub fn handle_query(args: QueryArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("query_command", &args.expression);

    let (_, value) = read_json(&args.file, config.validation.orchestrator.max_source_bytes)?;
    let runner = if args.no_native {
        QueryRunner::new()
    } else {
        QueryRunner::new().with_engine(Box::new(JqCommand::default()))
    };

    let result = runner.query(&value, &args.expression);
    debug!(method = ?result.method, matches = result.data.len(), "Query finished");

    if let Some(problem) = &result.error {
        return Err(Error::other(format!("Query '{}' failed: {}", args.expression, problem)));
    }

    if output.is_human() {
        for item in &result.data {
            output.writeln(&serde_json::to_string_pretty(item)?)?;
        }
        Ok(())
    } else {
        output.data(&result)
    }
}
