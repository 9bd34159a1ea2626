//! Path notation conversion

use crate::cli::ConvertArgs;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use locus_core::{PathConverter, PathFormat};
use tracing::{debug, instrument, warn};

/// Handle the convert command
#[instrument(skip(output), fields(path = %args.path, to = ?args.to))]
pub fn handle_convert(args: ConvertArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("convert_command", &args.path);

    let converter = PathConverter::new();
    let result = converter.convert_from(&args.path, args.from.map(PathFormat::from), args.to.into())?;
    debug!(source_format = ?result.source_format, "Converted path");

    if let Some(problem) = &result.error {
        warn!("Fell back to a best-effort parse: {}", problem);
    }

    if output.is_human() {
        output.writeln(&result.result)?;
        if let Some(problem) = &result.error {
            output.warning(&format!("best-effort conversion: {problem}"))?;
        }
        Ok(())
    } else {
        output.data(&result)
    }
}
