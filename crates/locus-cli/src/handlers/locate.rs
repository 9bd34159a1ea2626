//! Source position lookup

use super::read_json;
use crate::cli::LocateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use locus_core::{MatchConfidence, PositionMap};
use tracing::{info, instrument};

/// Handle the locate command
#[instrument(skip(config, output), fields(file = %args.file.display(), path = %args.path))]
pub fn handle_locate(args: LocateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("locate_command", &format!("file: {}", args.file.display()));

    // Parsing first rejects malformed files instead of locating inside them
    let (text, _) = read_json(&args.file, config.validation.orchestrator.max_source_bytes)?;
    let positions = PositionMap::build(&text);
    info!(entries = positions.len(), "Position map built");

    let found = positions.find(&args.path);
    if found.confidence == MatchConfidence::None {
        info!("No position recorded for {}", args.path);
    }
    output.position(&args.path, &found)
}
