//! Error field detection

use crate::cli::DetectArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use locus_core::ErrorFieldDetector;
use tracing::{debug, instrument};

/// Handle the detect command
#[instrument(skip(output, args), fields(path = %args.path))]
pub fn handle_detect(args: DetectArgs, output: &mut OutputWriter) -> Result<()> {
    let info = ErrorFieldDetector::uncached().detect(&args.message, &args.path);
    debug!(rule = %info.reason, confidence = %info.confidence, "Detection finished");
    output.detection(&info)
}
