//! Command handlers for CLI subcommands
//!
//! Each subcommand lives in its own module under `handlers/`.

mod completions;
mod convert;
mod detect;
mod locate;
mod query;
mod validate;

pub use completions::handle_completions;
pub use convert::handle_convert;
pub use detect::handle_detect;
pub use locate::handle_locate;
pub use query::handle_query;
pub use validate::handle_validate;

use crate::error::{Error, Result};
use std::path::Path;

/// Read a JSON file the user named on the command line, refusing files
/// above `limit` bytes before reading them
fn read_json(path: &Path, limit: usize) -> Result<(String, serde_json::Value)> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let size = std::fs::metadata(path)?.len();
    if size > limit as u64 {
        return Err(Error::TooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }
    let text = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&text)?;
    Ok((text, value))
}
