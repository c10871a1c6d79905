//! Exit codes for `poster`.
//!
//! Clap exits with 2 on malformed arguments before any of this runs. Past
//! that point a failure maps to one code:
//!
//! | code | meaning |
//! |------|---------|
//! | 10   | the poster could not be composed or encoded |
//! | 11   | a spec file could not be read or the PNG could not be written |
//! | 12   | flags, spec file or `--params` were rejected before rendering |
//! | 13   | JSON output could not be produced |

use poster_core::PosterError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// Compose or encode failed; carries the library error unchanged.
    Render(PosterError),
    Io(String),
    /// Caught at the boundary, nothing was composed.
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "render failed: {e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

/// File system failures from the raster crate keep their own exit code.
impl From<PosterError> for CliError {
    fn from(e: PosterError) -> Self {
        match e {
            PosterError::Io(msg) => CliError::Io(msg),
            other => CliError::Render(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
