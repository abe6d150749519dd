//! `.env` loading
//!
//! The file is read before tracing is installed so that `RUST_LOG` from it
//! reaches the filter. The outcome is kept and logged afterwards.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Result of looking for a `.env` file
#[derive(Debug)]
pub enum DotenvOutcome {
    Loaded(PathBuf),
    Missing,
    Failed(dotenvy::Error),
}

impl DotenvOutcome {
    fn from_result(result: dotenvy::Result<PathBuf>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::Missing,
            Err(e) => Self::Failed(e),
        }
    }

    pub fn log(&self) {
        match self {
            Self::Loaded(path) => info!(path = %path.display(), "Loaded .env"),
            Self::Missing => {}
            Self::Failed(e) => warn!(error = %e, "Could not load .env file"),
        }
    }
}

/// Load `.env` from the current directory or its ancestors.
pub fn load_dotenv() -> DotenvOutcome {
    DotenvOutcome::from_result(dotenvy::dotenv())
}

/// Load a specific env file.
pub fn load_dotenv_from(path: &Path) -> DotenvOutcome {
    DotenvOutcome::from_result(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}
