//! Report export configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Report export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Directory exported reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
