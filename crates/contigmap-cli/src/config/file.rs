use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Mirror of the TOML configuration file. Every field is optional; values given on the
/// command line take precedence.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub contigs: Option<String>,
    pub topology_only: Option<bool>,
    pub sampling: Option<FileSamplingConfig>,
    pub masks: Option<FileMaskConfig>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSamplingConfig {
    pub length: Option<String>,
    pub symmetry: Option<usize>,
    pub max_attempts: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileMaskConfig {
    pub inpaint_seq: Option<String>,
    pub inpaint_str: Option<String>,
    pub helix: Option<String>,
    pub strand: Option<String>,
    #[serde(rename = "loop")]
    pub loop_: Option<String>,
    pub provide_seq: Option<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
