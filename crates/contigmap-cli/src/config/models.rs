use contigmap::engine::config::ContigMapConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub reference_path: PathBuf,
    pub output_path: PathBuf,
    pub mappings_path: Option<PathBuf>,
    /// `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    pub core_config: ContigMapConfig,
}
