use contigmap::engine::config::DEFAULT_MAX_SAMPLING_ATTEMPTS;

pub struct DefaultsConfig {
    pub max_attempts: usize,
    pub topology_only: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_SAMPLING_ATTEMPTS,
            topology_only: false,
        }
    }
}
