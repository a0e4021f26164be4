// Configuration management module
// TOML settings for the Marqo connection and cache behavior

pub mod interactive;
pub mod settings;


pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    CacheConfig, Config, ConfigError, DEFAULT_INDEX_NAME, DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K,
    MarqoConfig,
};

/// Get the configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    Config::config_dir()
}
