//! Configuration file loading for colloquy
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `COLLOQUY_<SECTION>__<KEY>` (e.g. `COLLOQUY_LOG__CAPACITY`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./colloquy.toml` or `./.colloquy.toml`
//! 4. Global: `$XDG_CONFIG_HOME/colloquy/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDriverConfig, FileGeneratorConfig, FileLogConfig,
    FileTopicsConfig, FileTranscriptConfig, GeneratorProvider,
};
pub use loader::ConfigLoader;
