//! TOML Configuration File Support
//!
//! Engine settings live in `~/.config/char-matrix/matrix.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the binary)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! font_size = 16.0
//! mobile_width = 60
//! particle_count = 3000
//! particle_count_mobile = 1200
//! physics_scale = 10.0
//! max_similarity_index = 99
//! frame_rate = 30
//! physics_hz = 50
//! similarity_table = "/usr/share/char-matrix/similarity.json"
//! seed = 7
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration
// =============================================================================

/// Engine settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Glyph height in pixels; glyphs are half as wide
    pub font_size: f64,

    /// Grids narrower than this many columns use the mobile layout
    pub mobile_width: i32,

    /// Physics particles on wide grids
    pub particle_count: usize,

    /// Physics particles on mobile grids
    pub particle_count_mobile: usize,

    /// Multiplier from physics displacement to substitute index
    pub physics_scale: f64,

    /// Largest substitute index the physics layer may pick
    pub max_similarity_index: usize,

    /// Frames per second
    pub frame_rate: u32,

    /// Physics steps per second
    pub physics_hz: u32,

    /// JSON similarity table; the built-in table is used when unset
    pub similarity_table: Option<PathBuf>,

    /// RNG seed for reproducible animation jitter
    pub seed: Option<u64>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            mobile_width: 60,
            particle_count: 3000,
            particle_count_mobile: 1200,
            physics_scale: 10.0,
            max_similarity_index: 99,
            frame_rate: 30,
            physics_hz: 50,
            similarity_table: None,
            seed: None,
        }
    }
}

impl MatrixConfig {
    /// Particle budget for the given breakpoint
    #[must_use]
    pub fn particles(&self, mobile: bool) -> usize {
        if mobile {
            self.particle_count_mobile
        } else {
            self.particle_count
        }
    }

    /// Reject values the engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_size.is_nan() || self.font_size <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ValidationError(
                "frame_rate must be at least 1".to_string(),
            ));
        }
        if self.physics_hz == 0 {
            return Err(ConfigError::ValidationError(
                "physics_hz must be at least 1".to_string(),
            ));
        }
        if self.mobile_width < 0 {
            return Err(ConfigError::ValidationError(format!(
                "mobile_width must not be negative, got {}",
                self.mobile_width
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/char-matrix/matrix.toml` or
/// `~/.config/char-matrix/matrix.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("char-matrix").join("matrix.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the merged values fail validation. A missing config file is not an error.
pub fn load_config() -> Result<MatrixConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<MatrixConfig, ConfigError> {
    let mut config = MatrixConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            config = toml::from_str(&toml_content)?;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut MatrixConfig) {
    if let Some(size) = env_parse("MATRIX_FONT_SIZE") {
        config.font_size = size;
    }
    if let Some(width) = env_parse("MATRIX_MOBILE_WIDTH") {
        config.mobile_width = width;
    }
    if let Some(count) = env_parse("MATRIX_PARTICLES") {
        config.particle_count = count;
    }
    if let Some(count) = env_parse("MATRIX_PARTICLES_MOBILE") {
        config.particle_count_mobile = count;
    }
    if let Some(fps) = env_parse("MATRIX_FPS") {
        config.frame_rate = fps;
    }
    if let Some(hz) = env_parse("MATRIX_PHYSICS_HZ") {
        config.physics_hz = hz;
    }
    if let Ok(path) = std::env::var("MATRIX_SIMILARITY_TABLE") {
        if !path.is_empty() {
            config.similarity_table = Some(PathBuf::from(path));
        }
    }
    if let Some(seed) = env_parse("MATRIX_SEED") {
        config.seed = Some(seed);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Clean up all environment variables used by config loading.
    fn clear_config_env_vars() {
        for name in [
            "MATRIX_FONT_SIZE",
            "MATRIX_MOBILE_WIDTH",
            "MATRIX_PARTICLES",
            "MATRIX_PARTICLES_MOBILE",
            "MATRIX_FPS",
            "MATRIX_PHYSICS_HZ",
            "MATRIX_SIMILARITY_TABLE",
            "MATRIX_SEED",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_default_config() {
        let config = MatrixConfig::default();

        assert_eq!(config.font_size, 16.0);
        assert_eq!(config.mobile_width, 60);
        assert_eq!(config.particles(false), 3000);
        assert_eq!(config.particles(true), 1200);
        assert_eq!(config.max_similarity_index, 99);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("char-matrix/matrix.toml"));
        }
    }

    #[test]
    fn test_parse_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"font_size = 20.0\nseed = 42\n").unwrap();

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.font_size, 20.0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_similarity_index, 99);
    }

    #[test]
    fn test_missing_file_graceful() {
        clear_config_env_vars();

        let path = PathBuf::from("/nonexistent/path/matrix.toml");
        let config = load_config_from_path(Some(path)).unwrap();
        assert_eq!(config.max_similarity_index, 99);
    }

    #[test]
    fn test_malformed_toml_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"font_size = \"not a number\n").unwrap();

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_rejects_zero_frame_rate() {
        let config = MatrixConfig {
            frame_rate: 0,
            ..MatrixConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    /// Environment values win over the file. Parallel tests may clear the
    /// variable between set and load, so either source is accepted but
    /// never the default.
    #[test]
    fn test_env_overrides_file() {
        clear_config_env_vars();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"particle_count = 500\n").unwrap();

        std::env::set_var("MATRIX_PARTICLES", "250");
        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
        std::env::remove_var("MATRIX_PARTICLES");

        assert!(
            config.particle_count == 250 || config.particle_count == 500,
            "Expected 250 or 500, got: {}",
            config.particle_count
        );
    }

    #[test]
    fn test_config_error_display() {
        let read_err = ConfigError::ReadError {
            path: PathBuf::from("/test/path"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(read_err.to_string().contains("/test/path"));

        let validation_err = ConfigError::ValidationError("invalid value".to_string());
        assert!(validation_err.to_string().contains("invalid value"));
    }
}
