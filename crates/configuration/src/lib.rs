use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisConfig, Config, DataSourceConfig, PortfolioDefinition, RetrySettings,
};

/// Loads and validates the application configuration from a TOML file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, and runs the weight-sum validation. The "weights sum to 100%"
/// rule lives here, at the caller boundary; the analytics engine itself
/// never re-checks it.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
