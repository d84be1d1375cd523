pub mod config;
pub mod home_dir;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, AppConfigProvider, CliArgs, ConfigProvider,
    ApplicationConfig, DatabaseConfig, LoggingConfig, Section,
};
