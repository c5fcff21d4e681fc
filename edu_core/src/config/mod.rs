pub mod settings;

pub use settings::{AppConfig, CorsConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig, StorageBackend};
