// Configuration module entry

mod state;
mod types;

pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StoreConfig,
};
