pub mod auth;
pub mod config;
pub mod core;

pub use auth::mojang::{AuthError, AuthSession, MojangClient, Profile};
pub use auth::status::ServiceStatus;
pub use config::document::{AuthAccount, ConfigDocument};
pub use config::error::{ConfigError, ConfigResult};
pub use config::manager::ConfigManager;
