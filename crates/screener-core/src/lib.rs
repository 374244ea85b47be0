//! Configuration, logging bootstrap, secret resolution and hub authentication.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod vault;

pub use auth::{AuthError, HF_TOKEN_ENV, authenticate, authenticate_huggingface, resolve_token};
pub use bootstrap::{load_config, load_config_from_env, resolve_config_path};
pub use config::Config;
pub use logging::{LoggingConfig, LoggingError, PipeFormat, setup_logging};
pub use vault::{EnvVaultProvider, MapVaultProvider, Secret, VaultProvider};
