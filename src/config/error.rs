use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Corrupt config file: {0}")]
	Corrupt(#[from] serde_json::Error),

	#[error("Account not found: {0}")]
	AccountNotFound(String),

	#[error("No platform data directory available")]
	NoDataDir,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
