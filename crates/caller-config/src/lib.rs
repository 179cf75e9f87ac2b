// caller-config/src/lib.rs

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "CALLER_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_optional_file<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
		self.file_path = path.map(|p| p.as_ref().to_path_buf());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	/// Loads the configuration file if one was given, otherwise starts from
	/// the defaults, then applies environment overrides and validates.
	pub async fn load(&self) -> Result<CallerConfig, ConfigError> {
		let mut config = match &self.file_path {
			Some(file_path) => self.load_from_file(file_path).await?,
			None => {
				debug!("No configuration file given, using defaults");
				CallerConfig::default()
			}
		};

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &Path) -> Result<CallerConfig, ConfigError> {
		if !file_path.exists() {
			return Err(ConfigError::FileNotFound(
				file_path.display().to_string(),
			));
		}

		let content = tokio::fs::read_to_string(file_path).await?;
		let substituted_content = substitute_env_vars(&content)?;

		from_toml(&substituted_content)
	}

	fn apply_env_overrides(&self, config: &mut CallerConfig) -> Result<(), ConfigError> {
		if let Ok(url) = env::var(format!("{}NODE_URL", self.env_prefix)) {
			debug!("Overriding node URL from environment");
			config.node.url = url;
		}

		if let Ok(allow) = env::var(format!("{}ALLOW_INSECURE", self.env_prefix)) {
			config.node.allow_insecure = allow.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid allow_insecure flag: {}", e))
			})?;
		}

		if let Ok(seed) = env::var(format!("{}SEED", self.env_prefix)) {
			debug!("Overriding account seed from environment");
			config.account.seed = seed;
		}

		if let Ok(address) = env::var(format!("{}CONTRACT_ADDRESS", self.env_prefix)) {
			config.contract.address = address;
		}

		if let Ok(metadata) = env::var(format!("{}CONTRACT_METADATA", self.env_prefix)) {
			config.contract.metadata = PathBuf::from(metadata);
		}

		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.logging.level = log_level;
		}

		Ok(())
	}
}

/// Parses a TOML document without touching the environment.
pub fn from_toml(contents: &str) -> Result<CallerConfig, ConfigError> {
	toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Replaces `${VAR_NAME}` placeholders with environment variable values.
pub fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let mut result = content.to_string();

	let re = regex::Regex::new(r"\$\{([^}]+)\}")
		.map_err(|e| ConfigError::ParseError(e.to_string()))?;

	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let env_value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

		result = result.replace(full_match, &env_value);
	}

	Ok(result)
}

pub fn validate_config(config: &CallerConfig) -> Result<(), ConfigError> {
	let url = &config.node.url;
	if !(url.starts_with("ws://") || url.starts_with("wss://")) {
		return Err(ConfigError::ValidationError(format!(
			"Node URL must start with ws:// or wss://, got {}",
			url
		)));
	}

	if config.account.seed.trim().is_empty() {
		return Err(ConfigError::ValidationError(
			"Account seed must not be empty".to_string(),
		));
	}

	if config.contract.address.trim().is_empty() {
		return Err(ConfigError::ValidationError(
			"Contract address must not be empty".to_string(),
		));
	}

	if config.contract.metadata.as_os_str().is_empty() {
		return Err(ConfigError::ValidationError(
			"Contract metadata path must not be empty".to_string(),
		));
	}

	Ok(())
}
