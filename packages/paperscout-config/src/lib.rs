mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DiscoveryConfig, Filter, OracleConfig, Output, Pacing, Search, Service, Verification,
};

use std::{env, fs, path::Path};

pub const API_KEY_ENV: &str = "PAPERSCOUT_API_KEY";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let topic = cfg.search.topic.as_str();

	if !matches!(topic, "vlm" | "vla" | "both") {
		return Err(Error::Validation {
			message: "search.topic must be one of vlm, vla, or both.".to_string(),
		});
	}
	if cfg.search.max_results == 0 {
		return Err(Error::Validation {
			message: "search.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.search.days_back == 0 {
		return Err(Error::Validation {
			message: "search.days_back must be greater than zero.".to_string(),
		});
	}
	if !cfg.filter.min_relevance.is_finite() {
		return Err(Error::Validation {
			message: "filter.min_relevance must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.filter.min_relevance) {
		return Err(Error::Validation {
			message: "filter.min_relevance must be in the range 0.0-1.0.".to_string(),
		});
	}

	for (label, value) in [
		("discovery.api_base", &cfg.discovery.api_base),
		("oracle.api_base", &cfg.oracle.api_base),
		("oracle.model", &cfg.oracle.model),
		("output.dir", &cfg.output.dir),
		("output.file_prefix", &cfg.output.file_prefix),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.oracle.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: format!("oracle.api_key must be non-empty (or set {API_KEY_ENV})."),
		});
	}
	if cfg.oracle.max_retries == 0 {
		return Err(Error::Validation {
			message: "oracle.max_retries must be greater than zero.".to_string(),
		});
	}
	if cfg.oracle.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "oracle.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.oracle.temperature.is_finite() || cfg.oracle.temperature < 0.0 {
		return Err(Error::Validation {
			message: "oracle.temperature must be a finite number, zero or greater.".to_string(),
		});
	}
	if cfg.discovery.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "discovery.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("verification.cooldown_secs", cfg.verification.cooldown_secs),
		("pacing.request_delay_secs", cfg.pacing.request_delay_secs),
		("pacing.paper_delay_secs", cfg.pacing.paper_delay_secs),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	for (key, value) in &cfg.oracle.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("oracle.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.topic = cfg.search.topic.trim().to_ascii_lowercase();
	cfg.search.exclude_categories = cfg
		.search
		.exclude_categories
		.iter()
		.map(|category| category.trim().to_string())
		.filter(|category| !category.is_empty())
		.collect();

	if cfg.service.log_dir.as_deref().map(|dir| dir.trim().is_empty()).unwrap_or(false) {
		cfg.service.log_dir = None;
	}
	if cfg.oracle.api_key.trim().is_empty()
		&& let Ok(key) = env::var(API_KEY_ENV)
	{
		cfg.oracle.api_key = key.trim().to_string();
	}
}
