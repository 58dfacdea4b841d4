use serde::Deserialize;
use serde_json::{Map, Value};

use paperscout_domain::filter;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub service: Service,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub filter: Filter,
	#[serde(default)]
	pub discovery: DiscoveryConfig,
	pub oracle: OracleConfig,
	#[serde(default)]
	pub verification: Verification,
	#[serde(default)]
	pub pacing: Pacing,
	#[serde(default)]
	pub output: Output,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub log_level: String,
	/// Optional. When set, a plain-text log file is written here next to stderr output.
	pub log_dir: Option<String>,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string(), log_dir: None }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// One of "vlm", "vla" or "both".
	pub topic: String,
	pub max_results: u32,
	pub days_back: u32,
	/// arXiv category labels, e.g. "cs.RO". Papers carrying any of them never reach scoring.
	pub exclude_categories: Vec<String>,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			topic: "both".to_string(),
			max_results: 50,
			days_back: 1,
			exclude_categories: Vec::new(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Filter {
	pub min_relevance: f32,
}
impl Default for Filter {
	fn default() -> Self {
		Self { min_relevance: filter::DEFAULT_MIN_RELEVANCE }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
	pub api_base: String,
	pub path: String,
	pub timeout_ms: u64,
}
impl Default for DiscoveryConfig {
	fn default() -> Self {
		Self {
			api_base: "https://export.arxiv.org".to_string(),
			path: "/api/query".to_string(),
			timeout_ms: 30_000,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct OracleConfig {
	#[serde(default = "default_oracle_provider_id")]
	pub provider_id: String,
	#[serde(default = "default_oracle_api_base")]
	pub api_base: String,
	/// Blank values are filled from `PAPERSCOUT_API_KEY` during load.
	#[serde(default)]
	pub api_key: String,
	#[serde(default = "default_oracle_path")]
	pub path: String,
	#[serde(default = "default_oracle_model")]
	pub model: String,
	#[serde(default = "default_oracle_temperature")]
	pub temperature: f32,
	#[serde(default = "default_oracle_timeout_ms")]
	pub timeout_ms: u64,
	/// Transport attempts per oracle call, including the first one.
	#[serde(default = "default_oracle_max_retries")]
	pub max_retries: u32,
	#[serde(default = "default_oracle_retry_delay_ms")]
	pub retry_delay_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Verification {
	pub enabled: bool,
	pub cooldown_secs: f64,
	/// Extra generate rounds allowed after the first one.
	pub max_attempts: u32,
}
impl Default for Verification {
	fn default() -> Self {
		Self { enabled: true, cooldown_secs: 30.0, max_attempts: 2 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Pacing {
	/// Wait before every oracle call.
	pub request_delay_secs: f64,
	/// Wait between two summarized papers.
	pub paper_delay_secs: f64,
}
impl Default for Pacing {
	fn default() -> Self {
		Self { request_delay_secs: 30.0, paper_delay_secs: 5.0 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Output {
	pub dir: String,
	pub file_prefix: String,
	pub include_abstract: bool,
	pub include_processing_status: bool,
}
impl Default for Output {
	fn default() -> Self {
		Self {
			dir: "output".to_string(),
			file_prefix: "arxiv_papers".to_string(),
			include_abstract: false,
			include_processing_status: true,
		}
	}
}

fn default_oracle_provider_id() -> String {
	"moonshot".to_string()
}

fn default_oracle_api_base() -> String {
	"https://api.moonshot.cn/v1".to_string()
}

fn default_oracle_path() -> String {
	"/chat/completions".to_string()
}

fn default_oracle_model() -> String {
	"moonshot-v1-32k".to_string()
}

fn default_oracle_temperature() -> f32 {
	0.3
}

fn default_oracle_timeout_ms() -> u64 {
	60_000
}

fn default_oracle_max_retries() -> u32 {
	3
}

fn default_oracle_retry_delay_ms() -> u64 {
	10_000
}
