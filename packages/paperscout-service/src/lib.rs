pub mod pipeline;
pub mod protocol;
pub mod report;
pub mod time_serde;

mod error;

pub use error::{Error, Result};
pub use pipeline::{PaperOutcome, PipelineRequest, PipelineResult, ProcessedPaper, RunStats};
pub use protocol::{
	AttemptVerdict, FailureKind, ProtocolOutcome, ProtocolRun, ProtocolSettings, SummaryAttempt,
	SummaryFailure,
};
pub use report::{Report, ReportMetadata, ReportPaper, ReportSummary};

use std::{
	future::Future,
	pin::Pin,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};

use paperscout_config::{Config, DiscoveryConfig, OracleConfig};
use paperscout_domain::{PaperRecord, SummaryText, Verdict};
use paperscout_providers::{
	arxiv::{self, DiscoveryQuery},
	oracle,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait OracleProvider
where
	Self: Send + Sync,
{
	fn summarize<'a>(
		&'a self,
		cfg: &'a OracleConfig,
		document: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;

	fn verify<'a>(
		&'a self,
		cfg: &'a OracleConfig,
		document: &'a str,
		candidate: &'a SummaryText,
	) -> BoxFuture<'a, color_eyre::Result<Verdict>>;
}

pub trait DiscoveryProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a DiscoveryConfig,
		query: &'a DiscoveryQuery,
	) -> BoxFuture<'a, color_eyre::Result<Vec<PaperRecord>>>;
}

/// Timed waits between oracle calls. Swapped for a recording fake in tests.
pub trait Pacer
where
	Self: Send + Sync,
{
	fn sleep<'a>(&'a self, duration: Duration) -> BoxFuture<'a, ()>;
}

#[derive(Clone)]
pub struct Providers {
	pub oracle: Arc<dyn OracleProvider>,
	pub discovery: Arc<dyn DiscoveryProvider>,
	pub pacer: Arc<dyn Pacer>,
}
impl Providers {
	pub fn new(
		oracle: Arc<dyn OracleProvider>,
		discovery: Arc<dyn DiscoveryProvider>,
		pacer: Arc<dyn Pacer>,
	) -> Self {
		Self { oracle, discovery, pacer }
	}

	pub(crate) async fn pause(&self, duration: Duration) {
		if !duration.is_zero() {
			self.pacer.sleep(duration).await;
		}
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { oracle: provider.clone(), discovery: provider, pacer: Arc::new(TokioPacer) }
	}
}

/// Cooperative stop flag. Checked between steps, never during a wait.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);
impl ShutdownSignal {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn trigger(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_triggered(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

pub struct PaperScout {
	pub cfg: Config,
	pub providers: Providers,
	pub shutdown: ShutdownSignal,
}
impl PaperScout {
	pub fn new(cfg: Config) -> Result<Self> {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Result<Self> {
		paperscout_config::validate(&cfg)?;

		Ok(Self { cfg, providers, shutdown: ShutdownSignal::new() })
	}

	pub fn shutdown_signal(&self) -> ShutdownSignal {
		self.shutdown.clone()
	}
}

struct DefaultProviders;
impl OracleProvider for DefaultProviders {
	fn summarize<'a>(
		&'a self,
		cfg: &'a OracleConfig,
		document: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move {
			tracing::debug!(document, model = %cfg.model, "Requesting summary.");

			Ok(oracle::summarize(cfg, prompt).await?)
		})
	}

	fn verify<'a>(
		&'a self,
		cfg: &'a OracleConfig,
		document: &'a str,
		candidate: &'a SummaryText,
	) -> BoxFuture<'a, color_eyre::Result<Verdict>> {
		Box::pin(async move { Ok(oracle::verify(cfg, document, candidate).await?) })
	}
}
impl DiscoveryProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a DiscoveryConfig,
		query: &'a DiscoveryQuery,
	) -> BoxFuture<'a, color_eyre::Result<Vec<PaperRecord>>> {
		Box::pin(async move { Ok(arxiv::search(cfg, query).await?) })
	}
}

struct TokioPacer;
impl Pacer for TokioPacer {
	fn sleep<'a>(&'a self, duration: Duration) -> BoxFuture<'a, ()> {
		Box::pin(tokio::time::sleep(duration))
	}
}
