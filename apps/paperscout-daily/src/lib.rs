use std::{
	fs::{self, File},
	io,
	path::{Path, PathBuf},
	sync::Mutex,
};

use clap::Parser;
use time::{OffsetDateTime, macros::format_description};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use paperscout_config::Config;
use paperscout_service::{PaperScout, report};

/// Runs one discovery, scoring, and summarization pass and writes the JSON report.
#[derive(Debug, Parser)]
#[command(
	version = paperscout_cli::VERSION,
	rename_all = "kebab",
	styles = paperscout_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Overrides `search.topic` (vlm, vla, or both).
	#[arg(long, value_name = "TOPIC")]
	pub topic: Option<String>,
	/// Overrides `search.days_back`.
	#[arg(long, value_name = "DAYS")]
	pub days_back: Option<u32>,
	/// Overrides `search.max_results`.
	#[arg(long, value_name = "COUNT")]
	pub max_results: Option<u32>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let mut config = paperscout_config::load(&args.config)?;

	apply_overrides(&mut config, &args);
	init_tracing(&config)?;

	let output = config.output.clone();
	let scout = PaperScout::new(config)?;
	let shutdown = scout.shutdown_signal();

	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			tracing::warn!("Shutdown requested. Stopping after the current step.");

			shutdown.trigger();
		}
	});

	let result = scout.run_configured().await?;
	let path = report::write(&result, &output)?;

	tracing::info!(
		run_id = %result.run_id,
		path = %path.display(),
		summarized = result.stats.summarized,
		failed = result.stats.failed,
		"Daily run complete."
	);

	Ok(())
}

pub fn apply_overrides(config: &mut Config, args: &Args) {
	if let Some(topic) = &args.topic {
		config.search.topic = topic.trim().to_ascii_lowercase();
	}
	if let Some(days_back) = args.days_back {
		config.search.days_back = days_back;
	}
	if let Some(max_results) = args.max_results {
		config.search.max_results = max_results;
	}
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	let file_layer = match config.service.log_dir.as_deref() {
		Some(dir) => {
			let file = open_log_file(dir)?;

			Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
		},
		None => None,
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(io::stderr))
		.with(file_layer)
		.init();

	Ok(())
}

fn open_log_file(dir: &str) -> color_eyre::Result<File> {
	let stamp = OffsetDateTime::now_utc().format(format_description!("[year][month][day]"))?;

	fs::create_dir_all(dir)?;

	let file = File::options()
		.create(true)
		.append(true)
		.open(Path::new(dir).join(format!("paperscout_{stamp}.log")))?;

	Ok(file)
}
